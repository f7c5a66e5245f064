//! Hint generator
//!
//! Suggests a vector toward the nearest uncollected coin. Hints are advisory:
//! they prefill the input form and draw a preview but never move the player.

use glam::Vec2;

use super::input::VectorInput;
use super::state::{GameObject, GameState, Hint, HintTarget};
use crate::level::{Constraints, ObjectKind};

/// Nearest uncollected coin; ties go to the first in catalog order
pub fn nearest_coin(objects: &[GameObject], from: Vec2) -> Option<&GameObject> {
    let mut nearest: Option<(&GameObject, f32)> = None;
    for obj in objects.iter().filter(|o| o.kind == ObjectKind::Coin && !o.collected) {
        let dist = obj.pos.distance(from);
        if nearest.is_none_or(|(_, best)| dist < best) {
            nearest = Some((obj, dist));
        }
    }
    nearest.map(|(obj, _)| obj)
}

/// Fit a raw displacement to what the level lets the player type.
///
/// Forbidden negatives flip both components positive (the player is expected
/// to switch to subtract). An input cap divides by the smallest whole factor
/// that brings the largest component under it.
pub fn constrain(mut delta: Vec2, constraints: &Constraints) -> Vec2 {
    if !constraints.allow_negative_input && (delta.x < 0.0 || delta.y < 0.0) {
        delta = delta.abs();
    }
    if let Some(max) = constraints.input_cap() {
        let largest = delta.abs().max_element();
        if largest > max {
            delta /= (largest / max).ceil();
        }
    }
    delta
}

/// Build a hint for a player at `player`
pub fn suggest(
    objects: &[GameObject],
    player: Vec2,
    constraints: &Constraints,
    origin_only: bool,
) -> Option<Hint> {
    let target = nearest_coin(objects, player)?;
    let raw = target.pos - player;

    Some(if origin_only {
        Hint {
            target: HintTarget::Absolute(target.pos),
            suggestion: target.pos,
        }
    } else {
        Hint {
            target: HintTarget::Relative(raw),
            suggestion: constrain(raw, constraints),
        }
    })
}

impl GameState {
    /// Compute a hint and prefill the input form with it. Returns None when
    /// no coin is left to aim at.
    pub fn request_hint(&mut self) -> Option<Hint> {
        let level = self.level();
        let hint = suggest(
            &self.objects,
            self.player,
            &level.constraints,
            level.mechanics.origin_only,
        )?;

        let prefill = VectorInput::vector(hint.suggestion.x, hint.suggestion.y);
        self.input.x = prefill.x;
        self.input.y = prefill.y;
        self.hint = Some(hint);
        log::debug!("Hint: {:?}", hint);
        Some(hint)
    }
}
