//! Committing, undoing and deleting vectors
//!
//! Chain-mode invariant: for every i > 0,
//! `history[i].start == history[i - 1].end()`, and `history[0].start` is the
//! level's start position. Deleting an entry replays the remaining
//! displacements to restore it.

use glam::Vec2;

use super::input::{ActionMode, VectorInput};
use super::resolve::{InputMode, resolve};
use super::state::{ApplyOutcome, GamePhase, GameState, Projectile, Refusal, VectorKind, VectorRecord};
use crate::consts::SUBTRACT_COLOR;

impl GameState {
    /// How input is interpreted right now
    pub fn input_mode(&self) -> InputMode {
        InputMode::for_level(self.level(), self.sandbox_mode)
    }

    /// Commit the engine's own input form
    pub fn apply_vector(&mut self) -> ApplyOutcome {
        let input = self.input.clone();
        self.apply_input(&input)
    }

    /// Commit `input` as a move or a shot, depending on the action mode
    pub fn apply_input(&mut self, input: &VectorInput) -> ApplyOutcome {
        if self.phase != GamePhase::Playing {
            log::warn!("Ignoring input while {:?}", self.phase);
            return ApplyOutcome::Refused(Refusal::NotPlaying);
        }

        let mode = self.input_mode();
        let resolved = resolve(
            mode,
            &self.level().mechanics,
            &input.parse(),
            self.operation,
            self.player,
        );

        if self.action == ActionMode::Shoot {
            if self.ammo == 0 {
                log::debug!("Shot refused: no ammo");
                return ApplyOutcome::Refused(Refusal::NoAmmo);
            }
            self.ammo -= 1;
            let id = self.next_entity_id();
            self.projectiles.push(Projectile {
                id,
                pos: self.player,
                vel: resolved.displacement,
            });
            self.hint = None;
            log::debug!("Fired projectile {} with velocity {:?}", id, resolved.displacement);
            return ApplyOutcome::Shot { projectile: id };
        }

        let id = self.next_entity_id();
        let record = VectorRecord {
            id,
            start: resolved.start,
            displacement: resolved.displacement,
            kind: VectorKind::Move,
            is_scaled: resolved.scaled,
            color: resolved.negated.then_some(SUBTRACT_COLOR),
        };
        let position = record.end();
        self.history.push(record);
        self.player = position;
        log::debug!(
            "Applied {:?} from {:?} ({:?} mode), player now at {:?}",
            resolved.displacement,
            resolved.start,
            mode,
            position
        );

        let collected = self.evaluate_pickups(position);
        self.hint = None;
        ApplyOutcome::Moved {
            position,
            collected,
        }
    }

    /// Remove the last vector. The player snaps back instead of replaying the chain.
    pub fn undo_last(&mut self) -> bool {
        let Some(removed) = self.history.pop() else {
            return false;
        };

        self.player = match self.input_mode() {
            InputMode::Origin => self.history.last().map_or(Vec2::ZERO, VectorRecord::end),
            InputMode::OriginOnly => Vec2::ZERO,
            InputMode::Chain | InputMode::TwoPoint | InputMode::Parametric => removed.start,
        };
        self.hint = None;
        log::debug!("Undid vector {}, player at {:?}", removed.id, self.player);
        true
    }

    /// Remove the vector at `index`, repairing the chain when needed
    pub fn delete_vector(&mut self, index: usize) -> bool {
        if index >= self.history.len() {
            return false;
        }
        let removed = self.history.remove(index);

        if self.input_mode().is_chain() {
            let mut cursor = self.level().start_pos;
            for record in &mut self.history {
                record.start = cursor;
                cursor += record.displacement;
            }
            self.player = cursor;
        } else {
            self.player = self.history.last().map_or(Vec2::ZERO, VectorRecord::end);
        }
        self.hint = None;
        log::debug!("Deleted vector {} at {}, player at {:?}", removed.id, index, self.player);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRANSITION_DELAY_TICKS;
    use crate::level::tests::{level, object};
    use crate::level::{Level, Mechanics, ObjectKind};
    use crate::sim::input::{Operation, SandboxMode};
    use crate::sim::state::tests::state_with;
    use crate::sim::tick;
    use proptest::prelude::*;

    fn chain_level(start: Vec2) -> Level {
        let mut lvl = level(
            1,
            Mechanics {
                allow_add: true,
                allow_subtract: true,
                allow_scalar: true,
                ..Default::default()
            },
            Vec::new(),
        );
        lvl.start_pos = start;
        lvl
    }

    fn origin_level(objects: Vec<crate::level::ObjectSpec>) -> Level {
        level(
            1,
            Mechanics {
                allow_add: true,
                origin_only: true,
                ..Default::default()
            },
            objects,
        )
    }

    fn assert_chain_linked(state: &GameState, start: Vec2) {
        let mut cursor = start;
        for record in &state.history {
            assert_eq!(record.start, cursor);
            cursor += record.displacement;
        }
        assert_eq!(state.player, cursor);
    }

    #[test]
    fn test_origin_only_scenario() {
        let mut state = state_with(vec![origin_level(vec![object(
            "c",
            4.0,
            3.0,
            ObjectKind::Coin,
        )])]);

        let outcome = state.apply_input(&VectorInput::vector(4.0, 3.0));
        assert_eq!(
            outcome,
            ApplyOutcome::Moved {
                position: Vec2::new(4.0, 3.0),
                collected: 1
            }
        );
        assert_eq!(state.player, Vec2::new(4.0, 3.0));
        assert!(state.objects[0].collected);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].start, Vec2::ZERO);
        assert_eq!(state.history[0].displacement, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_origin_only_always_starts_at_origin() {
        let mut state = state_with(vec![origin_level(Vec::new())]);
        state.apply_input(&VectorInput::vector(1.0, 1.0));
        state.apply_input(&VectorInput::vector(-2.0, 5.0));
        assert!(state.history.iter().all(|r| r.start == Vec2::ZERO));
        assert_eq!(state.player, Vec2::new(-2.0, 5.0));

        assert!(state.undo_last());
        assert_eq!(state.player, Vec2::ZERO);
    }

    #[test]
    fn test_scalar_subtract_in_chain() {
        let mut state = state_with(vec![chain_level(Vec2::ZERO)]);
        state.toggle_operation(Operation::Subtract);
        state.apply_input(&VectorInput::vector(3.0, 2.0).with_scalar(3.0));

        let record = &state.history[0];
        assert_eq!(record.displacement, Vec2::new(-9.0, -6.0));
        assert!(record.is_scaled);
        assert_eq!(record.color, Some(SUBTRACT_COLOR));
    }

    #[test]
    fn test_undo_chain_snaps_to_removed_start() {
        let mut state = state_with(vec![chain_level(Vec2::new(1.0, 1.0))]);
        state.apply_input(&VectorInput::vector(2.0, 0.0));
        state.apply_input(&VectorInput::vector(0.0, 3.0));

        assert!(state.undo_last());
        assert_eq!(state.player, Vec2::new(3.0, 1.0));
        assert!(state.undo_last());
        assert_eq!(state.player, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut state = state_with(vec![chain_level(Vec2::new(2.0, 2.0))]);
        let before = state.clone();
        assert!(!state.undo_last());
        assert_eq!(state.player, before.player);
        assert_eq!(state.history, before.history);
        assert!(!state.delete_vector(0));
    }

    #[test]
    fn test_sandbox_origin_undo_uses_previous_end() {
        let mut state = state_with(Vec::new());
        state.start_sandbox();
        state.switch_sandbox_mode(SandboxMode::Origin);
        state.apply_input(&VectorInput::vector(1.0, 2.0));
        state.apply_input(&VectorInput::vector(5.0, 5.0));

        state.undo_last();
        assert_eq!(state.player, Vec2::new(1.0, 2.0));
        state.undo_last();
        assert_eq!(state.player, Vec2::ZERO);
    }

    #[test]
    fn test_two_point_mode_apply() {
        let mut state = state_with(Vec::new());
        state.start_sandbox();
        state.switch_sandbox_mode(SandboxMode::TwoPoint);
        state.apply_input(&VectorInput::vector(4.0, 5.0).with_start(1.0, 1.0));

        assert_eq!(state.history[0].start, Vec2::new(1.0, 1.0));
        assert_eq!(state.history[0].displacement, Vec2::new(3.0, 4.0));
        assert_eq!(state.player, Vec2::new(4.0, 5.0));
    }

    #[test]
    fn test_delete_in_discrete_mode() {
        let mut state = state_with(vec![origin_level(Vec::new())]);
        state.apply_input(&VectorInput::vector(1.0, 1.0));
        state.apply_input(&VectorInput::vector(2.0, 2.0));

        assert!(state.delete_vector(1));
        assert_eq!(state.player, Vec2::new(1.0, 1.0));
        assert!(state.delete_vector(0));
        assert_eq!(state.player, Vec2::ZERO);
    }

    #[test]
    fn test_pickup_then_completion_after_delay() {
        let lvl = level(
            1,
            Mechanics {
                allow_add: true,
                ..Default::default()
            },
            vec![
                object("c1", 2.0, 0.0, ObjectKind::Coin),
                object("c2", 0.0, 2.0, ObjectKind::Coin),
            ],
        );
        let next = chain_level(Vec2::ZERO);
        let mut state = state_with(vec![lvl, next]);

        state.apply_input(&VectorInput::vector(2.0, 0.0));
        state.apply_input(&VectorInput::vector(-2.0, 2.0));
        assert!(state.objects.iter().all(|o| o.collected));

        for _ in 0..TRANSITION_DELAY_TICKS - 1 {
            tick(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        // Input is refused once the level is decided
        let outcome = state.apply_input(&VectorInput::vector(1.0, 0.0));
        assert_eq!(outcome, ApplyOutcome::Refused(Refusal::NotPlaying));
    }

    #[test]
    fn test_last_level_completion_wins() {
        let lvl = level(
            1,
            Mechanics {
                allow_add: true,
                ..Default::default()
            },
            vec![object("c1", 2.0, 0.0, ObjectKind::Coin)],
        );
        let mut state = state_with(vec![lvl]);
        state.apply_input(&VectorInput::vector(2.0, 0.0));
        for _ in 0..TRANSITION_DELAY_TICKS {
            tick(&mut state);
        }
        assert_eq!(state.phase, GamePhase::GameWon);
    }

    #[test]
    fn test_shoot_without_ammo_is_refused() {
        let mut state = state_with(vec![chain_level(Vec2::ZERO)]);
        state.toggle_action_mode(ActionMode::Shoot);
        let outcome = state.apply_input(&VectorInput::vector(1.0, 1.0));

        assert_eq!(outcome, ApplyOutcome::Refused(Refusal::NoAmmo));
        assert!(state.projectiles.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.ammo, 0);
    }

    #[test]
    fn test_shoot_spends_ammo_without_history() {
        let mut state = state_with(vec![chain_level(Vec2::new(-8.0, -8.0))]);
        state.ammo = 2;
        state.toggle_action_mode(ActionMode::Shoot);
        let outcome = state.apply_input(&VectorInput::vector(13.0, 13.0));

        assert!(matches!(outcome, ApplyOutcome::Shot { .. }));
        assert_eq!(state.ammo, 1);
        assert!(state.history.is_empty());
        assert_eq!(state.projectiles[0].pos, Vec2::new(-8.0, -8.0));
        assert_eq!(state.projectiles[0].vel, Vec2::new(13.0, 13.0));
    }

    #[test]
    fn test_apply_and_undo_clear_hint() {
        let lvl = level(
            1,
            Mechanics {
                allow_add: true,
                ..Default::default()
            },
            vec![object("c1", 4.0, 0.0, ObjectKind::Coin)],
        );
        let mut state = state_with(vec![lvl]);

        state.request_hint();
        assert!(state.hint.is_some());
        state.apply_input(&VectorInput::vector(1.0, 0.0));
        assert!(state.hint.is_none());

        state.request_hint();
        state.undo_last();
        assert!(state.hint.is_none());
    }

    #[test]
    fn test_apply_vector_uses_form() {
        let mut state = state_with(vec![chain_level(Vec2::ZERO)]);
        state.input = VectorInput::vector(2.0, -1.0);
        state.apply_vector();
        assert_eq!(state.player, Vec2::new(2.0, -1.0));
    }

    fn displacement() -> impl Strategy<Value = (i8, i8)> {
        (-9i8..=9, -9i8..=9)
    }

    proptest! {
        #[test]
        fn prop_chain_stays_linked(
            start in displacement(),
            moves in prop::collection::vec(displacement(), 0..12),
        ) {
            let p0 = Vec2::new(start.0 as f32, start.1 as f32);
            let mut state = state_with(vec![chain_level(p0)]);
            for (x, y) in &moves {
                state.apply_input(&VectorInput::vector(*x as f32, *y as f32));
            }
            prop_assert_eq!(state.history.len(), moves.len());
            assert_chain_linked(&state, p0);
        }

        #[test]
        fn prop_delete_repairs_chain(
            start in displacement(),
            moves in prop::collection::vec(displacement(), 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let p0 = Vec2::new(start.0 as f32, start.1 as f32);
            let mut state = state_with(vec![chain_level(p0)]);
            for (x, y) in &moves {
                state.apply_input(&VectorInput::vector(*x as f32, *y as f32));
            }

            let k = pick.index(moves.len());
            prop_assert!(state.delete_vector(k));

            // Same result as building the chain fresh from the survivors
            let mut fresh = state_with(vec![chain_level(p0)]);
            for (i, (x, y)) in moves.iter().enumerate() {
                if i != k {
                    fresh.apply_input(&VectorInput::vector(*x as f32, *y as f32));
                }
            }
            let starts: Vec<Vec2> = state.history.iter().map(|r| r.start).collect();
            let fresh_starts: Vec<Vec2> = fresh.history.iter().map(|r| r.start).collect();
            prop_assert_eq!(starts, fresh_starts);
            prop_assert_eq!(state.player, fresh.player);
            assert_chain_linked(&state, p0);
        }
    }
}
