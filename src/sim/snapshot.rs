//! Read-only view of the engine for renderers

use glam::Vec2;
use serde::Serialize;

use super::input::{ActionMode, Operation, SandboxMode};
use super::resolve::InputMode;
use super::state::{GameObject, GamePhase, GameState, Hint, Projectile};
use crate::vector_name;

/// A history entry as drawn and listed
#[derive(Debug, Clone, Serialize)]
pub struct VectorView {
    pub name: String,
    pub start: Vec2,
    pub displacement: Vec2,
    pub end: Vec2,
    pub is_scaled: bool,
    pub color: Option<u32>,
    pub is_last: bool,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub level_id: u32,
    pub level_title: &'a str,
    pub is_sandbox: bool,
    pub phase: GamePhase,
    pub input_mode: InputMode,
    pub sandbox_mode: SandboxMode,
    pub action: ActionMode,
    pub operation: Operation,
    pub player: Vec2,
    pub vectors: Vec<VectorView>,
    pub objects: &'a [GameObject],
    pub monster: Option<&'a GameObject>,
    pub projectiles: &'a [Projectile],
    pub ammo: u32,
    pub hint: Option<Hint>,
    pub coin_angle: f32,
    pub show_tutorial: bool,
    pub show_cheat_sheet: bool,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        let level = self.level();
        let last = self.history.len().saturating_sub(1);
        let vectors = self
            .history
            .iter()
            .enumerate()
            .map(|(i, r)| VectorView {
                name: vector_name(i),
                start: r.start,
                displacement: r.displacement,
                end: r.end(),
                is_scaled: r.is_scaled,
                color: r.color,
                is_last: i == last,
            })
            .collect();

        Snapshot {
            level_id: level.id,
            level_title: &level.title,
            is_sandbox: level.is_sandbox,
            phase: self.phase,
            input_mode: self.input_mode(),
            sandbox_mode: self.sandbox_mode,
            action: self.action,
            operation: self.operation,
            player: self.player,
            vectors,
            objects: &self.objects,
            monster: self.monster(),
            projectiles: &self.projectiles,
            ammo: self.ammo,
            hint: self.hint,
            coin_angle: self.coin_angle,
            show_tutorial: self.show_tutorial,
            show_cheat_sheet: self.show_cheat_sheet,
        }
    }
}
