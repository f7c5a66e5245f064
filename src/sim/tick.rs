//! Fixed-frame simulation tick
//!
//! The frame-driven path: advances projectiles, fires deferred transitions
//! and spins the decorative coins. It never waits on player input.

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Advance the game state by one animation frame
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;

    if !state.settings.reduced_motion {
        let seconds = state.time_ticks as f32 * FRAME_DT;
        state.coin_angle = seconds * COIN_SPIN_RATE;
    }

    state.fire_due_transitions();

    // Projectiles freeze behind modals and once the level is decided
    if state.phase != GamePhase::Playing || state.modal_open() {
        return;
    }
    step_projectiles(state);
}

fn step_projectiles(state: &mut GameState) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut in_flight = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        projectile.pos += projectile.vel * PROJECTILE_STEP;

        if let Some(index) = state.monster_hit_by(projectile.pos) {
            state.damage_monster(index);
            continue;
        }

        if projectile.pos.x.abs() < PROJECTILE_BOUND && projectile.pos.y.abs() < PROJECTILE_BOUND {
            in_flight.push(projectile);
        } else {
            log::debug!("Projectile {} left the field", projectile.id);
        }
    }

    state.projectiles = in_flight;
}

/// Drives `tick` from wall-clock time at a fixed frame rate.
///
/// Owned by the host. Stopping it (or dropping it) halts the frame path.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    running: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            running: true,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed `elapsed` seconds of wall time; returns the number of frames ticked
    pub fn advance(&mut self, state: &mut GameState, elapsed: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += elapsed.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            tick(state);
            self.accumulator -= FRAME_DT;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::tests::{level, object};
    use crate::level::{Mechanics, ObjectKind};
    use crate::sim::input::{ActionMode, VectorInput};
    use crate::sim::state::tests::state_with;
    use crate::sim::ApplyOutcome;
    use glam::Vec2;

    fn boss_level() -> crate::level::Level {
        let mut lvl = level(
            1,
            Mechanics {
                allow_add: true,
                allow_subtract: true,
                allow_scalar: true,
                has_monster: true,
                ..Default::default()
            },
            vec![object("boss", 5.0, 5.0, ObjectKind::Monster)],
        );
        lvl.start_pos = Vec2::ZERO;
        lvl
    }

    fn run(state: &mut GameState, frames: u64) {
        for _ in 0..frames {
            tick(state);
        }
    }

    #[test]
    fn test_projectile_moves_by_fixed_step() {
        let mut state = state_with(vec![boss_level()]);
        state.ammo = 1;
        state.toggle_action_mode(ActionMode::Shoot);
        state.apply_input(&VectorInput::vector(-1.0, 0.0));

        tick(&mut state);
        assert_eq!(state.projectiles[0].pos, Vec2::new(-0.1, 0.0));
    }

    #[test]
    fn test_projectile_leaves_bounds() {
        let mut state = state_with(vec![boss_level()]);
        state.ammo = 1;
        state.toggle_action_mode(ActionMode::Shoot);
        state.apply_input(&VectorInput::vector(-100.0, 0.0));

        run(&mut state, 2);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_monster_defeat_wins_after_delay() {
        let mut state = state_with(vec![boss_level()]);
        state.ammo = 3;
        state.toggle_action_mode(ActionMode::Shoot);

        for _ in 0..3 {
            let outcome = state.apply_input(&VectorInput::vector(5.0, 5.0));
            assert!(matches!(outcome, ApplyOutcome::Shot { .. }));
            // Ten frames of 0.1 * (5,5) reach the boss
            run(&mut state, 10);
            assert!(state.projectiles.is_empty());
        }

        assert_eq!(state.monster().unwrap().hp, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        run(&mut state, TRANSITION_DELAY_TICKS);
        assert_eq!(state.phase, GamePhase::GameWon);
    }

    #[test]
    fn test_defeated_monster_is_not_hit_again() {
        let mut state = state_with(vec![boss_level()]);
        state.objects.iter_mut().for_each(|o| o.hp = 0);
        state.projectiles.push(crate::sim::Projectile {
            id: 99,
            pos: Vec2::new(4.0, 5.0),
            vel: Vec2::new(10.0, 0.0),
        });
        tick(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.monster().unwrap().hp, 0);
    }

    #[test]
    fn test_modal_pauses_projectiles() {
        let mut state = state_with(vec![boss_level()]);
        state.ammo = 1;
        state.toggle_action_mode(ActionMode::Shoot);
        state.apply_input(&VectorInput::vector(1.0, 0.0));
        state.show_cheat_sheet = true;

        run(&mut state, 5);
        assert_eq!(state.projectiles[0].pos, Vec2::ZERO);
        assert_eq!(state.time_ticks, 5);
    }

    #[test]
    fn test_decided_level_freezes_projectiles() {
        let mut state = state_with(vec![boss_level()]);
        state.ammo = 1;
        state.toggle_action_mode(ActionMode::Shoot);
        state.apply_input(&VectorInput::vector(-1.0, 0.0));
        tick(&mut state);
        let pos = state.projectiles[0].pos;

        state.phase = GamePhase::LevelComplete;
        run(&mut state, 5);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, pos);

        state.phase = GamePhase::GameWon;
        run(&mut state, 5);
        assert_eq!(state.projectiles[0].pos, pos);
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut state = state_with(vec![boss_level()]);
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(&mut state, FRAME_DT * 2.5), 2);
        // Large gaps are capped
        assert_eq!(clock.advance(&mut state, 10.0), 6);

        clock.stop();
        assert_eq!(clock.advance(&mut state, 1.0), 0);
        assert!(!clock.is_running());
    }
}
