//! Pickups, objectives and projectile hits

use glam::Vec2;

use super::state::{GameObject, GamePhase, GameState};
use crate::consts::*;
use crate::level::ObjectKind;

/// Player close enough to pick up an object at `object`
#[inline]
pub fn within_pickup(player: Vec2, object: Vec2) -> bool {
    player.distance(object) < PICKUP_THRESHOLD
}

/// Projectile at `pos` hits a monster centred at `monster`
#[inline]
pub fn projectile_hits(pos: Vec2, monster: Vec2) -> bool {
    pos.distance(monster) < MONSTER_HIT_RADIUS
}

/// All coins collected and no monster left standing. Ammo never counts.
pub fn objectives_met(objects: &[GameObject]) -> bool {
    let coins_done = objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Coin)
        .all(|o| o.collected);
    coins_done && !objects.iter().any(GameObject::is_live_monster)
}

impl GameState {
    /// Collect everything within reach of `pos`. Returns how many objects
    /// were picked up; completing the objectives queues the level transition.
    pub(crate) fn evaluate_pickups(&mut self, pos: Vec2) -> usize {
        let mut collected = 0;
        for obj in self.objects.iter_mut().filter(|o| o.is_pickup()) {
            if within_pickup(pos, obj.pos) {
                obj.collected = true;
                collected += 1;
                if obj.kind == ObjectKind::Ammo {
                    self.ammo += 1;
                }
                log::debug!("Collected {} ({:?})", obj.id, obj.kind);
            }
        }

        if collected > 0 && objectives_met(&self.objects) && !self.is_sandbox() {
            let next = if self.has_next_level() {
                GamePhase::LevelComplete
            } else {
                GamePhase::GameWon
            };
            self.schedule_phase(next);
        }
        collected
    }

    /// Index of a live monster hit by a projectile at `pos`
    pub(crate) fn monster_hit_by(&self, pos: Vec2) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.is_live_monster() && projectile_hits(pos, o.pos))
    }

    /// Apply one point of damage; a defeated monster wins the game
    pub(crate) fn damage_monster(&mut self, index: usize) {
        let Some(monster) = self.objects.get_mut(index) else {
            return;
        };
        if monster.hp == 0 {
            return;
        }
        monster.hp -= 1;
        log::debug!("Monster {} hit, hp {}/{}", monster.id, monster.hp, monster.max_hp);
        if monster.hp == 0 {
            log::info!("Monster {} defeated", monster.id);
            self.schedule_phase(GamePhase::GameWon);
        }
    }
}
