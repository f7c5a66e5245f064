//! Game state and core engine types
//!
//! The engine exclusively owns everything that changes during play: player
//! position, vector history, object collection, ammo, projectiles, phase and hint.
//! The catalog it was built from is never mutated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::{ActionMode, Operation, SandboxMode, VectorInput};
use super::schedule::{Deferred, Scheduler};
use crate::consts::*;
use crate::level::{Catalog, Level, ObjectKind, ObjectSpec};
use crate::settings::Settings;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Accepting moves and shots
    Playing,
    /// All objectives collected, a further level exists
    LevelComplete,
    /// Catalog finished or boss defeated
    GameWon,
}

/// Whether a history entry moved the player or fired a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    Move,
    Shoot,
}

/// A committed vector in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: u32,
    pub start: Vec2,
    pub displacement: Vec2,
    pub kind: VectorKind,
    /// Entered with a scalar factor other than 1
    pub is_scaled: bool,
    /// Colour override (subtracted vectors)
    pub color: Option<u32>,
}

impl VectorRecord {
    /// Tip of the arrow
    pub fn end(&self) -> Vec2 {
        self.start + self.displacement
    }
}

/// An object on the grid, owned by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: String,
    pub pos: Vec2,
    pub kind: ObjectKind,
    pub collected: bool,
    pub hp: u32,
    pub max_hp: u32,
}

impl GameObject {
    pub fn from_spec(spec: &ObjectSpec) -> Self {
        Self {
            id: spec.id.clone(),
            pos: spec.pos,
            kind: spec.kind,
            collected: false,
            hp: spec.hp,
            max_hp: spec.hp,
        }
    }

    pub fn coin(id: String, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            kind: ObjectKind::Coin,
            collected: false,
            hp: 0,
            max_hp: 0,
        }
    }

    /// Coins and ammo that can still be picked up
    pub fn is_pickup(&self) -> bool {
        !self.collected && self.kind != ObjectKind::Monster
    }

    /// A monster that can still take hits
    pub fn is_live_monster(&self) -> bool {
        self.kind == ObjectKind::Monster && self.hp > 0
    }
}

/// A shot in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Where the dashed hint preview points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum HintTarget {
    /// Target point, drawn from the origin (position-vector levels)
    Absolute(Vec2),
    /// Displacement from the player to the target
    Relative(Vec2),
}

/// Advisory suggestion toward the nearest coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub target: HintTarget,
    /// Vector written into the input form, adjusted to the level's input constraints
    pub suggestion: Vec2,
}

/// Result of committing the pending input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// A vector was appended and the player moved
    Moved { position: Vec2, collected: usize },
    /// A projectile was fired
    Shot { projectile: u32 },
    /// Nothing changed
    Refused(Refusal),
}

/// Why an action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    NoAmmo,
    NotPlaying,
}

/// Complete engine state for the active level
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Catalog,
    pub settings: Settings,
    /// Index of the active level in the catalog
    pub level_index: usize,
    /// Bumped on every level switch/reset; stale deferred transitions compare against it
    pub generation: u32,
    pub phase: GamePhase,
    pub player: Vec2,
    pub history: Vec<VectorRecord>,
    pub objects: Vec<GameObject>,
    pub ammo: u32,
    pub projectiles: Vec<Projectile>,
    pub hint: Option<Hint>,
    pub action: ActionMode,
    pub operation: Operation,
    pub sandbox_mode: SandboxMode,
    /// Raw text of the input form
    pub input: VectorInput,
    pub show_tutorial: bool,
    pub show_cheat_sheet: bool,
    /// Animation frame counter
    pub time_ticks: u64,
    /// Decorative coin rotation (radians)
    pub coin_angle: f32,
    pub(crate) pending: Scheduler,
    next_id: u32,
}

impl GameState {
    /// Create the engine and enter the configured start level
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        let start = settings.start_level;
        let mut state = Self {
            catalog,
            settings,
            level_index: 0,
            generation: 0,
            phase: GamePhase::Playing,
            player: Vec2::ZERO,
            history: Vec::new(),
            objects: Vec::new(),
            ammo: 0,
            projectiles: Vec::new(),
            hint: None,
            action: ActionMode::Move,
            operation: Operation::Add,
            sandbox_mode: SandboxMode::Chain,
            input: VectorInput::default(),
            show_tutorial: false,
            show_cheat_sheet: false,
            time_ticks: 0,
            coin_angle: 0.0,
            pending: Scheduler::default(),
            next_id: 1,
        };
        state.init_level(start);
        state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active level definition
    pub fn level(&self) -> &Level {
        &self.catalog.levels()[self.level_index]
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enter a level, resetting all per-level state. Out-of-range indices fall
    /// back to the default level. Returns the index actually entered.
    pub fn init_level(&mut self, index: usize) -> usize {
        let index = if index < self.catalog.len() {
            index
        } else {
            let fallback = DEFAULT_LEVEL.min(self.catalog.last_index());
            log::warn!("Level {} out of range, entering level {}", index, fallback);
            fallback
        };

        self.level_index = index;
        self.generation = self.generation.wrapping_add(1);
        self.pending.cancel_all();

        let level = &self.catalog.levels()[index];
        self.player = level.start_pos;
        self.objects = level.objects.iter().map(GameObject::from_spec).collect();
        self.show_tutorial = level.tutorial.is_some() && self.settings.show_tutorials;

        self.phase = GamePhase::Playing;
        self.history.clear();
        self.ammo = 0;
        self.projectiles.clear();
        self.hint = None;
        self.action = ActionMode::Move;
        self.operation = Operation::Add;
        self.sandbox_mode = SandboxMode::Chain;
        self.input = VectorInput::default();
        self.show_cheat_sheet = false;

        log::info!("Entered level {}: {}", index, self.level().title);
        index
    }

    /// Restart the active level
    pub fn reset_level(&mut self) {
        self.init_level(self.level_index);
    }

    /// Switch to any level (clamped to the catalog)
    pub fn switch_level(&mut self, index: usize) -> usize {
        self.init_level(index)
    }

    /// Continue after a completed level
    pub fn advance_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.init_level(self.level_index + 1);
        true
    }

    /// Jump to the next level regardless of progress (stays on the last level)
    pub fn skip_level(&mut self) -> usize {
        let next = (self.level_index + 1).min(self.catalog.last_index());
        self.init_level(next)
    }

    pub fn start_sandbox(&mut self) {
        self.init_level(SANDBOX_LEVEL);
    }

    pub fn is_sandbox(&self) -> bool {
        self.level().is_sandbox
    }

    /// Whether a level follows the active one
    pub fn has_next_level(&self) -> bool {
        self.level_index < self.catalog.last_index()
    }

    /// True while a tutorial or cheat-sheet modal covers the grid
    pub fn modal_open(&self) -> bool {
        self.show_tutorial || self.show_cheat_sheet
    }

    pub fn close_tutorial(&mut self) {
        self.show_tutorial = false;
    }

    /// Open or close the cheat sheet; levels without educational content have none
    pub fn toggle_cheat_sheet(&mut self) -> bool {
        if self.show_cheat_sheet {
            self.show_cheat_sheet = false;
        } else if self.level().edu_content.is_some() {
            self.show_cheat_sheet = true;
        }
        self.show_cheat_sheet
    }

    /// The boss, if this level has one
    pub fn monster(&self) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.kind == ObjectKind::Monster)
    }

    /// Sandbox only: drop a coin at the grid point nearest to `world`
    pub fn place_target(&mut self, world: Vec2) -> Option<&GameObject> {
        if !self.is_sandbox() {
            return None;
        }
        let id = self.next_entity_id();
        let pos = world.round();
        self.objects.push(GameObject::coin(format!("sandbox_{id}"), pos));
        log::debug!("Placed sandbox target at ({}, {})", pos.x, pos.y);
        self.objects.last()
    }

    /// Queue a phase transition after the standard delay
    pub(crate) fn schedule_phase(&mut self, phase: GamePhase) {
        self.pending.schedule(Deferred {
            due_tick: self.time_ticks + TRANSITION_DELAY_TICKS,
            generation: self.generation,
            phase,
        });
    }

    /// Apply deferred transitions that are due, discarding stale ones
    pub(crate) fn fire_due_transitions(&mut self) {
        for deferred in self.pending.take_due(self.time_ticks) {
            if deferred.generation != self.generation {
                log::warn!("Discarding stale transition to {:?}", deferred.phase);
                continue;
            }
            if self.phase != GamePhase::Playing {
                continue;
            }
            log::info!("Level {} -> {:?}", self.level_index, deferred.phase);
            self.phase = deferred.phase;
        }
    }
}
