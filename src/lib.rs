//! Vector Verse - A vector arithmetic puzzle game
//!
//! Core modules:
//! - `sim`: Level state machine and vector engine (moves, pickups, projectiles, hints)
//! - `level`: Level catalog (immutable level data)
//! - `view`: Screen/world transform for hosts that draw the grid
//! - `settings`: Player preferences

pub mod level;
pub mod settings;
pub mod sim;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use level::{Catalog, CatalogError, Level};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Animation frame rate of the frame-driven path
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frames advanced per host update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Distance (grid units) at which the player picks up an object
    pub const PICKUP_THRESHOLD: f32 = 0.5;

    /// Fraction of a projectile's velocity applied per frame
    pub const PROJECTILE_STEP: f32 = 0.1;
    /// Projectiles are retired once |x| or |y| reaches this bound
    pub const PROJECTILE_BOUND: f32 = 20.0;
    /// Monster radius in grid units (20 px at base scale)
    pub const MONSTER_HIT_RADIUS: f32 = 20.0 / super::view::BASE_GRID_SCALE;

    /// Delay between the triggering event and a level_complete/game_won transition (0.5 s)
    pub const TRANSITION_DELAY_TICKS: u64 = 30;

    /// Coin spin speed (radians per second)
    pub const COIN_SPIN_RATE: f32 = 3.0;

    /// Level index used when a requested index is out of range
    pub const DEFAULT_LEVEL: usize = 1;
    /// Catalog index reserved for the sandbox
    pub const SANDBOX_LEVEL: usize = 0;

    /// Text colour tag for vectors entered in subtract mode
    pub const SUBTRACT_COLOR: u32 = 0xef4444;
}

/// Name for the vector at `index` in the history: a..z, then a1..z1, a2..
pub fn vector_name(index: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let letter = ALPHABET[index % ALPHABET.len()] as char;
    let round = index / ALPHABET.len();
    if round > 0 {
        format!("{letter}{round}")
    } else {
        letter.to_string()
    }
}

/// Format a vector component the way the history list shows it (one decimal, trailing .0 dropped)
pub fn format_component(value: f32) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some(whole) if whole == "-0" => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => text,
    }
}
