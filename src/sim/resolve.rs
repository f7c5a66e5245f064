//! Mode resolver
//!
//! Turns parsed input into the effective start point and displacement for
//! the active input mode.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::{Operation, ParsedInput, SandboxMode};
use crate::level::{Level, Mechanics};

/// Effective interpretation of input for the active level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Tip-to-tail from the player position
    Chain,
    /// Sandbox position vectors, unscaled
    Origin,
    /// Sandbox end point minus start point
    TwoPoint,
    /// Sandbox support point plus parameter times direction
    Parametric,
    /// Position-vector levels: from (0,0), scaled and signed
    OriginOnly,
}

impl InputMode {
    pub fn for_level(level: &Level, sandbox_mode: SandboxMode) -> Self {
        if level.is_sandbox {
            match sandbox_mode {
                SandboxMode::Chain => InputMode::Chain,
                SandboxMode::Origin => InputMode::Origin,
                SandboxMode::TwoPoint => InputMode::TwoPoint,
                SandboxMode::Parametric => InputMode::Parametric,
            }
        } else if level.mechanics.origin_only {
            InputMode::OriginOnly
        } else {
            InputMode::Chain
        }
    }

    /// History entries must stay linked tip-to-tail
    pub fn is_chain(self) -> bool {
        self == InputMode::Chain
    }
}

/// Start and displacement of a pending vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub start: Vec2,
    pub displacement: Vec2,
    /// A scalar other than 1 contributed
    pub scaled: bool,
    /// The subtract sign was applied
    pub negated: bool,
}

/// Resolve `input` under `mode` for a level with `mechanics`
pub fn resolve(
    mode: InputMode,
    mechanics: &Mechanics,
    input: &ParsedInput,
    operation: Operation,
    player: Vec2,
) -> Resolved {
    let scalar = if mechanics.allow_scalar { input.scalar } else { 1.0 };
    let negated = mechanics.allow_subtract && operation == Operation::Subtract;
    let sign = if negated { -1.0 } else { 1.0 };

    match mode {
        InputMode::Chain => Resolved {
            start: player,
            displacement: input.vector * scalar * sign,
            scaled: scalar != 1.0,
            negated,
        },
        InputMode::Origin => Resolved {
            start: Vec2::ZERO,
            displacement: input.vector,
            scaled: false,
            negated: false,
        },
        InputMode::TwoPoint => Resolved {
            start: input.start,
            displacement: input.vector - input.start,
            scaled: false,
            negated: false,
        },
        InputMode::Parametric => Resolved {
            start: input.start,
            displacement: input.vector * scalar,
            scaled: scalar != 1.0,
            negated: false,
        },
        InputMode::OriginOnly => Resolved {
            start: Vec2::ZERO,
            displacement: input.vector * scalar * sign,
            scaled: scalar != 1.0,
            negated,
        },
    }
}
