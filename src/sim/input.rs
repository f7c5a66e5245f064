//! Player input: the raw text form, parsing and the toggles that shape it

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;

/// What "apply" does with the resolved vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    #[default]
    Move,
    Shoot,
}

/// Sign applied to chain-mode vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    Add,
    Subtract,
}

/// How sandbox input is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxMode {
    /// Tip-to-tail from the player
    #[default]
    Chain,
    /// Position vector from (0,0)
    Origin,
    /// End point minus start point
    TwoPoint,
    /// Support point plus parameter times direction
    Parametric,
}

impl SandboxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxMode::Chain => "chain",
            SandboxMode::Origin => "origin",
            SandboxMode::TwoPoint => "two-point",
            SandboxMode::Parametric => "parametric",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chain" => Some(SandboxMode::Chain),
            "origin" => Some(SandboxMode::Origin),
            "two-point" | "points" => Some(SandboxMode::TwoPoint),
            "parametric" => Some(SandboxMode::Parametric),
            _ => None,
        }
    }
}

/// A field of the input form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    X,
    Y,
    StartX,
    StartY,
    Scalar,
}

/// Raw text of the input form, exactly as typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorInput {
    pub x: String,
    pub y: String,
    pub start_x: String,
    pub start_y: String,
    pub scalar: String,
}

impl Default for VectorInput {
    fn default() -> Self {
        Self {
            x: "0".into(),
            y: "0".into(),
            start_x: "0".into(),
            start_y: "0".into(),
            scalar: "1".into(),
        }
    }
}

/// Numeric view of the form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedInput {
    pub vector: Vec2,
    pub start: Vec2,
    pub scalar: f32,
}

impl VectorInput {
    /// Form holding just a vector
    pub fn vector(x: f32, y: f32) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            ..Default::default()
        }
    }

    pub fn with_start(mut self, x: f32, y: f32) -> Self {
        self.start_x = x.to_string();
        self.start_y = y.to_string();
        self
    }

    pub fn with_scalar(mut self, scalar: f32) -> Self {
        self.scalar = scalar.to_string();
        self
    }

    pub fn field(&self, field: InputField) -> &str {
        match field {
            InputField::X => &self.x,
            InputField::Y => &self.y,
            InputField::StartX => &self.start_x,
            InputField::StartY => &self.start_y,
            InputField::Scalar => &self.scalar,
        }
    }

    fn field_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::X => &mut self.x,
            InputField::Y => &mut self.y,
            InputField::StartX => &mut self.start_x,
            InputField::StartY => &mut self.start_y,
            InputField::Scalar => &mut self.scalar,
        }
    }

    pub fn parse(&self) -> ParsedInput {
        ParsedInput {
            vector: Vec2::new(parse_number(&self.x), parse_number(&self.y)),
            start: Vec2::new(parse_number(&self.start_x), parse_number(&self.start_y)),
            scalar: parse_scalar(&self.scalar),
        }
    }
}

/// Longest numeric prefix of `text` ("3abc" reads as 3), if any
pub fn leading_number(text: &str) -> Option<f32> {
    let text = text.trim();
    text.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| text[..end].parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

/// Text without a numeric prefix counts as 0
pub fn parse_number(text: &str) -> f32 {
    leading_number(text).unwrap_or(0.0)
}

/// Scalar text that is empty, non-numeric or zero means 1
pub fn parse_scalar(text: &str) -> f32 {
    let scalar = parse_number(text);
    if scalar == 0.0 { 1.0 } else { scalar }
}

impl GameState {
    /// Edit a form field. Vector components that violate the level's input
    /// constraints are rejected and leave the field unchanged.
    pub fn edit_input(&mut self, field: InputField, text: &str) -> bool {
        if matches!(field, InputField::X | InputField::Y) {
            let constraints = self.level().constraints;
            // Text that does not parse yet (e.g. "-" while typing) is let through
            if let Some(value) = leading_number(text) {
                if !constraints.accepts(value) {
                    log::debug!("Rejected input {:?} = {:?}", field, text);
                    return false;
                }
            }
        }
        *self.input.field_mut(field) = text.to_string();
        true
    }

    pub fn toggle_action_mode(&mut self, mode: ActionMode) {
        self.action = mode;
    }

    pub fn toggle_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    /// Change how sandbox input is read; ignored outside the sandbox
    pub fn switch_sandbox_mode(&mut self, mode: SandboxMode) -> bool {
        if !self.is_sandbox() {
            return false;
        }
        self.sandbox_mode = mode;
        true
    }
}
