//! Level catalog
//!
//! Levels are immutable data. The engine reads them but never mutates them;
//! object lists are copied into engine-owned state when a level starts.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SANDBOX_LEVEL;

/// Built-in catalog shipped with the game
const BUILTIN_CATALOG: &str = include_str!("../assets/levels.json");

/// Which operations a level allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mechanics {
    pub allow_add: bool,
    pub allow_subtract: bool,
    pub allow_scalar: bool,
    /// Every vector starts at the origin (position vectors)
    pub origin_only: bool,
    pub has_monster: bool,
}

/// Input restrictions enforced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// When false, negative components cannot be typed (forces subtract mode)
    pub allow_negative_input: bool,
    /// Largest component that can be typed (forces scalar use)
    pub max_input_value: Option<f32>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            allow_negative_input: true,
            max_input_value: None,
        }
    }
}

impl Constraints {
    /// Effective input cap; zero or negative caps are treated as absent
    pub fn input_cap(&self) -> Option<f32> {
        self.max_input_value.filter(|max| *max > 0.0)
    }

    /// Whether a typed component value may reach the engine
    pub fn accepts(&self, value: f32) -> bool {
        if !self.allow_negative_input && value < 0.0 {
            return false;
        }
        if let Some(max) = self.input_cap() {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// Kind of a level object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Coin,
    Ammo,
    Monster,
}

/// Object as placed by the level author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub id: String,
    pub pos: Vec2,
    pub kind: ObjectKind,
    /// Hit points (monsters only)
    #[serde(default)]
    pub hp: u32,
}

/// Decorative drawing primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    Vector,
    Line,
    Point,
    Label,
}

/// Decorative element drawn on the grid (core-inert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticVisual {
    pub kind: VisualKind,
    pub pos: Vec2,
    /// Direction for vectors and lines
    #[serde(default)]
    pub delta: Option<Vec2>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub dashed: bool,
}

impl StaticVisual {
    /// Far end of a vector or line, used for view fitting
    pub fn end(&self) -> Option<Vec2> {
        match self.kind {
            VisualKind::Vector | VisualKind::Line => Some(self.pos + self.delta.unwrap_or(Vec2::ZERO)),
            VisualKind::Point | VisualKind::Label => None,
        }
    }
}

/// Diagram shown in tutorial and cheat-sheet modals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramKind {
    PositionVector,
    VectorAddition,
    VectorSubtraction,
    ScalarMult,
    LinearComb,
    Velocity,
    UnitVector,
    NormalVector,
    DotProduct,
    Lines,
    Distance,
}

/// Modal shown before a level starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutorial {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub variables: Vec<String>,
    pub diagram: DiagramKind,
}

/// Collapsible explanation block (cheat sheet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EduContent {
    pub concept: String,
    pub explanation: String,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    pub diagram: DiagramKind,
}

/// A single level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub hint: String,
    pub mechanics: Mechanics,
    #[serde(default)]
    pub constraints: Constraints,
    pub start_pos: Vec2,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub static_visuals: Vec<StaticVisual>,
    #[serde(default)]
    pub tutorial: Option<Tutorial>,
    #[serde(default)]
    pub edu_content: Option<EduContent>,
    #[serde(default)]
    pub is_sandbox: bool,
}

/// Catalog loading/validation failure
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    /// Index 0 must be the sandbox level
    MissingSandbox,
    /// Monster without hit points
    InvalidMonster { level: u32, id: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "failed to read level catalog: {e}"),
            CatalogError::Parse(e) => write!(f, "malformed level catalog: {e}"),
            CatalogError::Empty => write!(f, "level catalog has no levels"),
            CatalogError::MissingSandbox => {
                write!(f, "level {SANDBOX_LEVEL} must be the sandbox level")
            }
            CatalogError::InvalidMonster { level, id } => {
                write!(f, "monster '{id}' in level {level} has no hit points")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

/// Ordered, 0-indexed list of levels. Index 0 is the sandbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    levels: Vec<Level>,
}

impl Catalog {
    /// Build a catalog from level definitions, validating them
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let first = levels.first().ok_or(CatalogError::Empty)?;
        if !first.is_sandbox {
            return Err(CatalogError::MissingSandbox);
        }
        for level in &levels {
            if let Some(bad) = level
                .objects
                .iter()
                .find(|o| o.kind == ObjectKind::Monster && o.hp == 0)
            {
                return Err(CatalogError::InvalidMonster {
                    level: level.id,
                    id: bad.id.clone(),
                });
            }
        }
        Ok(Self { levels })
    }

    /// Parse a catalog from its JSON form (an array of levels)
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Index of the last level
    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal level for engine tests
    pub(crate) fn level(id: u32, mechanics: Mechanics, objects: Vec<ObjectSpec>) -> Level {
        Level {
            id,
            title: format!("Level {id}"),
            description: String::new(),
            hint: String::new(),
            mechanics,
            constraints: Constraints::default(),
            start_pos: Vec2::ZERO,
            objects,
            static_visuals: Vec::new(),
            tutorial: None,
            edu_content: None,
            is_sandbox: false,
        }
    }

    pub(crate) fn sandbox() -> Level {
        let mut sandbox = level(
            0,
            Mechanics {
                allow_add: true,
                allow_subtract: true,
                allow_scalar: true,
                ..Default::default()
            },
            Vec::new(),
        );
        sandbox.is_sandbox = true;
        sandbox
    }

    pub(crate) fn object(id: &str, x: f32, y: f32, kind: ObjectKind) -> ObjectSpec {
        ObjectSpec {
            id: id.to_string(),
            pos: Vec2::new(x, y),
            kind,
            hp: if kind == ObjectKind::Monster { 3 } else { 0 },
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.get(0).unwrap().is_sandbox);

        let level1 = catalog.get(1).unwrap();
        assert!(level1.mechanics.origin_only);
        assert_eq!(level1.objects.len(), 3);

        let level3 = catalog.get(3).unwrap();
        assert!(!level3.constraints.allow_negative_input);

        let level4 = catalog.get(4).unwrap();
        assert_eq!(level4.constraints.input_cap(), Some(3.0));

        let boss = catalog.get(6).unwrap();
        assert!(boss.mechanics.has_monster);
        assert_eq!(boss.start_pos, Vec2::new(-8.0, -8.0));
        let monster = boss
            .objects
            .iter()
            .find(|o| o.kind == ObjectKind::Monster)
            .unwrap();
        assert_eq!(monster.hp, 3);

        assert!(catalog.get(7).unwrap().tutorial.is_some());
        assert_eq!(catalog.get(11).unwrap().static_visuals.len(), 2);
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_rejects_missing_sandbox() {
        let result = Catalog::from_levels(vec![level(1, Mechanics::default(), Vec::new())]);
        assert!(matches!(result, Err(CatalogError::MissingSandbox)));
    }

    #[test]
    fn test_rejects_monster_without_hp() {
        let mut boss = object("boss", 5.0, 5.0, ObjectKind::Monster);
        boss.hp = 0;
        let result = Catalog::from_levels(vec![sandbox(), level(1, Mechanics::default(), vec![boss])]);
        assert!(matches!(result, Err(CatalogError::InvalidMonster { level: 1, .. })));
    }

    #[test]
    fn test_malformed_json() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(err.to_string().starts_with("malformed level catalog"));
    }

    #[test]
    fn test_constraints_accept() {
        let open = Constraints::default();
        assert!(open.accepts(-100.0));

        let no_negative = Constraints {
            allow_negative_input: false,
            max_input_value: None,
        };
        assert!(!no_negative.accepts(-1.0));
        assert!(no_negative.accepts(0.0));

        let capped = Constraints {
            allow_negative_input: true,
            max_input_value: Some(3.0),
        };
        assert!(capped.accepts(3.0));
        assert!(!capped.accepts(3.5));

        let zero_cap = Constraints {
            allow_negative_input: true,
            max_input_value: Some(0.0),
        };
        assert_eq!(zero_cap.input_cap(), None);
        assert!(zero_cap.accepts(50.0));
    }
}
