//! Level state machine and vector engine
//!
//! All gameplay logic lives here. This module stays deterministic:
//! - Fixed animation frames only
//! - Deferred transitions counted in frames, guarded by level generation
//! - No rendering or platform dependencies

pub mod collision;
pub mod hint;
pub mod history;
pub mod input;
pub mod resolve;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{objectives_met, projectile_hits, within_pickup};
pub use hint::{constrain, nearest_coin, suggest};
pub use input::{ActionMode, InputField, Operation, ParsedInput, SandboxMode, VectorInput};
pub use resolve::{InputMode, Resolved, resolve};
pub use schedule::{Deferred, Scheduler};
pub use snapshot::{Snapshot, VectorView};
pub use state::{
    ApplyOutcome, GameObject, GamePhase, GameState, Hint, HintTarget, Projectile, Refusal,
    VectorKind, VectorRecord,
};
pub use tick::{FrameClock, tick};
