//! Exploration kernel: player motion, NPC patrols, proximity interaction and
//! camera follow, advanced together once per frame.
//!
//! # Invariants
//! - Tick order is patrol, player, proximity, camera; the player position has
//!   exactly one writer per tick.
//! - All per-entity state lives in indexed records, never in callbacks, so
//!   sessions can be replayed from their input log.
//! - `Session::step` never fails; malformed frame times are clamped to zero.

pub mod config;
pub mod follow;
pub mod motion;
pub mod patrol;
pub mod proximity;
pub mod session;
pub mod view;

pub use config::{
    ConfigError, FollowConfig, InteractionConfig, MotionConfig, PatrolConfig, SessionConfig,
    TriggerMode,
};
pub use follow::CameraFollower;
pub use motion::{
    MAX_FRAME_TIME, MAX_JUMPS, MovementBasis, MovementState, PlayerMotionController, PlayerState,
};
pub use patrol::{PatrolAnimator, PatrolRuntimeState, sample_path};
pub use proximity::{
    InteractionEvent, InteractionRuntimeState, ProximityInteractionRouter, RouterOutput,
    prompt_for,
};
pub use session::{Session, SessionEvent, TickOutput, TickRecord};
pub use view::{FirstPersonView, ViewHandle};

pub fn crate_info() -> &'static str {
    "campus-kernel v0.1.0"
}
