//! Scene registry: the static list of interactable entities supplied at scene load.
//!
//! # Invariants
//! - A registry that loads successfully is fully validated; nothing in it can
//!   fail mid-tick.
//! - Entity order is the authored order and is the iteration order used by the
//!   proximity router.

mod entity;
mod registry;

pub use entity::{EntityKind, InteractableEntity, ObjectKind};
pub use registry::{DEFAULT_SPAWN, SceneCounts, SceneError, SceneRegistry};

pub fn crate_info() -> &'static str {
    "campus-scene v0.1.0"
}
