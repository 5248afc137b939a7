//! Shared types for the campus exploration core.
//!
//! # Invariants
//! - Entity ids come from the scene registry and are never generated at runtime.
//! - Vector helpers never return NaN for degenerate input.

pub mod math;
pub mod types;

pub use math::{flatten, lerp_factor, retention_factor};
pub use types::EntityId;

pub fn crate_info() -> &'static str {
    "campus-common v0.1.0"
}
