//! Developer tooling: read-only inspection of a running exploration session.
//!
//! # Invariants
//! - Tools never mutate the session.

mod inspector;

pub use inspector::{EntityInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "campus-tools v0.1.0"
}
