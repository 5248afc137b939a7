//! Input: keyboard state mapped to the per-tick action sample.
//!
//! # Invariants
//! - The simulation consumes `InputSample`s, never raw key events.
//! - Exactly one sample is produced per tick.

pub mod action;
pub mod bindings;

pub use action::{Action, InputError, InputSample};
pub use bindings::{InputState, KeyBindings};

pub fn crate_info() -> &'static str {
    "campus-input v0.1.0"
}
