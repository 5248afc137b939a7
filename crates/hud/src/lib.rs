//! HUD adapter: renderer-agnostic view of the signals a session exposes.
//!
//! # Invariants
//! - A HUD never mutates the session; it only reads a captured [`HudFrame`].
//! - Frames are plain data, so any presentation layer can consume them.

mod hud;

pub use hud::{DebugTextHud, HudFrame, HudRenderer};

pub fn crate_info() -> &'static str {
    "campus-hud v0.1.0"
}
