//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Intent`]s and tracks held
//! keys so each tick can be handed the full set of active intents, including
//! on terminals without key-release events.

pub mod handler;
pub mod map;

pub use tetrion_types as types;

pub use handler::{InputHandler, TickIntents};
pub use map::{intent_for_code, should_quit};
