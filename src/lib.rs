//! Tetrion (workspace facade crate).
//!
//! Re-exports the simulation, input and shared types crates under one name
//! and hosts the terminal presentation used by the `tetrion` binary.

pub use tetrion_core as core;
pub use tetrion_input as input;
pub use tetrion_types as types;

pub mod term;
