//! Support library for the graphgen CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and
//! integration tests can drive a full run without spawning a process.

pub mod cli;
pub mod logging;
