//! Shared CLI infrastructure: configuration and logging.
//!
//! The binary's argument parsing and command wiring live in `main.rs`; this
//! library exposes the pieces tests and other tooling need.

pub mod config;
pub mod logging;
