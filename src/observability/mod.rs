//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing` in every module
//! - Level comes from the command line, never from the environment
//! - Production mode keeps logging wired but silences the console

pub mod logging;

pub use logging::{init_logging, ConsoleSink};
