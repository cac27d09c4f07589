//! Instafig node bootstrap library.
//!
//! Resolves the startup configuration of a master or replica node and
//! carries the reload control plane used between a running node and the
//! operator's `reload` command.

pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod version;

pub use cli::{Cli, Invocation};
pub use config::schema::ResolvedConfig;
pub use lifecycle::startup::{bootstrap, Startup, StartupError};
