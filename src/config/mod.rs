//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (cli.rs) + config.ini
//!     → loader.rs (path resolution, INI parsing, field extraction)
//!     → validation.rs (mode, numbers, expiry floor, thread ceiling)
//!     → ResolvedConfig (validated, immutable)
//!     → passed by reference to every subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; a reload is handled by the running
//!   server, never by rebuilding this value
//! - Storage is a tagged variant keyed by the deployment mode
//! - Errors are returned, the entry point decides to exit

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::ConfigError;
pub use loader::load_config;
pub use schema::{
    DataExpiry, DatabaseConfig, LogLevel, Mode, NodeConfig, NodeRole, ReplicaConfig,
    ResolvedConfig, SqliteConfig, StorageConfig,
};
