//! Configuration errors. Every variant is fatal at startup.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file path cannot be resolved or opened.
    #[error("no correct config file: {} - {source}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid INI.
    #[error("no correct config file: {} - {message}", path.display())]
    ConfigMalformed { path: PathBuf, message: String },

    #[error("only easy_deploy mode supported, got {0:?}")]
    UnsupportedMode(String),

    /// A field that must be an integer does not parse as one.
    #[error("[{section}] {key} is not a valid number: {value:?} - {source}")]
    InvalidNumericField {
        section: &'static str,
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unknown log level {0:?}, expected DEBUG | INFO | WARN | ERROR | FATAL | PANIC")]
    InvalidLogLevel(String),
}
