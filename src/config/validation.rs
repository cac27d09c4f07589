//! Derivation rules applied while resolving the configuration.
//!
//! # Responsibilities
//! - Parse the enumerated and numeric fields into typed values
//! - Enforce the replica data-expiry floor
//! - Pick the parallelism ceiling
//!
//! All functions here are pure; the loader owns file access.

use std::num::{NonZeroUsize, ParseIntError};
use std::str::FromStr;

use crate::config::error::ConfigError;
use crate::config::schema::{DataExpiry, LogLevel, Mode};

/// Accept only the supported deployment mode.
pub fn parse_mode(raw: &str) -> Result<Mode, ConfigError> {
    match raw.trim() {
        Mode::EASY_DEPLOY => Ok(Mode::EasyDeploy),
        other => Err(ConfigError::UnsupportedMode(other.to_string())),
    }
}

/// Parse an integer field, naming the field in the error.
pub fn parse_number<T>(section: &'static str, key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumericField {
            section,
            key,
            value: raw.to_string(),
            source,
        })
}

/// Replica data expiry.
///
/// Unset means cached data never expires. A configured value below twice
/// the master check interval is raised to that floor.
pub fn data_expiry(configured: Option<i64>, check_master_interval_secs: u64) -> DataExpiry {
    let Some(configured) = configured else {
        return DataExpiry::Never;
    };

    let floor = check_master_interval_secs.saturating_mul(2);
    match u64::try_from(configured) {
        Ok(secs) if secs >= floor => DataExpiry::After(secs),
        _ => {
            tracing::warn!(
                configured,
                check_master_interval_secs,
                applied = floor,
                "data_expires below twice the master check interval, raising it"
            );
            DataExpiry::After(floor)
        }
    }
}

/// Parallelism ceiling: `0` means every available processing unit.
pub fn effective_max_threads(requested: usize) -> usize {
    match requested {
        0 => available_processing_units(),
        n => n,
    }
}

/// Runtime worker threads for a parallelism ceiling.
///
/// The ceiling bounds parallelism; it never creates more workers than there
/// are processing units to run them.
pub fn worker_threads(max_threads: usize) -> usize {
    max_threads.clamp(1, available_processing_units())
}

pub fn available_processing_units() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Validate `--log-level`; debug mode overrides it with DEBUG.
pub fn resolve_log_level(raw: &str, debug_mode: bool) -> Result<LogLevel, ConfigError> {
    let level = raw
        .parse::<LogLevel>()
        .map_err(|e| ConfigError::InvalidLogLevel(e.0))?;
    Ok(if debug_mode { LogLevel::Debug } else { level })
}
