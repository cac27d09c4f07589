//! Startup orchestration.
//!
//! Decides what this process does from its invocation: print the version,
//! send a reload request to a running node, or resolve the configuration
//! for a node that is about to start. Nothing here exits the process; the
//! entry point maps the outcome to an exit status.

use std::path::Path;

use thiserror::Error;

use crate::cli::Invocation;
use crate::config::error::ConfigError;
use crate::config::loader::load_config;
use crate::config::schema::ResolvedConfig;
use crate::lifecycle::reload::{ControlChannel, ReloadError, ReloadTarget};
use crate::version::version_string;

/// Outcome of a successful bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// `--version`: print and exit 0.
    ShowVersion(String),
    /// `reload`: the running node with this pid was signaled, exit 0.
    ReloadRequested { pid: u32 },
    /// Regular start with a validated configuration.
    Run(ResolvedConfig),
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reload(#[from] ReloadError),
}

/// Resolve what to do for `invocation`, relative to working directory `cwd`.
///
/// `--version` wins before any file access; `reload` never touches the
/// config file.
pub fn bootstrap(
    invocation: &Invocation,
    cwd: &Path,
    channel: &dyn ControlChannel,
) -> Result<Startup, StartupError> {
    match invocation {
        Invocation::Run(cli) if cli.version => Ok(Startup::ShowVersion(version_string())),
        Invocation::Reload => {
            let pid = ReloadTarget::in_dir(cwd).request_reload(channel)?;
            Ok(Startup::ReloadRequested { pid })
        }
        Invocation::Run(cli) => {
            let config = load_config(cli, cwd)?;
            tracing::info!(
                config_file = %config.config_path.display(),
                mode = %config.mode,
                http_addr = %config.http_addr,
                master = config.is_master(),
                max_threads = config.max_threads,
                log_level = %config.log_level,
                "Configuration loaded"
            );
            Ok(Startup::Run(config))
        }
    }
}
