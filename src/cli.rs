//! Command-line surface of the node binary.
//!
//! Flags follow the historical single-dash-or-double-dash, `--flag=value`
//! style: `-config=x.ini` and `--config=x.ini` are the same flag, and boolean
//! switches accept both `--debug` and `--debug=false`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::schema::LogLevel;

/// The literal positional word that asks a running node to reload.
pub const RELOAD_COMMAND: &str = "reload";

/// Long flags that may also be spelled with a single dash.
const LONG_FLAGS: [&str; 5] = ["config", "max-thread", "debug", "log-level", "version"];

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "instafig")]
#[command(about = "Instafig configuration node", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Service config file (default: <cwd>/conf/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Max threads of service (0 = all available processing units)
    #[arg(long = "max-thread", default_value_t = 0)]
    pub max_thread: usize,

    /// Debug mode
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub debug: bool,

    /// DEBUG | INFO | WARN | ERROR | FATAL | PANIC
    #[arg(long = "log-level", default_value = "INFO")]
    pub log_level: String,

    /// Show version info
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub version: bool,
}

impl Cli {
    /// Level for the bootstrap logger, before the flags are validated.
    ///
    /// An unparsable `--log-level` falls back to INFO here; resolution later
    /// reports it as a fatal error.
    pub fn initial_log_level(&self) -> LogLevel {
        if self.debug {
            return LogLevel::Debug;
        }
        self.log_level.parse().unwrap_or(LogLevel::Info)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            max_thread: 0,
            debug: false,
            log_level: "INFO".to_string(),
            version: false,
        }
    }
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Sole positional argument `reload`: signal the running instance.
    Reload,
    /// Regular start (or `--version`).
    Run(Cli),
}

impl Invocation {
    /// Classify a full argument vector, program name included.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).map(normalize_flag).collect();
        if args.len() == 2 && args[1] == RELOAD_COMMAND {
            return Ok(Invocation::Reload);
        }
        Cli::try_parse_from(args).map(Invocation::Run)
    }

    /// Classify the current process arguments, exiting on usage errors.
    pub fn from_env() -> Self {
        Self::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Level used for diagnostics until the configuration is resolved.
    pub fn initial_log_level(&self) -> LogLevel {
        match self {
            Invocation::Reload => LogLevel::Info,
            Invocation::Run(cli) => cli.initial_log_level(),
        }
    }
}

/// Rewrite `-name[=value]` to `--name[=value]` for the known long flags.
fn normalize_flag(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
        return arg;
    };
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    if LONG_FLAGS.contains(&name) {
        OsString::from(format!("-{text}"))
    } else {
        arg
    }
}
