//! Resolved configuration types.
//!
//! `ResolvedConfig` is built once at startup and handed by reference to
//! every consumer. Secrets are skipped when the value is serialized for
//! diagnostics.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Root configuration for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Absolute path of the INI file this value was read from.
    pub config_path: PathBuf,

    /// Deployment mode.
    pub mode: Mode,

    /// Bind address of the HTTP-facing API.
    pub http_addr: String,

    /// Storage backend, selected by `mode`.
    pub storage: StorageConfig,

    /// Node identity and role.
    pub node: NodeConfig,

    pub debug_mode: bool,

    pub log_level: LogLevel,

    /// Parallelism ceiling, never zero.
    pub max_threads: usize,
}

impl ResolvedConfig {
    pub fn is_master(&self) -> bool {
        self.node.role.is_master()
    }

    /// Runtime worker threads: the ceiling, bounded by the host's units.
    pub fn worker_threads(&self) -> usize {
        crate::config::validation::worker_threads(self.max_threads)
    }

    /// Master address, replicas only.
    pub fn master_addr(&self) -> Option<&str> {
        self.node.role.replica().map(|r| r.master_addr.as_str())
    }

    pub fn check_master_interval_secs(&self) -> Option<u64> {
        self.node.role.replica().map(|r| r.check_master_interval_secs)
    }

    /// Data expiry in seconds, `-1` meaning never. `None` on a master.
    pub fn data_expires_secs(&self) -> Option<i64> {
        self.node.role.replica().map(|r| r.data_expires.as_secs())
    }
}

/// Deployment mode. Only the embedded-store mode is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    EasyDeploy,
}

impl Mode {
    pub const EASY_DEPLOY: &'static str = "easy_deploy";

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::EasyDeploy => Self::EASY_DEPLOY,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Embedded file store used in easy-deploy mode.
    Sqlite(SqliteConfig),

    /// External SQL database. Not selected by any supported mode yet.
    Database(DatabaseConfig),
}

/// `[sqlite]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqliteConfig {
    pub dir: String,
    pub filename: String,
}

impl SqliteConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.filename)
    }
}

/// `[db]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub db_name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// `[node]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub role: NodeRole,

    /// Address used for inter-node traffic.
    pub node_addr: String,

    /// Address used for client traffic.
    pub client_addr: String,

    /// Shared secret between nodes.
    #[serde(skip_serializing)]
    pub auth_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeRole {
    Master,
    Replica(ReplicaConfig),
}

impl NodeRole {
    /// Node type value that selects the master role.
    pub const MASTER: &'static str = "master";

    pub fn is_master(&self) -> bool {
        matches!(self, NodeRole::Master)
    }

    pub fn replica(&self) -> Option<&ReplicaConfig> {
        match self {
            NodeRole::Master => None,
            NodeRole::Replica(replica) => Some(replica),
        }
    }
}

/// Settings that only exist on a replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaConfig {
    pub master_addr: String,
    pub check_master_interval_secs: u64,
    pub data_expires: DataExpiry,
}

/// How long locally cached data stays fresh on a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataExpiry {
    Never,
    After(u64),
}

impl DataExpiry {
    /// Seconds, with `-1` standing for [`DataExpiry::Never`].
    pub fn as_secs(&self) -> i64 {
        match self {
            DataExpiry::Never => -1,
            DataExpiry::After(secs) => i64::try_from(*secs).unwrap_or(i64::MAX),
        }
    }
}

impl Serialize for DataExpiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_secs())
    }
}

/// Log verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Panic => "PANIC",
        }
    }

    /// `tracing` filter directive. FATAL and PANIC collapse onto `error`.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "PANIC" => Ok(LogLevel::Panic),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}
