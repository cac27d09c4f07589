//! Configuration loading from disk.
//!
//! The INI file is the only configuration source besides the command line;
//! the environment is never consulted. Missing keys read as empty strings.

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::cli::Cli;
use crate::config::error::ConfigError;
use crate::config::schema::{
    DatabaseConfig, Mode, NodeConfig, NodeRole, ReplicaConfig, ResolvedConfig, SqliteConfig,
    StorageConfig,
};
use crate::config::validation::{
    data_expiry, effective_max_threads, parse_mode, parse_number, resolve_log_level,
};

/// Config file location relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "conf/config.ini";

const SQLITE: &str = "sqlite";
const DB: &str = "db";
const NODE: &str = "node";

/// Absolute path of the config file to read.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    match explicit {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd.join(DEFAULT_CONFIG_FILE),
    }
}

/// Load and resolve the configuration named by the command line.
pub fn load_config(cli: &Cli, cwd: &Path) -> Result<ResolvedConfig, ConfigError> {
    let path = config_path(cli.config.as_deref(), cwd);
    let ini = read_ini(&path)?;

    tracing::debug!(path = %path.display(), "Config file loaded");
    resolve(&ini, path, cli)
}

/// Parse the INI file at `path`.
pub fn read_ini(path: &Path) -> Result<Ini, ConfigError> {
    Ini::load_from_file(path).map_err(|e| match e {
        ini::Error::Io(source) if source.kind() == io::ErrorKind::InvalidData => {
            ConfigError::ConfigMalformed {
                path: path.to_path_buf(),
                message: source.to_string(),
            }
        }
        ini::Error::Io(source) => ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
            source,
        },
        other => ConfigError::ConfigMalformed {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Build the typed configuration from an already parsed INI document.
pub fn resolve(ini: &Ini, config_path: PathBuf, cli: &Cli) -> Result<ResolvedConfig, ConfigError> {
    let mode = parse_mode(value(ini, None, "mode"))?;
    let http_addr = value(ini, None, "addr").to_string();
    let storage = read_storage(ini, mode)?;
    let node = read_node(ini)?;

    let log_level = resolve_log_level(&cli.log_level, cli.debug)?;
    let max_threads = effective_max_threads(cli.max_thread);

    Ok(ResolvedConfig {
        config_path,
        mode,
        http_addr,
        storage,
        node,
        debug_mode: cli.debug,
        log_level,
        max_threads,
    })
}

fn read_storage(ini: &Ini, mode: Mode) -> Result<StorageConfig, ConfigError> {
    match mode {
        Mode::EasyDeploy => Ok(StorageConfig::Sqlite(read_sqlite(ini))),
    }
}

/// `[sqlite]` section.
pub fn read_sqlite(ini: &Ini) -> SqliteConfig {
    SqliteConfig {
        dir: value(ini, Some(SQLITE), "dir").to_string(),
        filename: value(ini, Some(SQLITE), "filename").to_string(),
    }
}

/// `[db]` section, for an external SQL database.
pub fn read_database(ini: &Ini) -> Result<DatabaseConfig, ConfigError> {
    Ok(DatabaseConfig {
        driver: value(ini, Some(DB), "driver").to_string(),
        db_name: value(ini, Some(DB), "db_name").to_string(),
        host: value(ini, Some(DB), "host").to_string(),
        port: parse_number(DB, "port", value(ini, Some(DB), "port"))?,
        password: value(ini, Some(DB), "passwd").to_string(),
        user: value(ini, Some(DB), "user").to_string(),
    })
}

/// `[node]` section. Replica-only keys are not looked at on a master.
pub fn read_node(ini: &Ini) -> Result<NodeConfig, ConfigError> {
    let role = if value(ini, Some(NODE), "type") == NodeRole::MASTER {
        NodeRole::Master
    } else {
        NodeRole::Replica(read_replica(ini)?)
    };

    Ok(NodeConfig {
        role,
        node_addr: value(ini, Some(NODE), "node_addr").to_string(),
        client_addr: value(ini, Some(NODE), "client_addr").to_string(),
        auth_token: value(ini, Some(NODE), "node_auth").to_string(),
    })
}

fn read_replica(ini: &Ini) -> Result<ReplicaConfig, ConfigError> {
    let master_addr = value(ini, Some(NODE), "master_addr").to_string();
    let check_master_interval_secs: u64 = parse_number(
        NODE,
        "check_master_interval",
        value(ini, Some(NODE), "check_master_interval"),
    )?;

    let expires = value(ini, Some(NODE), "data_expires").trim();
    let configured = if expires.is_empty() {
        None
    } else {
        Some(parse_number::<i64>(NODE, "data_expires", expires)?)
    };

    Ok(ReplicaConfig {
        master_addr,
        check_master_interval_secs,
        data_expires: data_expiry(configured, check_master_interval_secs),
    })
}

fn value<'a>(ini: &'a Ini, section: Option<&str>, key: &str) -> &'a str {
    ini.get_from(section, key).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DataExpiry, LogLevel};

    const MASTER: &str = "\
mode = easy_deploy
addr = :17070

[sqlite]
dir = /var/lib/instafig
filename = instafig.db

[node]
type = master
node_addr = 10.0.0.1:3950
client_addr = 10.0.0.1:3960
node_auth = s3cret
";

    fn replica(node_extra: &str) -> String {
        format!(
            "mode = easy_deploy\naddr = :17070\n\n[sqlite]\ndir = data\nfilename = node.db\n\n\
             [node]\ntype = node\nnode_addr = 10.0.0.2:3950\nclient_addr = 10.0.0.2:3960\n\
             node_auth = s3cret\nmaster_addr = 10.0.0.1:3950\n{node_extra}"
        )
    }

    fn resolve_str(text: &str) -> Result<ResolvedConfig, ConfigError> {
        let ini = Ini::load_from_str(text).unwrap();
        resolve(&ini, PathBuf::from("/etc/instafig/config.ini"), &Cli::default())
    }

    #[test]
    fn easy_deploy_uses_sqlite_section() {
        let config = resolve_str(MASTER).unwrap();
        assert_eq!(config.mode, Mode::EasyDeploy);
        assert_eq!(config.http_addr, ":17070");
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite(SqliteConfig {
                dir: "/var/lib/instafig".into(),
                filename: "instafig.db".into(),
            })
        );
        assert_eq!(config.node.auth_token, "s3cret");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn unsupported_mode_is_rejected() {
        let text = MASTER.replace("easy_deploy", "cluster");
        assert!(matches!(resolve_str(&text), Err(ConfigError::UnsupportedMode(_))));

        let text = MASTER.replace("mode = easy_deploy\n", "");
        assert!(matches!(resolve_str(&text), Err(ConfigError::UnsupportedMode(_))));
    }

    #[test]
    fn master_ignores_replica_keys() {
        let text = format!("{MASTER}check_master_interval = soon\ndata_expires = later\n");
        let config = resolve_str(&text).unwrap();
        assert!(config.is_master());
        assert_eq!(config.master_addr(), None);
        assert_eq!(config.check_master_interval_secs(), None);
        assert_eq!(config.data_expires_secs(), None);
    }

    #[test]
    fn replica_without_expiry_never_expires() {
        let config = resolve_str(&replica("check_master_interval = 10\n")).unwrap();
        assert!(!config.is_master());
        assert_eq!(config.master_addr(), Some("10.0.0.1:3950"));
        assert_eq!(config.check_master_interval_secs(), Some(10));
        assert_eq!(config.data_expires_secs(), Some(-1));
    }

    #[test]
    fn replica_expiry_floor_is_enforced() {
        let config =
            resolve_str(&replica("check_master_interval = 10\ndata_expires = 5\n")).unwrap();
        assert_eq!(config.data_expires_secs(), Some(20));
    }

    #[test]
    fn replica_expiry_above_floor_is_kept() {
        let config =
            resolve_str(&replica("check_master_interval = 10\ndata_expires = 30\n")).unwrap();
        assert_eq!(config.data_expires_secs(), Some(30));
        assert_eq!(
            config.node.role.replica().map(|r| r.data_expires),
            Some(DataExpiry::After(30))
        );
    }

    #[test]
    fn replica_requires_numeric_interval() {
        let err = resolve_str(&replica("")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumericField { key: "check_master_interval", .. }
        ));

        let err = resolve_str(&replica("check_master_interval = 10\ndata_expires = 1m\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumericField { key: "data_expires", .. }
        ));
    }

    #[test]
    fn missing_node_type_is_a_replica() {
        let text = replica("check_master_interval = 4\n").replace("type = node\n", "");
        let config = resolve_str(&text).unwrap();
        assert!(!config.is_master());
    }

    #[test]
    fn database_section_parses_port() {
        let ini = Ini::load_from_str(
            "[db]\ndriver = mysql\ndb_name = instafig\nhost = db.local\nport = 3306\n\
             passwd = pw\nuser = app\n",
        )
        .unwrap();
        let db = read_database(&ini).unwrap();
        assert_eq!(db.driver, "mysql");
        assert_eq!(db.port, 3306);
        assert_eq!(db.password, "pw");

        let ini = Ini::load_from_str("[db]\nport = abc\n").unwrap();
        assert!(matches!(
            read_database(&ini),
            Err(ConfigError::InvalidNumericField { section: "db", key: "port", .. })
        ));
    }

    #[test]
    fn thread_ceiling_and_debug_flags_flow_through() {
        let ini = Ini::load_from_str(MASTER).unwrap();
        let cli = Cli {
            debug: true,
            max_thread: 2,
            ..Cli::default()
        };
        let config = resolve(&ini, PathBuf::from("/c.ini"), &cli).unwrap();
        assert!(config.debug_mode);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_threads, 2);
    }

    #[test]
    fn missing_file_is_not_found_and_binary_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        assert!(matches!(
            read_ini(&path),
            Err(ConfigError::ConfigNotFound { .. })
        ));

        std::fs::write(&path, b"mode = \xff\xfe easy_deploy\n").unwrap();
        assert!(matches!(
            read_ini(&path),
            Err(ConfigError::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn relative_config_path_is_anchored_at_cwd() {
        let cwd = Path::new("/srv/instafig");
        assert_eq!(config_path(None, cwd), PathBuf::from("/srv/instafig/conf/config.ini"));
        assert_eq!(
            config_path(Some(Path::new("alt.ini")), cwd),
            PathBuf::from("/srv/instafig/alt.ini")
        );
        assert_eq!(
            config_path(Some(Path::new("/etc/i.ini")), cwd),
            PathBuf::from("/etc/i.ini")
        );
    }
}
