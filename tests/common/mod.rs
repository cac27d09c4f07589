//! Shared helpers for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[allow(dead_code)]
pub const MASTER_INI: &str = "\
mode = easy_deploy
addr = :17070

[sqlite]
dir = data
filename = instafig.db

[node]
type = master
node_addr = 127.0.0.1:3950
client_addr = 127.0.0.1:3960
node_auth = cluster-secret
";

/// Replica config with extra `[node]` lines appended.
#[allow(dead_code)]
pub fn replica_ini(node_extra: &str) -> String {
    format!(
        "mode = easy_deploy\naddr = :17071\n\n[sqlite]\ndir = data\nfilename = replica.db\n\n\
         [node]\ntype = node\nnode_addr = 127.0.0.1:3951\nclient_addr = 127.0.0.1:3961\n\
         node_auth = cluster-secret\nmaster_addr = 127.0.0.1:3950\n{node_extra}"
    )
}

/// A scratch working directory laid out like a node install.
pub struct NodeDir {
    dir: TempDir,
}

impl NodeDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[allow(dead_code)]
    /// Write `conf/config.ini` under the working directory.
    pub fn with_default_config(self, content: &str) -> Self {
        let conf = self.path().join("conf");
        fs::create_dir_all(&conf).unwrap();
        fs::write(conf.join("config.ini"), content).unwrap();
        self
    }

    #[allow(dead_code)]
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
