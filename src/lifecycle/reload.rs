//! Reload control plane, client side.
//!
//! The operator runs `instafig reload` in the working directory of a live
//! node. The pid of that node is read from `instafig.pid` (written by the
//! server, never by this module) and a reload request is delivered to it.
//! Delivery is fire-and-forget: the node's acknowledgement is not awaited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Pid file name, relative to the node's working directory.
pub const PID_FILE: &str = "instafig.pid";

#[derive(Debug, Error)]
pub enum ReloadError {
    /// The pid file is missing, unreadable, empty or holds no valid pid.
    #[error("reload target unavailable ({}): {reason}", path.display())]
    TargetUnavailable { path: PathBuf, reason: String },

    #[error("failed to restart Instafig service (pid {pid}): {source}")]
    SignalFailed {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

/// Requests a running node understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Reload,
}

/// Transport that carries a request to another process.
pub trait ControlChannel {
    fn deliver(&self, pid: u32, request: ControlRequest) -> io::Result<()>;
}

/// Delivers requests as POSIX signals. Reload is SIGUSR2.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalChannel;

impl SignalChannel {
    fn signal_for(request: ControlRequest) -> libc::c_int {
        match request {
            ControlRequest::Reload => libc::SIGUSR2,
        }
    }
}

impl ControlChannel for SignalChannel {
    fn deliver(&self, pid: u32, request: ControlRequest) -> io::Result<()> {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        // SAFETY: kill has no memory-safety preconditions; pid is strictly positive.
        let rc = unsafe { libc::kill(pid, Self::signal_for(request)) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

/// A running instance, identified by its pid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTarget {
    pid_file: PathBuf,
}

impl ReloadTarget {
    pub fn new(pid_file: impl Into<PathBuf>) -> Self {
        Self {
            pid_file: pid_file.into(),
        }
    }

    /// The instance started from `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PID_FILE))
    }

    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }

    /// Read the ASCII decimal pid.
    pub fn read_pid(&self) -> Result<u32, ReloadError> {
        let content = fs::read_to_string(&self.pid_file)
            .map_err(|e| self.unavailable(format!("failed to read pid file: {e}")))?;

        let raw = content.trim();
        if raw.is_empty() {
            return Err(self.unavailable("no pid in pid file".to_string()));
        }

        // Only strictly positive values that fit the OS pid type name a process.
        match raw.parse::<libc::pid_t>() {
            Ok(pid) if pid > 0 => u32::try_from(pid)
                .map_err(|_| self.unavailable(format!("invalid pid {raw:?}"))),
            _ => Err(self.unavailable(format!("invalid pid {raw:?}"))),
        }
    }

    /// Ask the instance to reload. Returns the pid the request went to.
    pub fn request_reload(&self, channel: &dyn ControlChannel) -> Result<u32, ReloadError> {
        let pid = self.read_pid()?;
        channel
            .deliver(pid, ControlRequest::Reload)
            .map_err(|source| ReloadError::SignalFailed { pid, source })?;

        tracing::info!(pid, pid_file = %self.pid_file.display(), "Reload requested");
        Ok(pid)
    }

    fn unavailable(&self, reason: String) -> ReloadError {
        ReloadError::TargetUnavailable {
            path: self.pid_file.clone(),
            reason,
        }
    }
}
