//! Structured logging.
//!
//! One `tracing` subscriber is installed for the whole process. Its console
//! writer goes to stderr until [`ConsoleSink::silence`] is called, after which
//! every event is discarded. Outside debug mode the node silences the console
//! once its configuration is resolved.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::schema::LogLevel;

/// Console destination shared by the subscriber and the entry point.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    muted: Arc<AtomicBool>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all further console output for the rest of the process.
    pub fn silence(&self) {
        self.muted.store(true, Ordering::Release);
    }

    pub fn is_silenced(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }
}

pub enum ConsoleWriter {
    Stderr(io::Stderr),
    Discard(io::Sink),
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ConsoleWriter::Stderr(w) => w.write(buf),
            ConsoleWriter::Discard(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ConsoleWriter::Stderr(w) => w.flush(),
            ConsoleWriter::Discard(w) => w.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleSink {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        if self.is_silenced() {
            ConsoleWriter::Discard(io::sink())
        } else {
            ConsoleWriter::Stderr(io::stderr())
        }
    }
}

/// Install the global subscriber at `level`.
///
/// The filter is built from the level alone; `RUST_LOG` is not read.
pub fn init_logging(
    level: LogLevel,
) -> Result<ConsoleSink, Box<dyn std::error::Error + Send + Sync>> {
    let sink = ConsoleSink::new();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.filter_directive()))
        .with_writer(sink.clone())
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .try_init()?;

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_writes_to_stderr_until_silenced() {
        let sink = ConsoleSink::new();
        assert!(matches!(sink.make_writer(), ConsoleWriter::Stderr(_)));

        let shared = sink.clone();
        shared.silence();
        assert!(sink.is_silenced());
        assert!(matches!(sink.make_writer(), ConsoleWriter::Discard(_)));
    }

    #[test]
    fn discard_writer_accepts_everything() {
        let sink = ConsoleSink::new();
        sink.silence();
        let mut writer = sink.make_writer();
        assert_eq!(writer.write(b"hidden").unwrap(), 6);
        writer.flush().unwrap();
    }
}
