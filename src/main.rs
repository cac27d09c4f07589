//! Instafig node entry point.
//!
//! ```text
//! args ──▶ Invocation ──▶ bootstrap ──┬─▶ --version  → print, exit 0
//!                                     ├─▶ reload     → SIGUSR2 to instafig.pid, exit 0/1
//!                                     └─▶ run        → ResolvedConfig
//!                                                       │
//!             tokio runtime (worker_threads <= max_threads, <= cores)
//!             console silenced unless --debug
//!             signals ──▶ ControlEvents ──▶ node
//! ```
//!
//! This is the only place that turns errors into an exit status.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use instafig::config::ResolvedConfig;
use instafig::lifecycle::{signals, ControlEvent, ControlEvents, SignalChannel};
use instafig::observability::init_logging;
use instafig::{bootstrap, Invocation, Startup};

fn main() -> ExitCode {
    let invocation = Invocation::from_env();

    let console = match init_logging(invocation.initial_log_level()) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!(error = %e, "Cannot determine working directory");
            return ExitCode::FAILURE;
        }
    };

    let config = match bootstrap(&invocation, &cwd, &SignalChannel) {
        Ok(Startup::ShowVersion(version)) => {
            println!("{version}");
            return ExitCode::SUCCESS;
        }
        Ok(Startup::ReloadRequested { .. }) => return ExitCode::SUCCESS,
        Ok(Startup::Run(config)) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .thread_name("instafig-worker")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    if !config.debug_mode {
        console.silence();
    }

    match runtime.block_on(run(Arc::new(config))) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Node stopped with an error");
            ExitCode::FAILURE
        }
    }
}

/// Keep the node alive until a shutdown signal, relaying reload requests.
async fn run(config: Arc<ResolvedConfig>) -> io::Result<()> {
    match serde_json::to_string(config.as_ref()) {
        Ok(json) => tracing::debug!(config = %json, "Effective configuration"),
        Err(e) => tracing::warn!(error = %e, "Cannot render configuration"),
    }

    let events = ControlEvents::new();
    let mut rx = events.subscribe();
    let listener = tokio::spawn(signals::listen(events));

    tracing::info!(
        http_addr = %config.http_addr,
        node_addr = %config.node.node_addr,
        client_addr = %config.node.client_addr,
        master = config.is_master(),
        "Node started"
    );

    loop {
        match rx.recv().await {
            Ok(ControlEvent::Reload) => {
                tracing::info!(
                    config_file = %config.config_path.display(),
                    "Reload requested by operator"
                );
            }
            Ok(ControlEvent::Shutdown) | Err(RecvError::Closed) => break,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Control events lagged");
            }
        }
    }

    listener.await.map_err(io::Error::other)?
}
