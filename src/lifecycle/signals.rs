//! OS signal handling in a running node.
//!
//! - SIGUSR2 → [`ControlEvent::Reload`], the node keeps running
//! - SIGTERM/SIGINT → [`ControlEvent::Shutdown`], the listener returns

use std::io;

use tokio::signal::unix::{signal, SignalKind};

use crate::lifecycle::events::{ControlEvent, ControlEvents};

/// Translate signals into control events until a shutdown signal arrives.
pub async fn listen(events: ControlEvents) -> io::Result<()> {
    let mut reload = signal(SignalKind::user_defined2())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    loop {
        tokio::select! {
            _ = reload.recv() => {
                tracing::info!("Reload signal received");
                events.publish(ControlEvent::Reload);
            }
            _ = terminate.recv() => break,
            _ = interrupt.recv() => break,
        }
    }

    tracing::info!("Shutdown signal received");
    events.publish(ControlEvent::Shutdown);
    Ok(())
}
