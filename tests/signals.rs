//! Reload request delivered to this very process.

use std::time::Duration;

use instafig::lifecycle::reload::{ReloadTarget, SignalChannel, PID_FILE};
use instafig::lifecycle::{signals, ControlEvent, ControlEvents};
use tokio::signal::unix::{signal, SignalKind};

mod common;

#[tokio::test]
async fn sigusr2_becomes_a_reload_event() {
    // Keep a handler registered so a stray SIGUSR2 never kills the test binary.
    let _guard = signal(SignalKind::user_defined2()).unwrap();

    let events = ControlEvents::new();
    let mut rx = events.subscribe();
    let listener = tokio::spawn(signals::listen(events));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let node = common::NodeDir::new();
    node.write(PID_FILE, &std::process::id().to_string());
    let pid = ReloadTarget::in_dir(node.path())
        .request_reload(&SignalChannel)
        .unwrap();
    assert_eq!(pid, std::process::id());

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no control event within timeout")
        .unwrap();
    assert_eq!(event, ControlEvent::Reload);

    listener.abort();
}
