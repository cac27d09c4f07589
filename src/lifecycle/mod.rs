//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse invocation → --version | reload | resolve config
//!
//! Reload, operator side (reload.rs):
//!     instafig.pid → pid → SIGUSR2 → exit
//!
//! Reload, node side (signals.rs → events.rs):
//!     SIGUSR2 → ControlEvent::Reload → subscribers
//!     SIGTERM/SIGINT → ControlEvent::Shutdown → exit
//! ```
//!
//! # Design Decisions
//! - The resolved configuration is never rebuilt in-process; reloading is
//!   the running server's job once it sees the event
//! - Fail fast: any startup error is fatal, but only `main` exits

pub mod events;
pub mod reload;
pub mod signals;
pub mod startup;

pub use events::{ControlEvent, ControlEvents};
pub use reload::{ControlChannel, ReloadError, ReloadTarget, SignalChannel};
