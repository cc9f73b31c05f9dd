//! Periodic counter broadcast service
//!
//! A [`BroadcastService`] owns a counter and an increment step. While running,
//! a single tick task advances the counter once per interval and pushes the
//! new value to every registered client, as an integer and as a string
//! (`prefix + counter + suffix`). Control messages register and unregister
//! clients or replace the increment step.
//!
//! ```text
//!   handle_control_message() ─┐
//!                             ├──► Core { state, registry } ◄── tick task
//!   bind() ─► mpsc ─► control ┘                                 (interval)
//!                     task                                          │
//!                                                                   ▼
//!                                             Int(counter), Str("ab{counter}cd")
//!                                                      to every client
//! ```
//!
//! `stop()` signals both tasks, waits for them for a bounded grace period and
//! clears the registry. A stopped service stays stopped.

pub mod broadcaster;
pub mod config;
pub mod message;
pub mod state;

pub use broadcaster::{BroadcastService, ControlSender};
pub use config::ServiceConfig;
pub use message::{ControlMessage, RawMessage};
pub use state::{ServiceState, ServiceStatus};
