//! Client registry with a periodic counter broadcast
//!
//! Clients register a [`ClientHandle`] with a [`BroadcastService`]; once per
//! tick the service advances its counter and pushes the value to every
//! registered client. Clients may change the increment step and unregister
//! at any time.
//!
//! Delivery is non-blocking: a client that is gone or not draining its updates
//! is logged and skipped without affecting anyone else.

pub mod registry;
pub mod service;
pub mod stats;

pub use registry::{ClientHandle, ClientId, ClientRegistry, DeliveryError, Update};
pub use service::{
    BroadcastService, ControlMessage, ControlSender, RawMessage, ServiceConfig, ServiceStatus,
};
pub use stats::StatsSnapshot;
