//! Client registry for update fan-out
//!
//! The registry tracks which clients are subscribed to the broadcast service.
//! Each client is a [`ClientHandle`]: a stable [`ClientId`] plus the sending
//! half of a bounded `tokio::sync::mpsc` channel.
//!
//! # Architecture
//!
//! ```text
//!                      ClientRegistry
//!                 ┌──────────────────────┐
//!                 │ clients: RwLock<Vec< │
//!                 │   ClientHandle {     │
//!                 │     id: ClientId,    │
//!                 │     tx: mpsc::Tx,    │
//!                 │   }                  │
//!                 │ >>                   │
//!                 └──────────┬───────────┘
//!                            │ snapshot()
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!     try_send()        try_send()        try_send()
//!          │                 │                 │
//!     [client A]        [client B]        [client C]
//! ```
//!
//! Broadcasting iterates a cloned snapshot with the lock released, so a slow
//! or disconnected client never blocks registration or the other clients.

pub mod client;
pub mod error;
pub mod store;

pub use client::{ClientHandle, ClientId, Update};
pub use error::DeliveryError;
pub use store::ClientRegistry;
