//! Delivery error types
//!
//! Error types for pushing updates to a single client.

use super::client::ClientId;

/// Error type for a failed delivery to one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Client dropped its receiving end
    Disconnected(ClientId),
    /// Client's buffer is full (not draining updates)
    Backlogged(ClientId),
}

impl DeliveryError {
    /// Client the failed delivery was addressed to
    pub fn client(&self) -> ClientId {
        match self {
            DeliveryError::Disconnected(id) | DeliveryError::Backlogged(id) => *id,
        }
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Disconnected(id) => write!(f, "Client disconnected: {}", id),
            DeliveryError::Backlogged(id) => write!(f, "Client backlogged: {}", id),
        }
    }
}

impl std::error::Error for DeliveryError {}
