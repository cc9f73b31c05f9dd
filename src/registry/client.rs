//! Client identity, handle and update types
//!
//! A client is identified by an explicit [`ClientId`] compared by value. The
//! handle pairs that id with the sending half of the client's update channel.

use tokio::sync::mpsc;

use super::error::DeliveryError;

/// Stable identifier for a subscribed client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Create a client id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw value of the id
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ClientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Update pushed from the service to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Latest counter value
    Int(i64),
    /// Derived string view of the counter
    Str(String),
}

/// Handle to one subscriber
///
/// Cheap to clone; clones share the same underlying channel.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    tx: mpsc::Sender<Update>,
}

impl ClientHandle {
    /// Create a handle from an existing update sender
    pub fn new(id: ClientId, tx: mpsc::Sender<Update>) -> Self {
        Self { id, tx }
    }

    /// Create a handle together with the receiver the client reads updates from
    pub fn channel(id: ClientId, capacity: usize) -> (Self, mpsc::Receiver<Update>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(id, tx), rx)
    }

    /// Client identity
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Push an update without waiting
    ///
    /// A full buffer is reported instead of awaited so that one stuck client
    /// never holds up the others.
    pub fn send(&self, update: Update) -> Result<(), DeliveryError> {
        self.tx.try_send(update).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Backlogged(self.id),
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Disconnected(self.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_update() {
        let (handle, mut rx) = ClientHandle::channel(ClientId::new(1), 4);

        handle.send(Update::Int(7)).unwrap();
        handle.send(Update::Str("ab7cd".into())).unwrap();

        assert_eq!(rx.recv().await, Some(Update::Int(7)));
        assert_eq!(rx.recv().await, Some(Update::Str("ab7cd".into())));
    }

    #[test]
    fn test_send_to_dropped_receiver() {
        let (handle, rx) = ClientHandle::channel(ClientId::new(3), 4);
        drop(rx);

        assert_eq!(
            handle.send(Update::Int(1)),
            Err(DeliveryError::Disconnected(ClientId::new(3)))
        );
    }

    #[test]
    fn test_send_to_full_buffer() {
        let (handle, _rx) = ClientHandle::channel(ClientId::new(4), 1);

        handle.send(Update::Int(1)).unwrap();
        let err = handle.send(Update::Int(2)).unwrap_err();

        assert_eq!(err, DeliveryError::Backlogged(ClientId::new(4)));
        assert_eq!(err.client(), ClientId::new(4));
        assert_eq!(err.to_string(), "Client backlogged: client-4");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (handle, _rx) = ClientHandle::channel(ClientId::new(5), 0);
        assert!(handle.send(Update::Int(1)).is_ok());
    }
}
