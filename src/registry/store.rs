//! Client registry implementation
//!
//! Holds the currently subscribed clients, deduplicated by [`ClientId`].

use tokio::sync::RwLock;

use super::client::{ClientHandle, ClientId};

/// Registry of subscribed clients
///
/// Thread-safe via `RwLock`. Entries keep insertion order, and no two
/// entries share an id.
pub struct ClientRegistry {
    clients: RwLock<Vec<ClientHandle>>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
        }
    }

    /// Register a client
    ///
    /// Returns `false` without touching the registry if a client with the
    /// same id is already present.
    pub async fn register(&self, handle: ClientHandle) -> bool {
        let mut clients = self.clients.write().await;

        if clients.iter().any(|c| c.id() == handle.id()) {
            tracing::debug!(client = %handle.id(), "Client already registered");
            return false;
        }

        let id = handle.id();
        clients.push(handle);

        tracing::info!(client = %id, clients = clients.len(), "Client registered");
        true
    }

    /// Unregister a client
    ///
    /// Missing ids are expected when a disconnect races a late message, so
    /// this only reports whether anything was removed.
    pub async fn unregister(&self, id: ClientId) -> bool {
        let mut clients = self.clients.write().await;

        match clients.iter().position(|c| c.id() == id) {
            Some(index) => {
                clients.remove(index);
                tracing::info!(client = %id, clients = clients.len(), "Client unregistered");
                true
            }
            None => {
                tracing::debug!(client = %id, "Unregister for unknown client");
                false
            }
        }
    }

    /// Copy of the current entries, in insertion order
    pub async fn snapshot(&self) -> Vec<ClientHandle> {
        self.clients.read().await.clone()
    }

    /// Visit every client of a snapshot taken at call time
    ///
    /// The lock is released before `f` runs, so `f` may be slow and clients
    /// registered or removed meanwhile do not affect this pass.
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&ClientHandle),
    {
        for handle in self.snapshot().await.iter() {
            f(handle);
        }
    }

    /// Ids of the registered clients, in insertion order
    pub async fn ids(&self) -> Vec<ClientId> {
        self.clients.read().await.iter().map(ClientHandle::id).collect()
    }

    /// Check whether a client is registered
    pub async fn contains(&self, id: ClientId) -> bool {
        self.clients.read().await.iter().any(|c| c.id() == id)
    }

    /// Number of registered clients
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Check whether no client is registered
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Drop every client, returning how many were removed
    pub async fn clear(&self) -> usize {
        let mut clients = self.clients.write().await;
        let removed = clients.len();
        clients.clear();
        removed
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
