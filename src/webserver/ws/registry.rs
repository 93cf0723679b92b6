/// Connection registry - authoritative identity → connection mapping
///
/// The registry is the single source of truth for "who is online". It owns
/// the only shared mutable structure in the relay: a username-keyed map of
/// connection handles behind one async RwLock. All delivery happens outside
/// the lock using `snapshot()`, so a slow recipient never blocks a
/// registration or another delivery.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::{
    arguments::is_debug_ws_enabled,
    logger::{self, LogTag},
};

use super::message::RelayFrame;

// ============================================================================
// CONNECTION HANDLE
// ============================================================================

/// Connection ID (unique per WebSocket connection, process-local)
pub type ConnectionId = u64;

/// Handle to one live connection: its id plus the sending half of its
/// bounded outbound queue. Cloneable; the socket itself stays with the
/// connection's own task.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    conn_id: ConnectionId,
    sender: mpsc::Sender<RelayFrame>,
}

impl ConnectionHandle {
    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    /// Queue a frame without waiting. A full or closed queue is the
    /// caller's signal to record a delivery failure; it never blocks.
    pub fn try_send(&self, frame: RelayFrame) -> Result<(), mpsc::error::TrySendError<RelayFrame>> {
        self.sender.try_send(frame)
    }
}

// ============================================================================
// CONNECTION REGISTRY
// ============================================================================

/// Identity-keyed registry of live connections
pub struct ConnectionRegistry {
    /// Active connections (username → handle). Never exposed raw.
    connections: RwLock<HashMap<String, ConnectionHandle>>,

    /// Next connection ID
    next_conn_id: AtomicU64,

    /// Per-connection outbound queue capacity (from config)
    buffer_size: usize,
}

impl ConnectionRegistry {
    pub fn new(buffer_size: usize) -> Arc<Self> {
        Arc::new(Self {
            connections: RwLock::new(HashMap::new()),
            next_conn_id: AtomicU64::new(1),
            buffer_size,
        })
    }

    /// Allocate a fresh connection id and its bounded outbound queue.
    ///
    /// The receiver half goes to the connection's own task; the handle is
    /// what gets registered under the username.
    pub fn open_connection(&self) -> (ConnectionHandle, mpsc::Receiver<RelayFrame>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(self.buffer_size);

        (
            ConnectionHandle {
                conn_id,
                sender: tx,
            },
            rx,
        )
    }

    /// Insert or replace the entry for an identity. Always succeeds.
    ///
    /// Returns the superseded handle when the identity was already
    /// registered; the caller owns closing it (the registry never closes
    /// connections itself).
    pub async fn register(&self, identity: &str, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let conn_id = handle.conn_id;
        let previous = self
            .connections
            .write()
            .await
            .insert(identity.to_string(), handle);

        if is_debug_ws_enabled() {
            logger::debug(
                LogTag::Ws,
                &format!(
                    "Registry: {} registered as conn {} (replaced={})",
                    identity,
                    conn_id,
                    previous.is_some()
                ),
            );
        }

        previous
    }

    /// Remove the entry for an identity if present. Idempotent.
    pub async fn unregister(&self, identity: &str) -> bool {
        let removed = self.connections.write().await.remove(identity).is_some();

        if removed && is_debug_ws_enabled() {
            logger::debug(LogTag::Ws, &format!("Registry: {} unregistered", identity));
        }

        removed
    }

    /// Remove the entry only if it still refers to the given connection.
    ///
    /// This is the cleanup path for a connection's own read loop: a
    /// superseded connection catching up on its teardown must not evict the
    /// replacement entry.
    pub async fn unregister_exact(&self, identity: &str, conn_id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let still_ours = connections
            .get(identity)
            .map(|current| current.conn_id == conn_id)
            .unwrap_or(false);
        if !still_ours {
            return false;
        }
        connections.remove(identity);
        drop(connections);

        if is_debug_ws_enabled() {
            logger::debug(
                LogTag::Ws,
                &format!("Registry: {} (conn {}) unregistered", identity, conn_id),
            );
        }
        true
    }

    /// Point-in-time copy of all entries, sorted by identity.
    ///
    /// Safe to iterate for delivery without holding the registry lock.
    pub async fn snapshot(&self) -> Vec<(String, ConnectionHandle)> {
        let connections = self.connections.read().await;
        let mut entries: Vec<(String, ConnectionHandle)> = connections
            .iter()
            .map(|(identity, handle)| (identity.clone(), handle.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Lookup for targeted delivery
    pub async fn get(&self, identity: &str) -> Option<ConnectionHandle> {
        self.connections.read().await.get(identity).cloned()
    }

    /// Sorted list of connected identities (status endpoint, logs)
    pub async fn identities(&self) -> Vec<String> {
        let connections = self.connections.read().await;
        let mut names: Vec<String> = connections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of connected identities
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }
}
