//! Connection registry and broadcaster
//!
//! Tracks every open peer connection and fans each signal out to all peers
//! except the one that sent it. There are no rooms: every live peer hears
//! every other peer.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::model::connection::{Connection, ConnectionId, Outbox};
use crate::model::signal::Signal;

/// The set of live connections, shared between all socket tasks.
///
/// Cloning is cheap and every clone refers to the same set.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    connections: Arc<Mutex<HashMap<ConnectionId, Connection>>>,
}

impl Registry {
    pub fn new() -> Registry {
        Self::default()
    }

    /// Add a new peer. It receives every broadcast from now until
    /// [`Registry::disconnect`] is called with the returned id.
    pub fn connect(&self) -> (ConnectionId, Outbox) {
        let (connection, outbox) = Connection::open();
        let id = connection.id;

        let total = {
            let mut connections = self.connections.lock();
            connections.insert(id, connection);
            connections.len()
        };

        info!(conn = %id, total, "Peer connected");
        (id, outbox)
    }

    /// Forward `signal` to every connection except `from`.
    ///
    /// Returns how many peers the signal was queued for. A peer whose writer
    /// has already shut down is skipped and does not affect the others.
    pub fn broadcast(&self, from: ConnectionId, signal: Signal) -> usize {
        let event = signal.event;
        let signal = Arc::new(signal);
        let mut delivered = 0;

        let connections = self.connections.lock();
        for (id, connection) in connections.iter() {
            if *id == from {
                // Never echo back to the sender.
                continue;
            }

            match connection.send(Arc::clone(&signal)) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(conn = %id, %event, "Dropping signal for closed peer"),
            }
        }

        debug!(conn = %from, %event, delivered, "Relayed signal");
        delivered
    }

    /// Remove a peer. Returns `false` if it was not registered, which is
    /// not an error.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let (removed, total) = {
            let mut connections = self.connections.lock();
            let removed = connections.remove(&id);
            (removed, connections.len())
        };

        match removed {
            Some(connection) => {
                info!(conn = %id, uptime = %connection.uptime(), total, "Peer disconnected");
                true
            }
            None => {
                debug!(conn = %id, "Disconnect for unknown peer ignored");
                false
            }
        }
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }

    /// Ids of all live connections, in no particular order.
    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.lock().keys().copied().collect()
    }
}
