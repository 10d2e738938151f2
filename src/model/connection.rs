use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};

use crate::model::signal::Signal;

/// Receiving end of a connection's outbound queue, drained by its socket writer.
pub type Outbox = UnboundedReceiver<Arc<Signal>>;

/// Opaque identifier of one peer session. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> ConnectionId {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(0);
        ConnectionId(ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One connected peer as seen by the registry.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: DateTime<Utc>,
    tx: UnboundedSender<Arc<Signal>>,
}

impl Connection {
    /// Create a connection with a fresh id and its outbound queue.
    pub fn open() -> (Connection, Outbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = Connection {
            id: ConnectionId::next(),
            connected_at: Utc::now(),
            tx,
        };

        (connection, rx)
    }

    /// Queue a signal for this peer without waiting on the socket.
    ///
    /// Fails only when the peer's writer has already gone away.
    pub fn send(&self, signal: Arc<Signal>) -> Result<(), SendError<Arc<Signal>>> {
        self.tx.send(signal)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// How long this peer has been connected, formatted for logs.
    pub fn uptime(&self) -> String {
        (Utc::now() - self.connected_at).to_string()
    }
}
