use std::{future::Future, path::PathBuf};

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::model::{
    connection::ConnectionId,
    signal::{Signal, SignalKind},
};
use crate::registry::Registry;

/// Path browsers open their signaling socket on.
pub const SOCKET_PATH: &str = "/ws";

/// HTTP front of the relay: the signaling socket plus the static client app.
pub struct RelayServer {
    registry: Registry,
    public_dir: PathBuf,
}

impl RelayServer {
    pub fn new(public_dir: impl Into<PathBuf>) -> RelayServer {
        Self {
            registry: Registry::new(),
            public_dir: public_dir.into(),
        }
    }

    /// Handle on the live connection set.
    pub fn registry(&self) -> Registry {
        self.registry.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(SOCKET_PATH, get(ws_handler))
            .fallback_service(ServeDir::new(&self.public_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(self.registry.clone())
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, public_dir = %self.public_dir.display(), "Signaling relay listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn ws_handler(ws: WebSocketUpgrade, State(registry): State<Registry>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Drive one peer: register it, pump its outbox into the socket and relay
/// everything it sends until the socket closes.
async fn handle_socket(socket: WebSocket, registry: Registry) {
    let (mut sink, mut stream) = socket.split();
    let (id, mut outbox) = registry.connect();

    let writer = tokio::spawn(async move {
        while let Some(signal) = outbox.recv().await {
            let text = match signal.encode() {
                Ok(text) => text,
                Err(e) => {
                    warn!(conn = %id, "{e}");
                    continue;
                }
            };

            if let Err(e) = sink.send(Message::Text(text.into())).await {
                debug!(conn = %id, "Send failed, stopping writer: {e}");
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_text(&registry, id, text.as_str()),
            Ok(Message::Binary(data)) => {
                debug!(conn = %id, len = data.len(), "Ignoring binary frame")
            }
            // Keep polling after a close so the reply frame gets flushed.
            Ok(Message::Close(_)) => {
                registry.disconnect(id);
            }
            // Pings are answered by the socket itself.
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => {
                debug!(conn = %id, "Socket error: {e}");
                break;
            }
        }
    }

    // Dropping the registry's sender ends the writer once its queue drains.
    registry.disconnect(id);
    if let Err(e) = writer.await {
        warn!(conn = %id, "Writer task failed: {e}");
    }
}

fn handle_text(registry: &Registry, id: ConnectionId, text: &str) {
    let signal = match Signal::decode(text) {
        Ok(signal) => signal,
        Err(e) => {
            debug!(conn = %id, "Dropping frame: {e}");
            return;
        }
    };

    match signal.event {
        SignalKind::Offer => on_offer(registry, id, signal),
        SignalKind::Answer => on_answer(registry, id, signal),
        SignalKind::IceCandidate => on_ice_candidate(registry, id, signal),
    }
}

fn on_offer(registry: &Registry, id: ConnectionId, offer: Signal) {
    registry.broadcast(id, offer);
}

fn on_answer(registry: &Registry, id: ConnectionId, answer: Signal) {
    registry.broadcast(id, answer);
}

fn on_ice_candidate(registry: &Registry, id: ConnectionId, candidate: Signal) {
    registry.broadcast(id, candidate);
}
