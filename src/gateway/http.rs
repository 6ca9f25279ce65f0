// HTTP Surface - Peer query and signaling socket
//
// Routes:
// - GET /peers, GET {signaling_path}/peers: JSON array of connected ids
// - GET {signaling_path}?id=<id>: WebSocket; one registry entry per socket

use super::signaling::{GatewayError, SignalingGateway};
use crate::presence::{ChannelSendHandle, RegistryError, SendHandle};
use crate::protocol::PeerId;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub id: Option<String>,
}

/// Build the router for the secure port
pub fn router(gateway: Arc<SignalingGateway>) -> Router {
    let path = gateway.config().signaling_path.clone();
    Router::new()
        .route("/peers", get(list_peers))
        .route(&format!("{path}/peers"), get(list_peers))
        .route(&path, get(connect))
        .with_state(gateway)
}

async fn list_peers(State(gateway): State<Arc<SignalingGateway>>) -> Json<Vec<PeerId>> {
    Json(gateway.query_peers().await)
}

async fn connect(
    State(gateway): State<Arc<SignalingGateway>>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let id = match params.id.as_deref() {
        Some(raw) => match PeerId::parse(raw) {
            Ok(id) => id,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
        None => PeerId::generate(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, gateway, id))
}

async fn handle_socket(socket: WebSocket, gateway: Arc<SignalingGateway>, id: PeerId) {
    let (mut sink, mut stream) = socket.split();
    let (handle, mut outbound) = ChannelSendHandle::pair();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
        // Every sender is gone: the socket was turned away
        let _ = sink.send(Message::Close(None)).await;
    });

    let handle: Arc<dyn SendHandle> = Arc::new(handle);
    // A duplicate id keeps its socket open but never touches the registry
    // entry owned by the peer that already holds the id. Any other rejection
    // closes the socket.
    let registered = match gateway.on_connect(id.clone(), handle.clone()).await {
        Ok(_) => true,
        Err(GatewayError::Registry(RegistryError::DuplicateId(_))) => false,
        Err(GatewayError::Registry(e)) => {
            debug!(peer = %id, error = %e, "closing rejected socket");
            drop(handle);
            let _ = writer.await;
            return;
        }
        Err(e) => {
            warn!(peer = %id, error = %e, "join broadcast failed");
            true
        }
    };

    let mut failure = None;
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if !registered {
                    continue;
                }
                if let Err(e) = gateway.relay(&id, &text).await {
                    warn!(peer = %id, error = %e, "relay failed");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                failure = Some(e.to_string());
                break;
            }
        }
    }

    if registered {
        let result = match failure {
            Some(err) => gateway.on_error(&id, &err).await,
            None => gateway.on_disconnect(&id).await,
        };
        if let Err(e) = result {
            warn!(peer = %id, error = %e, "teardown broadcast failed");
        }
    } else {
        debug!(peer = %id, "unregistered socket closed");
    }
    drop(handle);
    writer.abort();
}
