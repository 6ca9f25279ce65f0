// Signaling Gateway - Connection lifecycle and presence
//
// Turns transport events into registry mutations, each followed by a
// presence broadcast under the same lock so no peer ever sees a list from
// before the change that triggered it. Addressed signaling payloads are
// forwarded verbatim; game messages never pass through here.

use super::config::{ConfigError, GatewayConfig};
use crate::presence::{
    BroadcastReport, BroadcastStats, DeliveryError, PeerRegistry, PresenceBroadcaster,
    RegistryError, SendHandle,
};
use crate::protocol::{PeerId, ProtocolError};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for GatewayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// What happened to a payload handed to `relay`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Forwarded to the addressed peer
    Forwarded(PeerId),
    /// No destination; nothing to do
    Ignored,
}

/// Only the routing field of a signaling payload is ever read
#[derive(Deserialize)]
struct RelayEnvelope {
    dst: Option<String>,
}

struct GatewayState {
    registry: PeerRegistry,
    broadcaster: PresenceBroadcaster,
}

/// Presence and relay coordinator shared by every connection task
pub struct SignalingGateway {
    config: GatewayConfig,
    state: Mutex<GatewayState>,
}

impl SignalingGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let registry = PeerRegistry::with_capacity_limit(config.max_peers);
        Ok(Self {
            config,
            state: Mutex::new(GatewayState {
                registry,
                broadcaster: PresenceBroadcaster::new(),
            }),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Register a newly connected peer and announce the new peer list
    pub async fn on_connect(
        &self,
        id: PeerId,
        handle: Arc<dyn SendHandle>,
    ) -> Result<BroadcastReport, GatewayError> {
        let mut state = self.state.lock().await;
        if let Err(e) = state.registry.register(id.clone(), handle) {
            warn!(peer = %id, error = %e, "registration rejected");
            return Err(e.into());
        }
        info!(peer = %id, peers = state.registry.len(), "peer connected");

        let GatewayState {
            registry,
            broadcaster,
        } = &mut *state;
        Ok(broadcaster.broadcast_presence(registry).await?)
    }

    /// Drop a peer and announce the new peer list. Safe to call repeatedly.
    pub async fn on_disconnect(&self, id: &PeerId) -> Result<BroadcastReport, GatewayError> {
        let mut state = self.state.lock().await;
        match state.registry.unregister(id) {
            Some(entry) => info!(
                peer = %id,
                peers = state.registry.len(),
                connected_for = ?entry.connected_for(),
                "peer disconnected"
            ),
            None => debug!(peer = %id, "disconnect for unregistered peer"),
        }

        let GatewayState {
            registry,
            broadcaster,
        } = &mut *state;
        Ok(broadcaster.broadcast_presence(registry).await?)
    }

    /// A transport error ends the peer's session
    pub async fn on_error(
        &self,
        id: &PeerId,
        error: &str,
    ) -> Result<BroadcastReport, GatewayError> {
        warn!(peer = %id, error, "transport error");
        self.on_disconnect(id).await
    }

    /// Current peer ids, without side effects
    pub async fn query_peers(&self) -> Vec<PeerId> {
        self.state.lock().await.registry.list()
    }

    /// Forward a signaling payload from `from` to the peer named in its `dst` field
    pub async fn relay(&self, from: &PeerId, payload: &str) -> Result<RelayOutcome, GatewayError> {
        let envelope: RelayEnvelope = serde_json::from_str(payload)
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        let Some(dst) = envelope.dst else {
            return Ok(RelayOutcome::Ignored);
        };
        let dst = PeerId::parse(&dst)?;

        // Resolve under the lock, send outside it.
        let handle = self.state.lock().await.registry.get(&dst)?;
        handle.send(payload).await?;
        debug!(from = %from, to = %dst, bytes = payload.len(), "relayed");
        Ok(RelayOutcome::Forwarded(dst))
    }

    pub async fn broadcast_stats(&self) -> BroadcastStats {
        self.state.lock().await.broadcaster.stats().clone()
    }
}
