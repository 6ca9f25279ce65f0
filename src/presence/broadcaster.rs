// Presence Broadcaster - Push the peer list to everyone
//
// Serializes the registry snapshot once and attempts delivery to every
// registered handle. A failing peer is reported and skipped; it stays
// registered until its transport reports a disconnect.

use super::handle::DeliveryError;
use super::registry::PeerRegistry;
use crate::protocol::{encode, PeerId, PresenceMessage, ProtocolError, WireMessage};
use tracing::{debug, warn};

/// Running counters for the broadcaster
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    pub broadcasts: u64,
    pub deliveries: u64,
    pub failures: u64,
}

/// Outcome of one presence broadcast
#[derive(Clone, Debug)]
pub struct BroadcastReport {
    pub message: PresenceMessage,
    pub delivered: Vec<PeerId>,
    pub failed: Vec<(PeerId, DeliveryError)>,
}

impl BroadcastReport {
    /// Number of peers the broadcast was attempted on
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fans presence messages out to every registered peer
#[derive(Debug, Default)]
pub struct PresenceBroadcaster {
    stats: BroadcastStats,
}

impl PresenceBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &BroadcastStats {
        &self.stats
    }

    /// Deliver the current peer list to every registered peer
    pub async fn broadcast_presence(
        &mut self,
        registry: &PeerRegistry,
    ) -> Result<BroadcastReport, ProtocolError> {
        let entries = registry.entries();
        let message = PresenceMessage::new(entries.iter().map(|e| e.id().clone()).collect());
        let payload = encode(&WireMessage::Peers(message.clone()))?;

        let mut delivered = Vec::with_capacity(entries.len());
        let mut failed = Vec::new();

        for entry in entries {
            match entry.handle().send(&payload).await {
                Ok(()) => delivered.push(entry.id().clone()),
                Err(e) => {
                    warn!(peer = %entry.id(), error = %e, "presence delivery failed");
                    failed.push((entry.id().clone(), e));
                }
            }
        }

        self.stats.broadcasts += 1;
        self.stats.deliveries += delivered.len() as u64;
        self.stats.failures += failed.len() as u64;
        debug!(
            peers = message.peers.len(),
            delivered = delivered.len(),
            failed = failed.len(),
            "presence broadcast"
        );

        Ok(BroadcastReport {
            message,
            delivered,
            failed,
        })
    }
}
