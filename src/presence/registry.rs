// Peer Registry - Who is connected right now
//
// Single source of truth for connected peers and their send handles.
// Callers receive snapshots, never references into the internal map.

use super::handle::SendHandle;
use crate::protocol::PeerId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Peer id already registered: {0}")]
    DuplicateId(PeerId),

    #[error("Peer not found: {0}")]
    NotFound(PeerId),

    #[error("Registry full ({max} peers)")]
    Full { max: usize },
}

/// Lifecycle of a peer id as seen by the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerLifecycle {
    Connected,
    Disconnected,
}

// ============================================================================
// PEER ENTRY
// ============================================================================

/// A registered peer
#[derive(Clone)]
pub struct PeerEntry {
    id: PeerId,
    handle: Arc<dyn SendHandle>,
    connected_at: Instant,
}

impl PeerEntry {
    fn new(id: PeerId, handle: Arc<dyn SendHandle>) -> Self {
        Self {
            id,
            handle,
            connected_at: Instant::now(),
        }
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn handle(&self) -> Arc<dyn SendHandle> {
        Arc::clone(&self.handle)
    }

    /// How long the peer has been registered
    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

impl fmt::Debug for PeerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerEntry")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry of connected peers
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<PeerId, PeerEntry>,
    max_peers: Option<usize>,
}

impl PeerRegistry {
    /// Create an unbounded registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that refuses registrations beyond `max`
    pub fn with_capacity_limit(max: usize) -> Self {
        Self {
            peers: HashMap::new(),
            max_peers: Some(max),
        }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.contains_key(id)
    }

    /// Insert a new peer; an id already present is a conflict
    pub fn register(&mut self, id: PeerId, handle: Arc<dyn SendHandle>) -> Result<(), RegistryError> {
        if self.peers.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        if let Some(max) = self.max_peers {
            if self.peers.len() >= max {
                return Err(RegistryError::Full { max });
            }
        }
        self.peers.insert(id.clone(), PeerEntry::new(id, handle));
        Ok(())
    }

    /// Remove a peer. Absent ids are a no-op so repeated disconnects are harmless.
    pub fn unregister(&mut self, id: &PeerId) -> Option<PeerEntry> {
        self.peers.remove(id)
    }

    /// Snapshot of the current ids
    pub fn list(&self) -> Vec<PeerId> {
        self.peers.keys().cloned().collect()
    }

    /// Send handle for one peer
    pub fn get(&self, id: &PeerId) -> Result<Arc<dyn SendHandle>, RegistryError> {
        self.peers
            .get(id)
            .map(PeerEntry::handle)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Snapshot of every entry, for fan-out
    pub fn entries(&self) -> Vec<PeerEntry> {
        self.peers.values().cloned().collect()
    }

    pub fn lifecycle(&self, id: &PeerId) -> PeerLifecycle {
        if self.peers.contains_key(id) {
            PeerLifecycle::Connected
        } else {
            PeerLifecycle::Disconnected
        }
    }
}
