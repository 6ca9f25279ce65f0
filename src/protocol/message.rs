// Message Types - Presence and throw payloads
//
// Two message kinds travel between participants:
// - peers: presence list pushed by the signaling service
// - throw: authoritative dice outcome sent by the local thrower over data channels
//
// Both are tagged by a top-level "type" field.

use super::codec::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest peer id accepted from a client
pub const MAX_PEER_ID_LEN: usize = 64;

// ============================================================================
// PEER ID
// ============================================================================

/// Opaque identifier of a connected participant
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerId(String);

impl PeerId {
    /// Validate a client-supplied id
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.is_empty() || raw.len() > MAX_PEER_ID_LEN {
            return Err(ProtocolError::InvalidPeerId(raw.to_string()));
        }
        let valid = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ProtocolError::InvalidPeerId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Generate a random id for clients that did not propose one
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PeerId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeerId> for String {
    fn from(id: PeerId) -> Self {
        id.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// VECTOR
// ============================================================================

/// 3-vector, serialized as `[x, y, z]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

// ============================================================================
// PRESENCE
// ============================================================================

/// Current set of connected peers, as seen by the signaling service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub peers: Vec<PeerId>,
}

impl PresenceMessage {
    pub fn new(peers: Vec<PeerId>) -> Self {
        Self { peers }
    }
}

// ============================================================================
// THROW
// ============================================================================

/// How the dice were launched
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowKinematics {
    #[serde(rename = "throwDirection")]
    pub direction: Vec3,
    #[serde(rename = "throwStrength")]
    pub strength: f64,
}

impl ThrowKinematics {
    pub fn new(direction: Vec3, strength: f64) -> Self {
        Self { direction, strength }
    }

    pub fn is_finite(&self) -> bool {
        self.direction.is_finite() && self.strength.is_finite()
    }
}

/// Authoritative outcome of one round, index-aligned with the shared die order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowMessage {
    pub values: Vec<u32>,
    #[serde(rename = "throwData")]
    pub kinematics: ThrowKinematics,
}

impl ThrowMessage {
    pub fn new(values: Vec<u32>, kinematics: ThrowKinematics) -> Self {
        Self { values, kinematics }
    }

    /// Check the shape against the agreed die count and face range
    pub fn validate(&self, die_count: usize, faces: u32) -> Result<(), ProtocolError> {
        if self.values.len() != die_count {
            return Err(ProtocolError::WrongDieCount {
                expected: die_count,
                actual: self.values.len(),
            });
        }
        if let Some((index, &value)) = self
            .values
            .iter()
            .enumerate()
            .find(|(_, v)| **v == 0 || **v > faces)
        {
            return Err(ProtocolError::ValueOutOfRange { index, value, faces });
        }
        if !self.kinematics.is_finite() {
            return Err(ProtocolError::NonFiniteKinematics);
        }
        Ok(())
    }
}

// ============================================================================
// ENVELOPE
// ============================================================================

/// Every message a client may receive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    Peers(PresenceMessage),
    Throw(ThrowMessage),
}

impl From<PresenceMessage> for WireMessage {
    fn from(m: PresenceMessage) -> Self {
        Self::Peers(m)
    }
}

impl From<ThrowMessage> for WireMessage {
    fn from(m: ThrowMessage) -> Self {
        Self::Throw(m)
    }
}
