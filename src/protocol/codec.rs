// Codec - JSON encoding for wire messages

use super::message::WireMessage;
use thiserror::Error;

/// Protocol errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Invalid peer id: {0:?}")]
    InvalidPeerId(String),

    #[error("Expected {expected} dice values, got {actual}")]
    WrongDieCount { expected: usize, actual: usize },

    #[error("Die {index} has value {value}, outside 1..={faces}")]
    ValueOutOfRange { index: usize, value: u32, faces: u32 },

    #[error("Throw kinematics are not finite")]
    NonFiniteKinematics,
}

/// Serialize a message to its JSON text form
pub fn encode(message: &WireMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(|e| ProtocolError::EncodingFailed(e.to_string()))
}

/// Parse JSON text into a message; shape errors become `Malformed`
pub fn decode(text: &str) -> Result<WireMessage, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
