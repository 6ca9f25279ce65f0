// Protocol module - THE WIRE FORMAT
// JSON messages exchanged between the signaling service and browser clients

mod codec;
mod message;

pub use codec::{decode, encode, ProtocolError};
pub use message::{
    PeerId, PresenceMessage, ThrowKinematics, ThrowMessage, Vec3, WireMessage, MAX_PEER_ID_LEN,
};
