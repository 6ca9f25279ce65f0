// Presence module - WHO IS HERE
// Tracks connected peers and pushes the peer list to all of them

mod broadcaster;
mod handle;
mod registry;

pub use broadcaster::{BroadcastReport, BroadcastStats, PresenceBroadcaster};
pub use handle::{ChannelSendHandle, DeliveryError, MockSendHandle, SendHandle};
pub use registry::{PeerEntry, PeerLifecycle, PeerRegistry, RegistryError};
