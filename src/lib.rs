// dicemesh - Peer presence and dice-throw synchronization
//
// Server side: a signaling gateway that tracks connected players and pushes
// the peer list to each of them on every join and leave.
// Client side: the round coordinator, dice table and triplet grouping that
// every browser participant runs against the values the thrower shares.

pub mod game;
pub mod gateway;
pub mod presence;
pub mod protocol;
