// Game Session - One client's view of the table
//
// Glues the round coordinator, dice table, grouping engine and notice queue
// together, and fans this client's throw out over its peer data channels.
// Data channels come from the WebRTC layer as plain send handles.

use super::config::{GameConfig, GameConfigError, ThrowRole};
use super::dice::DiceTable;
use super::grouping::{GroupingEngine, GroupingError, SelectionOutcome};
use super::notice::{NoticeQueue, NoticeTick};
use super::throw::{RoundState, ThrowCoordinator, ThrowError};
use crate::presence::{DeliveryError, SendHandle};
use crate::protocol::{
    decode, encode, PeerId, ProtocolError, ThrowKinematics, ThrowMessage, Vec3, WireMessage,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Session errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] GameConfigError),

    #[error(transparent)]
    Throw(#[from] ThrowError),

    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// What an incoming message did to the session
#[derive(Clone, Debug, PartialEq)]
pub enum Incoming {
    /// Presence list replaced
    Presence(Vec<PeerId>),
    /// A remote throw became this round's outcome
    ThrowApplied(Vec<u32>),
    /// A throw arrived while a round was already underway and was ignored
    ThrowIgnored,
}

/// Result of fanning a message out to the data channels
#[derive(Clone, Debug, Default)]
pub struct FanOutReport {
    pub delivered: Vec<PeerId>,
    pub failed: Vec<(PeerId, DeliveryError)>,
}

/// Client-side game state for one participant
pub struct GameSession {
    config: GameConfig,
    local_id: Option<PeerId>,
    known_peers: Vec<PeerId>,
    channels: HashMap<PeerId, Arc<dyn SendHandle>>,
    dice: DiceTable,
    coordinator: ThrowCoordinator,
    grouping: GroupingEngine,
    notices: NoticeQueue,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            dice: DiceTable::new(config.positions.clone()),
            coordinator: ThrowCoordinator::new(
                config.role,
                config.die_count,
                config.faces,
                config.settle_timeout,
            ),
            grouping: GroupingEngine::new(),
            notices: NoticeQueue::new(config.notices.clone()),
            local_id: None,
            known_peers: Vec::new(),
            channels: HashMap::new(),
            config,
        })
    }

    pub fn with_local_id(mut self, id: PeerId) -> Self {
        self.local_id = Some(id);
        self
    }

    pub fn role(&self) -> ThrowRole {
        self.config.role
    }

    pub fn round(&self) -> &RoundState {
        self.coordinator.state()
    }

    pub fn dice(&self) -> &DiceTable {
        &self.dice
    }

    pub fn grouping(&self) -> &GroupingEngine {
        &self.grouping
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Last presence list, excluding this client
    pub fn other_peers(&self) -> Vec<PeerId> {
        self.known_peers
            .iter()
            .filter(|p| Some(*p) != self.local_id.as_ref())
            .cloned()
            .collect()
    }

    // ========================================================================
    // DATA CHANNELS
    // ========================================================================

    pub fn open_channel(&mut self, peer: PeerId, handle: Arc<dyn SendHandle>) {
        debug!(peer = %peer, "data channel open");
        self.channels.insert(peer, handle);
    }

    pub fn close_channel(&mut self, peer: &PeerId) {
        if self.channels.remove(peer).is_some() {
            debug!(peer = %peer, "data channel closed");
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    async fn fan_out(&mut self, message: WireMessage) -> Result<FanOutReport, SessionError> {
        let payload = encode(&message)?;
        let mut report = FanOutReport::default();
        for (peer, handle) in &self.channels {
            match handle.send(&payload).await {
                Ok(()) => report.delivered.push(peer.clone()),
                Err(e) => {
                    warn!(peer = %peer, error = %e, "throw delivery failed");
                    report.failed.push((peer.clone(), e));
                }
            }
        }
        for (peer, _) in &report.failed {
            self.notices.push(format!("Could not reach {peer}"));
        }
        Ok(report)
    }

    // ========================================================================
    // INCOMING
    // ========================================================================

    /// Apply a raw message from the signaling socket or a data channel
    pub fn handle_incoming(&mut self, raw: &str) -> Result<Incoming, SessionError> {
        let message = match decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "dropping malformed message");
                self.notices.push("Ignored a malformed message");
                return Err(e.into());
            }
        };

        match message {
            WireMessage::Peers(presence) => {
                self.known_peers = presence.peers.clone();
                Ok(Incoming::Presence(presence.peers))
            }
            WireMessage::Throw(throw) => self.apply_remote_throw(&throw),
        }
    }

    fn apply_remote_throw(&mut self, throw: &ThrowMessage) -> Result<Incoming, SessionError> {
        match self.coordinator.receive(throw) {
            Ok(()) => {
                self.dice.apply_values(&throw.values);
                self.grouping.clear();
                info!(values = ?throw.values, "remote throw applied");
                Ok(Incoming::ThrowApplied(throw.values.clone()))
            }
            Err(ThrowError::RoundInProgress) => {
                info!(values = ?throw.values, "throw ignored, round already underway");
                self.notices
                    .push("Another throw arrived; return dice to take the next round");
                Ok(Incoming::ThrowIgnored)
            }
            Err(e) => {
                warn!(error = %e, "rejected throw");
                self.notices.push("Ignored an invalid throw");
                Err(e.into())
            }
        }
    }

    // ========================================================================
    // LOCAL ACTIONS
    // ========================================================================

    /// Start a throw. The caller passes the same kinematics to the physics engine.
    pub fn throw(&mut self, kinematics: ThrowKinematics, now: Instant) -> Result<(), SessionError> {
        self.coordinator.throw(kinematics, now)?;
        self.grouping.clear();
        Ok(())
    }

    /// Physics settled. Thrower clients send the outcome to every data channel.
    pub async fn on_settled(
        &mut self,
        values: Vec<u32>,
        positions: &[Vec3],
    ) -> Result<Option<FanOutReport>, SessionError> {
        let message = match self.coordinator.on_settled(values.clone()) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, values = ?values, "settled outcome rejected");
                self.notices.push("The dice did not land cleanly; waiting for them to settle");
                return Err(e.into());
            }
        };
        self.dice.apply_values(&values);
        for (index, &position) in positions.iter().enumerate() {
            self.dice.set_position(index, position);
        }

        match message {
            Some(message) => {
                info!(values = ?message.values, peers = self.channels.len(), "sending throw");
                Ok(Some(self.fan_out(WireMessage::Throw(message)).await?))
            }
            None => Ok(None),
        }
    }

    pub fn select_die(&mut self, index: usize) -> Result<SelectionOutcome, SessionError> {
        Ok(self.grouping.select(index, &mut self.dice)?)
    }

    /// "Return dice": send grouped dice home and end the round
    pub fn return_dice(&mut self) -> Vec<usize> {
        let moved = self.grouping.return_all(&mut self.dice);
        self.coordinator.reset();
        moved
    }

    /// Periodic housekeeping: settle timeout and notice cadence
    pub fn poll(&mut self, now: Instant) -> NoticeTick {
        if let Some(e) = self.coordinator.poll_timeout(now) {
            warn!(error = %e, "throw voided");
            self.notices.push("The throw did not land; throw again");
        }
        self.notices.tick(now)
    }
}
