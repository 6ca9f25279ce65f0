// Game Configuration
// Die table shape, thrower role and timing for one client

use super::dice::AssignedPositions;
use super::notice::NoticeConfig;
use std::time::Duration;
use thiserror::Error;

/// Invalid game configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameConfigError {
    #[error("die_count cannot be 0")]
    NoDice,

    #[error("Dice need at least 2 faces, got {0}")]
    TooFewFaces(u32),

    #[error("Position table has {positions} entries for {dice} dice")]
    PositionTableMismatch { positions: usize, dice: usize },

    #[error("settle_timeout cannot be zero")]
    ZeroSettleTimeout,
}

/// Whether this client authors throw outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrowRole {
    /// Runs physics and emits the round's throw message
    LocalThrower,
    /// Applies throw messages from others; never emits
    #[default]
    Receiver,
}

impl ThrowRole {
    pub fn is_thrower(&self) -> bool {
        matches!(self, Self::LocalThrower)
    }
}

/// Configuration for a game client
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub die_count: usize,
    pub faces: u32,
    pub role: ThrowRole,
    /// A throw that has not settled after this long is voided
    pub settle_timeout: Duration,
    pub positions: AssignedPositions,
    pub notices: NoticeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let positions = AssignedPositions::default();
        Self {
            die_count: positions.len(),
            faces: 6,
            role: ThrowRole::Receiver,
            settle_timeout: Duration::from_secs(10),
            positions,
            notices: NoticeConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: ThrowRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_faces(mut self, faces: u32) -> Self {
        self.faces = faces;
        self
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Replace the position table; the die count follows it
    pub fn with_positions(mut self, positions: AssignedPositions) -> Self {
        self.die_count = positions.len();
        self.positions = positions;
        self
    }

    pub fn with_notices(mut self, notices: NoticeConfig) -> Self {
        self.notices = notices;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.die_count == 0 {
            return Err(GameConfigError::NoDice);
        }
        if self.faces < 2 {
            return Err(GameConfigError::TooFewFaces(self.faces));
        }
        if self.positions.len() != self.die_count {
            return Err(GameConfigError::PositionTableMismatch {
                positions: self.positions.len(),
                dice: self.die_count,
            });
        }
        if self.settle_timeout.is_zero() {
            return Err(GameConfigError::ZeroSettleTimeout);
        }
        Ok(())
    }
}
