// Throw Coordinator - One authoritative outcome per round
//
// Round state machine: Idle -> Thrown -> Settled -> Idle.
// - Only the local thrower may leave Idle by throwing.
// - The physics engine reports settle; the thrower then emits exactly one
//   throw message.
// - Receivers jump Idle -> Settled when a valid throw message arrives.
// - An explicit reset returns to Idle; a throw that never settles is voided
//   once the settle timeout passes.

use super::config::ThrowRole;
use crate::protocol::{ProtocolError, ThrowKinematics, ThrowMessage};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Throw coordination errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThrowError {
    #[error("Only the local thrower may throw")]
    NotThrower,

    #[error("Round already in progress")]
    RoundInProgress,

    #[error("No throw is waiting to settle")]
    NotThrown,

    #[error("Physics settled {actual} dice, expected {expected}")]
    WrongDieCount { expected: usize, actual: usize },

    #[error("Rejected throw message: {0}")]
    Malformed(#[from] ProtocolError),

    #[error("Throw did not settle within {0:?}")]
    SettleTimeout(Duration),
}

/// Where the current round stands
#[derive(Clone, Debug, PartialEq)]
pub enum RoundState {
    Idle,
    Thrown {
        kinematics: ThrowKinematics,
        started_at: Instant,
    },
    Settled {
        values: Vec<u32>,
    },
}

impl RoundState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Per-client round coordinator
#[derive(Debug)]
pub struct ThrowCoordinator {
    role: ThrowRole,
    die_count: usize,
    faces: u32,
    settle_timeout: Duration,
    state: RoundState,
}

impl ThrowCoordinator {
    pub fn new(role: ThrowRole, die_count: usize, faces: u32, settle_timeout: Duration) -> Self {
        Self {
            role,
            die_count,
            faces,
            settle_timeout,
            state: RoundState::Idle,
        }
    }

    pub fn role(&self) -> ThrowRole {
        self.role
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Values of the settled round, if any
    pub fn settled_values(&self) -> Option<&[u32]> {
        match &self.state {
            RoundState::Settled { values } => Some(values),
            _ => None,
        }
    }

    /// Launch a throw. The caller hands the kinematics to the physics engine.
    pub fn throw(&mut self, kinematics: ThrowKinematics, now: Instant) -> Result<(), ThrowError> {
        if !self.role.is_thrower() {
            return Err(ThrowError::NotThrower);
        }
        if !self.state.is_idle() {
            return Err(ThrowError::RoundInProgress);
        }
        self.state = RoundState::Thrown {
            kinematics,
            started_at: now,
        };
        Ok(())
    }

    /// Physics finished. Returns the message to send when this client is the thrower.
    /// Values outside `1..=faces` are rejected and the round stays `Thrown`.
    pub fn on_settled(&mut self, values: Vec<u32>) -> Result<Option<ThrowMessage>, ThrowError> {
        let RoundState::Thrown { kinematics, .. } = self.state else {
            return Err(ThrowError::NotThrown);
        };
        if values.len() != self.die_count {
            return Err(ThrowError::WrongDieCount {
                expected: self.die_count,
                actual: values.len(),
            });
        }

        // Receivers validate every throw; an outcome they would reject must
        // never leave this client.
        let message = ThrowMessage::new(values, kinematics);
        message.validate(self.die_count, self.faces)?;

        self.state = RoundState::Settled {
            values: message.values.clone(),
        };
        Ok(self.role.is_thrower().then_some(message))
    }

    /// Apply a throw authored by another client
    pub fn receive(&mut self, message: &ThrowMessage) -> Result<(), ThrowError> {
        message.validate(self.die_count, self.faces)?;
        if !self.state.is_idle() {
            return Err(ThrowError::RoundInProgress);
        }
        self.state = RoundState::Settled {
            values: message.values.clone(),
        };
        Ok(())
    }

    /// Explicit round reset
    pub fn reset(&mut self) {
        self.state = RoundState::Idle;
    }

    /// Void a throw that has waited too long for physics
    pub fn poll_timeout(&mut self, now: Instant) -> Option<ThrowError> {
        let RoundState::Thrown { started_at, .. } = self.state else {
            return None;
        };
        if now.saturating_duration_since(started_at) < self.settle_timeout {
            return None;
        }
        self.state = RoundState::Idle;
        Some(ThrowError::SettleTimeout(self.settle_timeout))
    }
}
