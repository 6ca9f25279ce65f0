// Send Handles - The per-peer send primitive
// Abstracts whatever transport carries text frames to one connected peer

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors delivering a payload to one peer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Transport channel closed")]
    ChannelClosed,

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

// ============================================================================
// SEND HANDLE TRAIT
// ============================================================================

/// Per-peer send primitive supplied by the transport layer
#[async_trait]
pub trait SendHandle: Send + Sync {
    /// Deliver one text frame to the peer
    async fn send(&self, payload: &str) -> Result<(), DeliveryError>;
}

// ============================================================================
// CHANNEL SEND HANDLE
// ============================================================================

/// Handle backed by an unbounded channel drained by a socket writer task
#[derive(Clone, Debug)]
pub struct ChannelSendHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSendHandle {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Create a handle together with the receiving end for the writer task
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SendHandle for ChannelSendHandle {
    async fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        self.tx
            .send(payload.to_string())
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

// ============================================================================
// MOCK SEND HANDLE
// ============================================================================

/// Recording handle for tests; can be configured to fail every send
pub struct MockSendHandle {
    should_fail: bool,
    delivered: Mutex<Vec<String>>,
    attempts: AtomicUsize,
}

impl MockSendHandle {
    /// Create a mock that accepts every payload
    pub fn new() -> Self {
        Self {
            should_fail: false,
            delivered: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Configure to reject every payload
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Payloads accepted so far
    pub fn delivered(&self) -> Vec<String> {
        match self.delivered.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of send calls, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for MockSendHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SendHandle for MockSendHandle {
    async fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(DeliveryError::Rejected("Mock failure".to_string()));
        }
        match self.delivered.lock() {
            Ok(mut guard) => guard.push(payload.to_string()),
            Err(poisoned) => poisoned.into_inner().push(payload.to_string()),
        }
        Ok(())
    }
}
