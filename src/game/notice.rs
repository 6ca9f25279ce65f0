// Notice Queue - Transient, auto-dismissing user notices
//
// Notices are queued and shown one at a time. A shown notice stays up for
// `display` while nothing else waits, or only `burst_display` when more are
// queued, so a burst of errors drains quickly instead of piling up.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Cadence of the notice queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeConfig {
    /// How often the owner should call `tick`
    pub tick_interval: Duration,
    pub display: Duration,
    pub burst_display: Duration,
    /// Oldest notices are dropped beyond this many pending
    pub max_pending: usize,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            display: Duration::from_millis(2000),
            burst_display: Duration::from_millis(100),
            max_pending: 64,
        }
    }
}

/// What a tick changed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoticeTick {
    /// Nothing to do
    Unchanged,
    /// The current notice was taken down and nothing replaced it
    Dismissed,
    /// A new notice is now showing
    Shown(String),
}

#[derive(Debug)]
pub struct NoticeQueue {
    config: NoticeConfig,
    pending: VecDeque<String>,
    current: Option<String>,
    shown_at: Option<Instant>,
}

impl NoticeQueue {
    pub fn new(config: NoticeConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            current: None,
            shown_at: None,
        }
    }

    pub fn config(&self) -> &NoticeConfig {
        &self.config
    }

    pub fn push(&mut self, text: impl Into<String>) {
        if self.pending.len() >= self.config.max_pending {
            self.pending.pop_front();
        }
        self.pending.push_back(text.into());
    }

    /// Notice currently on screen
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Advance the queue; call every `tick_interval`
    pub fn tick(&mut self, now: Instant) -> NoticeTick {
        if let Some(shown_at) = self.shown_at {
            let hold = if self.pending.is_empty() {
                self.config.display
            } else {
                self.config.burst_display
            };
            if now.saturating_duration_since(shown_at) < hold {
                return NoticeTick::Unchanged;
            }
        }

        let dismissed = self.current.take().is_some();
        match self.pending.pop_front() {
            Some(next) => {
                self.current = Some(next.clone());
                self.shown_at = Some(now);
                NoticeTick::Shown(next)
            }
            None if dismissed => NoticeTick::Dismissed,
            None => NoticeTick::Unchanged,
        }
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(NoticeConfig::default())
    }
}
