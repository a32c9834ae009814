//! Debounced persistence bookkeeping.
//!
//! Writes are batched: the first change after a successful flush arms one
//! deadline `window` ahead, and every later change inside that window rides
//! along with it. Under a steady stream of ticks the session therefore
//! still writes once per window instead of never.
//!
//! ```text
//! change ──► arm(now + window) ──► change ──► change ──► deadline: flush
//!                                                          │
//!                                   ok ◄───────────────────┤
//!                                   failed: re-arm(now + window)
//! ```
//!
//! [`FlushScheduler`] only tracks *when* to write. The session loop owns
//! the store and performs the write, then reports the outcome back.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks pending changes and the next flush deadline.
#[derive(Debug, Clone)]
pub struct FlushScheduler {
    window: Duration,
    dirty: bool,
    deadline: Option<Instant>,
}

impl FlushScheduler {
    /// Create a scheduler with nothing pending.
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            dirty: false,
            deadline: None,
        }
    }

    /// Record a change. Arms a deadline if none is pending.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        if self.deadline.is_none() {
            self.deadline = Some(self.window_from(now));
        }
    }

    /// When the pending flush is due, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether there are changes not yet written.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a flush attempt. A failure keeps the changes pending and
    /// re-arms the deadline for the next window.
    pub fn flushed(&mut self, succeeded: bool, now: Instant) {
        if succeeded {
            self.dirty = false;
            self.deadline = None;
        } else {
            self.deadline = Some(self.window_from(now));
        }
    }

    fn window_from(&self, now: Instant) -> Instant {
        now.checked_add(self.window).unwrap_or(now)
    }

    /// Drop pending changes and the deadline without writing.
    pub const fn cancel(&mut self) {
        self.dirty = false;
        self.deadline = None;
    }
}
