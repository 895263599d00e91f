//! Debounced idle detector.
//!
//! Holds at most one pending deadline. Arming always replaces the previous
//! deadline, so a stale one can never fire after a newer undo.

use serde::{Deserialize, Serialize};

/// Fixed stop-timer window in milliseconds.
pub const STOP_TIMER_MS: u64 = 200;

/// A scheduled stop that has not fired or been cancelled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStop {
    /// Monotonic arm counter; distinguishes successive timers.
    pub id: u64,
    pub due_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct StopTimer {
    window_ms: u64,
    next_id: u64,
    pending: Option<PendingStop>,
}

impl StopTimer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            next_id: 0,
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn pending(&self) -> Option<PendingStop> {
        self.pending
    }

    /// Cancel any pending stop and schedule a new one `window_ms` from `now_ms`.
    pub fn arm(&mut self, now_ms: u64) -> PendingStop {
        self.next_id += 1;
        let stop = PendingStop {
            id: self.next_id,
            due_at_ms: now_ms.saturating_add(self.window_ms),
        };
        self.pending = Some(stop);
        stop
    }

    pub fn cancel(&mut self) -> Option<PendingStop> {
        self.pending.take()
    }

    /// Remove and return the pending stop if its deadline has passed.
    pub fn take_if_due(&mut self, now_ms: u64) -> Option<PendingStop> {
        match self.pending {
            Some(stop) if now_ms >= stop.due_at_ms => self.pending.take(),
            _ => None,
        }
    }

    /// Milliseconds until the pending stop fires (0 if overdue).
    pub fn due_in_ms(&self, now_ms: u64) -> Option<u64> {
        self.pending.map(|s| s.due_at_ms.saturating_sub(now_ms))
    }
}

impl Default for StopTimer {
    fn default() -> Self {
        Self::new(STOP_TIMER_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_replaces_previous_deadline() {
        let mut timer = StopTimer::default();
        let first = timer.arm(0);
        let second = timer.arm(150);
        assert_ne!(first.id, second.id);
        assert_eq!(timer.pending(), Some(second));
        // The first deadline has passed but it was superseded.
        assert!(timer.take_if_due(200).is_none());
        assert_eq!(timer.take_if_due(350), Some(second));
        assert!(timer.pending().is_none());
    }

    #[test]
    fn cancel_clears_pending() {
        let mut timer = StopTimer::new(50);
        timer.arm(10);
        assert_eq!(timer.due_in_ms(20), Some(40));
        assert!(timer.cancel().is_some());
        assert!(timer.take_if_due(1_000).is_none());
        assert_eq!(timer.due_in_ms(20), None);
    }

    #[test]
    fn overdue_reports_zero() {
        let mut timer = StopTimer::new(200);
        timer.arm(0);
        assert_eq!(timer.due_in_ms(500), Some(0));
    }
}
