#![forbid(unsafe_code)]

//! Host-controlled time.
//!
//! The page never reads the wall clock. The host advances a
//! [`DeterministicClock`] and the [`TimerQueue`] releases whatever came due,
//! so a recorded sequence of events and time steps always replays the same
//! way.

use core::time::Duration;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Messages waiting for a deadline.
///
/// Due entries are released in deadline order; entries sharing a deadline
/// keep their scheduling order.
#[derive(Debug)]
pub struct TimerQueue<M> {
    pending: Vec<Pending<M>>,
    next_seq: u64,
}

#[derive(Debug)]
struct Pending<M> {
    deadline: Duration,
    seq: u64,
    msg: M,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<M> TimerQueue<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Duration, msg: M) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.push(Pending { deadline, seq, msg });
    }

    /// Remove and return every message due at or before `now`.
    pub fn drain_due(&mut self, now: Duration) -> Vec<M> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.deadline, p.seq));
        due.into_iter().map(|p| p.msg).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_moves_backwards() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(500));
        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[test]
    fn due_timers_release_in_deadline_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Duration::from_millis(300), "late");
        timers.schedule(Duration::from_millis(100), "early-a");
        timers.schedule(Duration::from_millis(100), "early-b");
        timers.schedule(Duration::from_millis(900), "future");

        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(100)));
        assert_eq!(
            timers.drain_due(Duration::from_millis(300)),
            vec!["early-a", "early-b", "late"]
        );
        assert_eq!(timers.len(), 1);
        assert!(timers.drain_due(Duration::from_millis(899)).is_empty());
        assert_eq!(timers.drain_due(Duration::from_millis(900)), vec!["future"]);
        assert!(timers.is_empty());
    }
}
