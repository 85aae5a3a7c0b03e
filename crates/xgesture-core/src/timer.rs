#![forbid(unsafe_code)]

//! Scheduled-callback capability used by the detector's debounce timers.
//!
//! The detector never owns a clock. It asks a [`TimerService`] to deliver a
//! [`TimerToken`] after a delay, and the host hands that token back through
//! [`GestureDetector::on_timer`](crate::GestureDetector::on_timer) on the same
//! thread that delivers pointer events. Tokens carry a generation number, so
//! a token that was cancelled or superseded is recognised as stale and
//! ignored even if the service delivers it anyway.
//!
//! Two services are provided:
//!
//! - [`ManualTimers`]: a virtual clock advanced explicitly. Deterministic;
//!   used by tests and by hosts that already run their own frame clock.
//! - [`DeadlineTimers`]: wall-clock deadlines polled from a tick loop.

use web_time::{Duration, Instant};

/// The two debounce timers the detector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Waits for a second tap.
    DoubleTap,
    /// Waits for a stationary contact to become a long press.
    LongPress,
}

/// Handle identifying one scheduled firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Schedule and cancel delayed callbacks.
pub trait TimerService {
    /// Deliver `token` back to the detector once `after` has elapsed.
    fn schedule(&mut self, token: TimerToken, after: Duration);

    /// Drop a pending firing. Cancelling an unknown token is a no-op.
    fn cancel(&mut self, token: TimerToken);
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Duration,
    token: TimerToken,
}

/// Virtual-clock timer service.
///
/// Time only moves when the owner calls [`advance`](Self::advance) or
/// [`pop_due`](Self::pop_due).
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    now: Duration,
    pending: Vec<Pending>,
}

impl ManualTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled firings.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether a firing of `kind` is scheduled.
    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.token.kind == kind)
    }

    /// Remove and return the earliest firing due at or before `until`,
    /// moving the clock to its deadline.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerToken> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(i, p)| (p.deadline, *i))?;
        let fired = self.pending.remove(index);
        self.now = self.now.max(fired.deadline);
        Some(fired.token)
    }

    /// Move the clock forward by `by`, returning every firing that became
    /// due, in deadline order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
        let until = self.now + by;
        let mut fired = Vec::new();
        while let Some(token) = self.pop_due(until) {
            fired.push(token);
        }
        self.now = until;
        fired
    }
}

impl TimerService for ManualTimers {
    fn schedule(&mut self, token: TimerToken, after: Duration) {
        self.pending.retain(|p| p.token.kind != token.kind);
        self.pending.push(Pending {
            deadline: self.now + after,
            token,
        });
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|p| p.token != token);
    }
}

/// Wall-clock timer service for hosts driven by a tick loop.
///
/// Deadlines are measured from [`Instant::now`] at scheduling time; call
/// [`poll`](Self::poll) each tick to collect due tokens.
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimers {
    pending: Vec<(Instant, TimerToken)>,
}

impl DeadlineTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline, useful for sizing the next sleep.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Remove and return every token due at `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerToken> {
        let mut due: Vec<(Instant, TimerToken)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, token)| token).collect()
    }

    fn schedule_at(&mut self, token: TimerToken, deadline: Instant) {
        self.pending.retain(|(_, t)| t.kind != token.kind);
        self.pending.push((deadline, token));
    }
}

impl TimerService for DeadlineTimers {
    fn schedule(&mut self, token: TimerToken, after: Duration) {
        self.schedule_at(token, Instant::now() + after);
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|(_, t)| *t != token);
    }
}
