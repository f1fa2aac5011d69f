//! Periodic refresh scheduling that stays out of the way of drags.

use std::time::{Duration, Instant};

/// Time between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
/// Quiet period after a drag ends before refreshing resumes.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Decides when the board may reload tasks from the server.
///
/// Refresh is suppressed while a drag is in progress and for the grace
/// period after it ends, so that a reload cannot overwrite an optimistic
/// move. Callers pass the current instant in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGate {
    interval: Duration,
    grace: Duration,
    dragging: bool,
    drag_ended_at: Option<Instant>,
    last_refresh: Option<Instant>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL, DEFAULT_GRACE_PERIOD)
    }
}

impl RefreshGate {
    /// Creates a gate with custom timings.
    #[must_use]
    pub const fn new(interval: Duration, grace: Duration) -> Self {
        Self {
            interval,
            grace,
            dragging: false,
            drag_ended_at: None,
            last_refresh: None,
        }
    }

    /// Records that a drag started.
    pub const fn drag_started(&mut self) {
        self.dragging = true;
    }

    /// Records that a drag ended at `now`.
    pub const fn drag_ended(&mut self, now: Instant) {
        self.dragging = false;
        self.drag_ended_at = Some(now);
    }

    /// Records a completed refresh.
    pub const fn mark_refreshed(&mut self, now: Instant) {
        self.last_refresh = Some(now);
    }

    /// Returns `true` while a drag or its grace period is active.
    #[must_use]
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.dragging
            || self
                .drag_ended_at
                .is_some_and(|ended| now.saturating_duration_since(ended) < self.grace)
    }

    /// Returns `true` when a refresh should run at `now`.
    #[must_use]
    pub fn refresh_due(&self, now: Instant) -> bool {
        !self.is_suppressed(now)
            && self
                .last_refresh
                .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }
}
