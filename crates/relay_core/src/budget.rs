use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Calls per window granted to the summarizer by default.
pub const DEFAULT_CALLS_PER_MINUTE: usize = 5;

/// Rolling-window call budget for a rate-limited service.
///
/// The owner asks for the delay before each call, sleeps for it, and records
/// the call once it returns. Timestamps are passed in so callers and tests
/// control the clock.
#[derive(Debug, Clone)]
pub struct CallBudget {
    max_calls: usize,
    window: Duration,
    recent: VecDeque<Instant>,
}

impl CallBudget {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            recent: VecDeque::with_capacity(max_calls.max(1)),
        }
    }

    pub fn per_minute(max_calls: usize) -> Self {
        Self::new(max_calls, Duration::from_secs(60))
    }

    /// How long to wait at `now` before the next call fits in the window.
    pub fn delay_before_call(&mut self, now: Instant) -> Duration {
        self.prune(now);
        if self.recent.len() < self.max_calls {
            return Duration::ZERO;
        }
        match self.recent.front() {
            Some(oldest) => self.window.saturating_sub(now.saturating_duration_since(*oldest)),
            None => Duration::ZERO,
        }
    }

    pub fn record_call(&mut self, at: Instant) {
        self.recent.push_back(at);
        // Only the newest `max_calls` entries can affect a future delay.
        while self.recent.len() > self.max_calls {
            self.recent.pop_front();
        }
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.recent.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for CallBudget {
    fn default() -> Self {
        Self::per_minute(DEFAULT_CALLS_PER_MINUTE)
    }
}
