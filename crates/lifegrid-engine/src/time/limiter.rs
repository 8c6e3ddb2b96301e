use std::time::{Duration, Instant};

/// Rate gate: admits at most one tick per `interval`.
///
/// The first query always ticks. Missed intervals are not replayed; a frame
/// that arrives late admits a single tick and restarts the interval from that
/// frame, so a stall never produces a burst of catch-up work.
#[derive(Debug, Clone)]
pub struct TickLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl TickLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Forgets the last tick; the next query ticks immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns true (and records `now`) if a tick is due.
    pub fn should_tick(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}
