use std::time::{Duration, Instant};

/// Timing of one displayed frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Taken when the frame started.
    pub now: Instant,
    /// Since the previous frame, capped at the clock's `max_dt`.
    pub dt: Duration,
    /// Zero-based count of displayed frames.
    pub frame: u64,
}

/// Produces one [`FrameTime`] per displayed frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frames: u64,
    max_dt: Duration,
}

impl FrameClock {
    pub fn new(max_dt: Duration) -> Self {
        Self {
            last: None,
            frames: 0,
            max_dt,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
            .min(self.max_dt);
        self.last = Some(now);

        let frame = self.frames;
        self.frames += 1;
        FrameTime { now, dt, frame }
    }
}

impl Default for FrameClock {
    /// Caps `dt` at 250 ms so a stalled window does not report a huge step.
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_dt() {
        let mut clock = FrameClock::default();
        let ft = clock.tick_at(Instant::now());
        assert_eq!(ft.frame, 0);
        assert_eq!(ft.dt, Duration::ZERO);
    }

    #[test]
    fn frames_count_up() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(16));
        assert_eq!(ft.frame, 1);
        assert_eq!(ft.dt, Duration::from_millis(16));
    }

    #[test]
    fn stall_is_capped() {
        let mut clock = FrameClock::new(Duration::from_millis(50));
        let t0 = Instant::now();
        clock.tick_at(t0);
        assert_eq!(
            clock.tick_at(t0 + Duration::from_secs(3)).dt,
            Duration::from_millis(50)
        );
    }
}
