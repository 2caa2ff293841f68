use std::time::{Duration, Instant};

/// Wall-clock time since the scene started, fed to the wave animation.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start(now: Instant) -> Self {
        Self { start: now }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// Elapsed time at millisecond granularity, in seconds.
    pub fn elapsed_seconds(&self, now: Instant) -> f32 {
        self.elapsed(now).as_millis() as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_counts_whole_milliseconds() {
        let start = Instant::now();
        let clock = FrameClock::start(start);
        let later = start + Duration::from_micros(2_500_900);
        assert_eq!(clock.elapsed_seconds(later), 2.5);
    }

    #[test]
    fn time_before_start_reads_zero() {
        let start = Instant::now() + Duration::from_secs(5);
        let clock = FrameClock::start(start);
        assert_eq!(clock.elapsed_seconds(Instant::now()), 0.0);
    }
}
