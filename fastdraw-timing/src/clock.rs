use std::time::Duration;

use tokio::time::Instant;

/// Monotonic time source for the stopwatch
pub trait Clock: Clone + Send + Sync + 'static {
    type Timestamp: Copy + Clone + Send + Sync + std::fmt::Debug;
    fn now(&self) -> Self::Timestamp;
    /// Never negative: a timestamp from the future yields zero.
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
}

/// Nanoseconds since construction.
///
/// Reads the tokio clock, so it tracks the same time base as the scheduler
/// (including paused time under `tokio::test(start_paused = true)`).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Clock for MonotonicClock {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
