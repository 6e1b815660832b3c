use std::time::{Duration, Instant};

/// Default event-loop poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Period of the countdown tick
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Get the event-loop poll duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// A repeating deadline.
///
/// Owning a `Ticker` is what makes a recurring tick exist; dropping it is
/// the cancellation. The event loop polls faster than the period, so
/// `due` reports how many whole periods have passed since the last call.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// Arm a ticker whose first tick fires one period after `now`
    pub fn start(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Number of ticks that fell due up to `now`, advancing the deadline
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.period;
        }
        fired
    }
}
