use crate::domain::Phase;
use crate::ticker::{Ticker, COUNTDOWN_PERIOD};
use std::time::Instant;

/// Local pomodoro state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_secs: u32,
    pub phase: Phase,
    pub running: bool,
}

impl Default for CountdownState {
    fn default() -> Self {
        Self {
            remaining_secs: Phase::Focus.duration_secs(),
            phase: Phase::Focus,
            running: false,
        }
    }
}

/// Emitted when a phase runs out and the next one begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

impl CountdownState {
    /// Apply one one-second tick.
    ///
    /// The new duration is looked up from the phase that just ended:
    /// focus ending yields a break-length interval, break ending a
    /// focus-length one.
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }

        let ended = self.phase;
        self.phase = ended.flipped();
        self.remaining_secs = match ended {
            Phase::Focus => Phase::Break.duration_secs(),
            Phase::Break => Phase::Focus.duration_secs(),
        };

        Some(PhaseChange {
            from: ended,
            to: self.phase,
        })
    }
}

/// Pomodoro engine: the state plus the tick source that drives it.
///
/// The ticker only exists while `running` is true. Every path that stops
/// the countdown drops it, so a paused or discarded engine cannot keep
/// mutating state.
#[derive(Debug, Default)]
pub struct Countdown {
    state: CountdownState,
    ticker: Option<Ticker>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Whether a tick source is currently armed
    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        self.ticker = Some(Ticker::start(now, COUNTDOWN_PERIOD));
        tracing::debug!(phase = ?self.state.phase, remaining = self.state.remaining_secs, "countdown started");
    }

    pub fn pause(&mut self) {
        self.state.running = false;
        self.ticker = None;
        tracing::debug!(remaining = self.state.remaining_secs, "countdown paused");
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.state.running {
            self.pause();
        } else {
            self.start(now);
        }
    }

    /// Back to a stopped 25-minute focus interval, whatever the phase
    pub fn reset(&mut self) {
        self.ticker = None;
        self.state = CountdownState::default();
    }

    /// Apply every tick that fell due up to `now`
    pub fn advance(&mut self, now: Instant) -> Vec<PhaseChange> {
        let Some(ticker) = self.ticker.as_mut() else {
            return Vec::new();
        };

        let due = ticker.due(now);
        (0..due).filter_map(|_| self.state.tick()).collect()
    }

    /// Stop for good when the timer screen is left
    pub fn teardown(mut self) -> CountdownState {
        self.pause();
        self.state
    }
}
