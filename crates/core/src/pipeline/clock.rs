use std::time::{Duration, Instant};

/// Monotonic time source for cadence decisions.
///
/// A seam rather than direct `Instant::now()` calls so re-classification
/// timing is deterministic under test and never tied to an assumed capture
/// rate.
pub trait Clock: Send {
    fn now(&mut self) -> Instant;
}

/// The system monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock that advances a fixed step per observation.
///
/// Each `now` call returns the previous instant plus the step, simulating a
/// capture loop ticking at a fixed rate. For tests and offline replay.
#[derive(Clone, Copy, Debug)]
pub struct SteppingClock {
    current: Instant,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            current: Instant::now(),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> Instant {
        self.current += self.step;
        self.current
    }
}
