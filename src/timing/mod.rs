//! Execution duration measurement
//!
//! Wraps closures, futures, and scopes with wall-clock timing. Wrapping
//! never changes what the wrapped code returns: results come back
//! unchanged alongside a non-negative elapsed duration, and failures
//! propagate exactly as the wrapped code produced them.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;


/// A value paired with the time it took to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Discard the measurement and return the wrapped value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Map the wrapped value, keeping the measurement.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timed<U> {
        Timed {
            value: f(self.value),
            elapsed: self.elapsed,
        }
    }
}

/// Run a closure and measure how long it takes.
pub fn time<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

/// Run a fallible closure and measure how long it takes.
///
/// On success the result is wrapped in [`Timed`]; on failure the error is
/// returned unchanged. The elapsed time is reported through `tracing`
/// either way.
pub fn try_time<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<Timed<T>, E> {
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    match result {
        Ok(value) => Ok(Timed { value, elapsed }),
        Err(e) => {
            debug!("timed closure failed after {:?}", elapsed);
            Err(e)
        }
    }
}

/// Await a future and measure how long it takes.
pub async fn time_async<F: Future>(fut: F) -> Timed<F::Output> {
    let start = Instant::now();
    let value = fut.await;
    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

/// Incremental timer with lap support.
#[derive(Debug)]
pub struct Stopwatch {
    started: Instant,
    last_lap: Instant,
    laps: Vec<Duration>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

impl Stopwatch {
    /// Start a new stopwatch.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_lap: now,
            laps: Vec::new(),
        }
    }

    /// Record a lap and return the time since the previous lap (or start).
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now - self.last_lap;
        self.last_lap = now;
        self.laps.push(lap);
        lap
    }

    /// Total time since the stopwatch was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Laps recorded so far.
    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    /// Reset the stopwatch, clearing recorded laps.
    pub fn restart(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.last_lap = now;
        self.laps.clear();
    }
}

/// Drop guard that logs the elapsed time of a labeled scope.
///
/// Logs through `tracing::debug!` when dropped, so the measurement is
/// reported even if the scope unwinds early.
#[derive(Debug)]
pub struct ScopeTimer {
    label: String,
    start: Instant,
}

impl ScopeTimer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    /// Time elapsed since the scope was entered.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        debug!("{} completed in {:?}", self.label, self.start.elapsed());
    }
}
