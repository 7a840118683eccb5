//! Monotonic clock abstraction for slot age tracking.
//!
//! The receive window never reads wall-clock time directly: every
//! `bo_start`/`nak_sent`/`ncf_received` timestamp and every `age` handed to
//! the [`crate::window::Window::state_foreach`] callback comes from a
//! [`ClockSource`]. This crate defaults to a live clock (see DESIGN.md)
//! while keeping the seam so tests can freeze time.

use std::time::Instant;

/// A source of fractional seconds elapsed since some fixed epoch.
///
/// Implementations need not be wall-clock accurate; the window only ever
/// takes differences between two readings, so any monotonically
/// non-decreasing source is sufficient.
pub trait ClockSource: Send {
    /// Seconds elapsed since the clock's epoch (typically window creation).
    fn now(&self) -> f64;
}

/// Default [`ClockSource`] backed by [`std::time::Instant`].
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Start a new monotonic clock with its epoch at the current instant.
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for MonotonicClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// A clock double for deterministic tests: advances only when told to.
///
/// Kept outside `#[cfg(test)]` so integration tests under `tests/` (a
/// separate crate from this one's unit tests) can use it too.
pub struct FrozenClock {
    now: std::cell::Cell<f64>,
}

impl FrozenClock {
    /// Create a frozen clock starting at `t = 0.0`.
    pub fn new() -> Self {
        Self { now: std::cell::Cell::new(0.0) }
    }

    /// Advance the frozen clock by `secs` seconds.
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for FrozenClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
