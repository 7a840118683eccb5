//! Window configuration.

use crate::clock::{ClockSource, MonotonicClock};
use crate::constants::{DEFAULT_PREALLOCATE, DEFAULT_WINDOW_CAPACITY, MAX_WINDOW_CAPACITY};
use crate::error::{Result, WindowError};

/// How the ring's capacity (in sequence numbers) is derived.
#[derive(Debug, Clone, Copy)]
enum CapacitySource {
    /// An explicit capacity in sequence numbers.
    Sequences(u32),
    /// Derived as `(secs * max_rate) / tpdu`.
    SecondsAndRate { secs: u32, max_rate: u32 },
}

/// Construction parameters for a [`crate::Window`].
///
/// A `Default`-derived base struct plus `with_*` methods that return `Self`
/// for chaining, each one fallible where the parameter can be nonsensical.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    tpdu: usize,
    preallocate: usize,
    capacity_source: CapacitySource,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            tpdu: 1500,
            preallocate: DEFAULT_PREALLOCATE,
            capacity_source: CapacitySource::Sequences(DEFAULT_WINDOW_CAPACITY),
        }
    }
}

impl WindowConfig {
    /// Start a config with the given max transport-packet size in bytes.
    pub fn new(tpdu: usize) -> Result<Self> {
        if tpdu == 0 {
            return Err(WindowError::config("tpdu must be greater than 0"));
        }
        Ok(Self { tpdu, ..Default::default() })
    }

    /// Set an explicit ring capacity in sequence numbers.
    pub fn with_capacity(mut self, capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(WindowError::config("capacity must be greater than 0"));
        }
        if capacity > MAX_WINDOW_CAPACITY {
            return Err(WindowError::config(format!(
                "capacity {capacity} exceeds MAX_WINDOW_CAPACITY ({MAX_WINDOW_CAPACITY})"
            )));
        }
        self.capacity_source = CapacitySource::Sequences(capacity);
        Ok(self)
    }

    /// Derive capacity from a window duration and a maximum sender rate
    /// (bytes/sec), as `(secs * max_rate) / tpdu`.
    pub fn with_seconds_and_rate(mut self, secs: u32, max_rate: u32) -> Result<Self> {
        if secs == 0 || max_rate == 0 {
            return Err(WindowError::config(
                "secs and max_rate must both be greater than 0",
            ));
        }
        self.capacity_source = CapacitySource::SecondsAndRate { secs, max_rate };
        Ok(self)
    }

    /// Number of slot records to preallocate into the [`crate::pool::SlotPool`].
    pub fn with_preallocate(mut self, preallocate: usize) -> Self {
        self.preallocate = preallocate;
        self
    }

    /// Resolve the ring capacity in sequence numbers.
    pub(crate) fn resolve_capacity(&self) -> Result<u32> {
        let capacity = match self.capacity_source {
            CapacitySource::Sequences(n) => n,
            CapacitySource::SecondsAndRate { secs, max_rate } => {
                let bytes = (secs as u64) * (max_rate as u64);
                let capacity = bytes / (self.tpdu as u64);
                if capacity == 0 {
                    return Err(WindowError::config(
                        "(secs * max_rate) / tpdu resolved to 0 slots",
                    ));
                }
                u32::try_from(capacity).unwrap_or(MAX_WINDOW_CAPACITY)
            }
        };
        if capacity > MAX_WINDOW_CAPACITY {
            Ok(MAX_WINDOW_CAPACITY)
        } else {
            Ok(capacity)
        }
    }

    pub(crate) fn preallocate(&self) -> usize {
        self.preallocate
    }

    pub(crate) fn tpdu(&self) -> usize {
        self.tpdu
    }

    /// Build the default clock source (`MonotonicClock`) for this config.
    pub(crate) fn default_clock() -> Box<dyn ClockSource> {
        Box::new(MonotonicClock::new())
    }
}
