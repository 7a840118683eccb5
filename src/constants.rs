//! Tuning constants for the receive window.

/// Default ring capacity when neither an explicit capacity nor a
/// (seconds, max-rate) pair is supplied.
pub const DEFAULT_WINDOW_CAPACITY: u32 = 1024;

/// Maximum ring capacity; guards against pathological `(secs * rate) / tpdu`
/// configuration from wrapping or exhausting memory.
pub const MAX_WINDOW_CAPACITY: u32 = 4 * 1024 * 1024;

/// Default number of slot records to preallocate into the [`crate::pool::SlotPool`].
pub const DEFAULT_PREALLOCATE: usize = 64;
