//! rxwindow - PGM-style reliable multicast receive window
//!
//! The correctness-critical core of a reliable pub/sub receiver: a
//! ring-buffered sliding window over 32-bit sequence numbers that detects
//! gaps, drives a per-slot NAK/NCF state machine, and releases payloads
//! upstream strictly in order. Socket I/O, NAK/NCF wire encoding, and
//! timers live outside this crate; they reach in through the
//! [`ClockSource`] trait, the upstream sink closure, and the
//! [`Window::state_foreach`] iteration callback.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod pool;
pub mod sequence;
pub mod stats;
pub mod window;

pub use clock::{ClockSource, FrozenClock, MonotonicClock};
pub use config::WindowConfig;
pub use error::{Result, WindowError};
pub use pool::SlotPool;
pub use stats::WindowStats;
pub use window::{PushOutcome, SlotState, Window};

/// Crate version, mirroring the build's `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_construction_round_trip() {
        let config = WindowConfig::new(1500).unwrap().with_capacity(64).unwrap();
        let window = Window::new(config, |_payload| {});
        assert!(window.is_ok());
        let window = window.unwrap();
        assert!(window.is_empty());
        assert!(!window.is_full());
    }

    #[test]
    fn end_to_end_push_and_flush() {
        use std::cell::RefCell;

        let received = RefCell::new(Vec::new());
        let config = WindowConfig::new(1500).unwrap().with_capacity(64).unwrap();
        let mut window = Window::new(config, |payload| received.borrow_mut().push(payload)).unwrap();

        window.push(b"alpha", 10, 10).unwrap();
        window.push(b"beta", 11, 10).unwrap();
        window.push(b"gamma", 12, 10).unwrap();

        assert_eq!(
            received.borrow().as_slice(),
            &[b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]
        );
        assert!(window.is_empty());
        assert_eq!(window.stats().delivered, 3);
    }
}
