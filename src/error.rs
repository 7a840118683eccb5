//! Error types for the receive window.

use thiserror::Error;

/// Result type alias for window operations.
pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors produced by [`crate::Window`] operations.
///
/// Most loss and duplicate conditions are *not* represented here: per the
/// design, the caller has no corrective action when data is lost, so those
/// are reported through `tracing` and folded into [`crate::PushOutcome`]
/// instead of being returned as `Err`.
#[derive(Error, Debug)]
pub enum WindowError {
    /// Sequence number falls outside the sender's retransmittable range
    /// (`seq < advertised_trail`). The packet is discarded.
    #[error("sequence #{sequence} is not in the tx window (advertised trail #{advertised_trail})")]
    NotInTxWindow {
        /// The rejected sequence number.
        sequence: u32,
        /// The sender-advertised trail at the time of rejection.
        advertised_trail: u32,
    },

    /// Invalid configuration parameter supplied at construction.
    #[error("invalid window configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An internal invariant was violated — a null slot where one must
    /// exist, or a state the callback was never allowed to produce. In
    /// debug builds the caller should treat this as a logic error in the
    /// window itself or its caller, not a recoverable condition.
    #[error("window invariant violated: {message}")]
    InvariantViolation {
        /// Description of the violated invariant.
        message: String,
    },
}

impl WindowError {
    /// Build a [`WindowError::NotInTxWindow`].
    pub fn not_in_tx_window(sequence: u32, advertised_trail: u32) -> Self {
        Self::NotInTxWindow { sequence, advertised_trail }
    }

    /// Build a [`WindowError::InvalidConfig`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Build a [`WindowError::InvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation { message: message.into() }
    }
}
