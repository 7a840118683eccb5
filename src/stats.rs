//! Read-only counters for observability.
//!
//! Plain `u64` counters rather than atomics: the window runs single-threaded,
//! so there is no cross-thread access to guard against.

/// Monotonically increasing counters describing a window's lifetime
/// activity. Never consulted by the window's own logic — purely for
/// callers to export to their own metrics system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Payloads handed to the upstream sink.
    pub delivered: u64,
    /// Pushes discarded because the slot already held data.
    pub duplicates: u64,
    /// Pushes or NCFs rejected as not-in-tx-window.
    pub not_in_tx_window: u64,
    /// BackOff placeholder slots created (gap fill, lead extension, NCF
    /// pre-extension).
    pub gap_placeholders_created: u64,
    /// Trail evictions: slots lost because the window was full or the
    /// sender advanced its trail past them.
    pub forced_losses: u64,
    /// Lead cancellations applied by the iteration callback.
    pub lead_cancellations: u64,
    /// Pre-emptive placeholders created because of an unexpected NCF.
    pub ncf_preextensions: u64,
}

impl WindowStats {
    pub(crate) fn record_delivered(&mut self) {
        self.delivered += 1;
    }

    pub(crate) fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub(crate) fn record_not_in_tx_window(&mut self) {
        self.not_in_tx_window += 1;
    }

    pub(crate) fn record_gap_placeholder(&mut self) {
        self.gap_placeholders_created += 1;
    }

    pub(crate) fn record_forced_loss(&mut self) {
        self.forced_losses += 1;
    }

    pub(crate) fn record_lead_cancellation(&mut self) {
        self.lead_cancellations += 1;
    }

    pub(crate) fn record_ncf_preextension(&mut self) {
        self.ncf_preextensions += 1;
    }
}
