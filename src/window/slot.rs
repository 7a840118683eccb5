//! A single sequence number's worth of window state.

/// The five states a [`Slot`] can occupy.
///
/// Flattened into a plain enum rather than a sum type carrying its own
/// per-variant timestamps: the state tag is authoritative, but
/// `bo_start`/`nak_sent`/`ncf_received` live directly on [`Slot`] as a record
/// with nullable fields instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Placeholder awaiting its NAK backoff timer to expire.
    BackOff,
    /// NAK sent, awaiting an NCF from the sender.
    WaitNcf,
    /// NCF received (or pre-empted), awaiting retransmitted data.
    WaitData,
    /// Payload has arrived; eligible for flush once it reaches `trail`.
    HaveData,
    /// Cancelled by the iteration callback; a sentinel hole.
    Lost,
}

impl SlotState {
    /// Whether this state currently occupies one of the three state
    /// queues. `HaveData` and `Lost` belong to no queue.
    pub fn is_queued(self) -> bool {
        matches!(self, SlotState::BackOff | SlotState::WaitNcf | SlotState::WaitData)
    }
}

/// One ring slot: either a placeholder (no payload yet) or a fully
/// received packet, distinguished by `state`.
///
/// **Invariant:** `data.is_some() <=> state == HaveData <=> length > 0`.
#[derive(Debug)]
pub struct Slot {
    pub(crate) sequence_number: u32,
    pub(crate) data: Option<Vec<u8>>,
    pub(crate) state: SlotState,
    pub(crate) bo_start: f64,
    pub(crate) nak_sent: f64,
    pub(crate) ncf_received: f64,
    pub(crate) ncf_retry_count: u32,
    pub(crate) data_retry_count: u32,
}

impl Slot {
    /// A freshly received data packet: born straight into `HaveData`.
    pub(crate) fn with_data(sequence_number: u32, data: Vec<u8>) -> Self {
        Self {
            sequence_number,
            data: Some(data),
            state: SlotState::HaveData,
            bo_start: 0.0,
            nak_sent: 0.0,
            ncf_received: 0.0,
            ncf_retry_count: 0,
            data_retry_count: 0,
        }
    }

    /// A gap-fill or lead-extension placeholder: born into `BackOff`.
    pub(crate) fn placeholder(sequence_number: u32, now: f64) -> Self {
        Self {
            sequence_number,
            data: None,
            state: SlotState::BackOff,
            bo_start: now,
            nak_sent: 0.0,
            ncf_received: 0.0,
            ncf_retry_count: 0,
            data_retry_count: 0,
        }
    }

    /// A placeholder created directly in `WaitData` by a pre-emptive NCF:
    /// no NAK round trip is needed since the sender already told us a
    /// retransmission is coming.
    pub(crate) fn waiting_on_ncf_data(sequence_number: u32, now: f64) -> Self {
        Self {
            sequence_number,
            data: None,
            state: SlotState::WaitData,
            bo_start: 0.0,
            nak_sent: 0.0,
            ncf_received: now,
            ncf_retry_count: 0,
            data_retry_count: 0,
        }
    }

    /// Payload length, 0 for a placeholder.
    pub fn length(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    /// Borrow the payload, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub(crate) fn install_data(&mut self, data: Vec<u8>) {
        debug_assert_ne!(self.state, SlotState::HaveData, "installing into an occupied slot");
        self.data = Some(data);
        self.state = SlotState::HaveData;
    }

    /// Take ownership of the payload, leaving the slot payload-less. Used
    /// by flush, which immediately discards the slot afterwards.
    pub(crate) fn take_data(&mut self) -> Option<Vec<u8>> {
        self.data.take()
    }
}
