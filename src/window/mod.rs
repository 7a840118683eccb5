//! The receive window: ring-buffered, gap-tracking, in-order delivery.
//!
//! A ring-plus-cursor shape carries the ring array and trail/lead cursors,
//! generalized from a fixed two-state (valid/invalid) slot to the
//! five-state NAK/NCF machine, and from a single free-index list to three
//! separate state queues.

mod queues;
mod slot;

pub use slot::SlotState;

use queues::StateQueues;
use slot::Slot;

use crate::clock::ClockSource;
use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::pool::SlotPool;
use crate::sequence::{seq_ge, seq_gt, seq_le, seq_lt};
use crate::stats::WindowStats;

/// Result of a [`Window::push`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The packet filled a gap or extended the window and was delivered or
    /// buffered as appropriate.
    Accepted,
    /// The packet was already committed (below `trail`) or duplicated a
    /// slot already holding data.
    Discarded,
}

/// A single source's receive window.
///
/// Not internally synchronized: every method requires `&mut self` and the
/// caller is responsible for serializing access, typically from a single
/// receive task.
pub struct Window {
    capacity: u32,
    slots: Vec<Option<Slot>>,
    trail: u32,
    lead: u32,
    rxw_trail: u32,
    rxw_trail_init: u32,
    rxw_constrained: bool,
    window_defined: bool,
    queues: StateQueues,
    sink: Box<dyn FnMut(Vec<u8>)>,
    clock: Box<dyn ClockSource>,
    pool: SlotPool,
    stats: WindowStats,
}

impl Window {
    /// Construct an empty, unanchored window. The window anchors
    /// itself on the first [`Window::push`].
    pub fn new(config: WindowConfig, sink: impl FnMut(Vec<u8>) + 'static) -> Result<Self> {
        Self::with_clock(config, sink, WindowConfig::default_clock())
    }

    /// Like [`Window::new`] but with an explicit [`ClockSource`], primarily
    /// for tests that need a [`crate::clock::FrozenClock`].
    pub fn with_clock(
        config: WindowConfig,
        sink: impl FnMut(Vec<u8>) + 'static,
        clock: Box<dyn ClockSource>,
    ) -> Result<Self> {
        let capacity = config.resolve_capacity()?;
        let slots = (0..capacity).map(|_| None).collect();
        Ok(Self {
            capacity,
            slots,
            trail: 0,
            lead: u32::MAX,
            rxw_trail: 0,
            rxw_trail_init: 0,
            rxw_constrained: true,
            window_defined: false,
            queues: StateQueues::default(),
            sink: Box::new(sink),
            clock,
            pool: SlotPool::with_preallocated(config.preallocate()),
            stats: WindowStats::default(),
        })
    }

    /// Consume the window, logging final statistics. Pooled buffers and any
    /// payloads still resident in slots are dropped along with `self`.
    pub fn shutdown(self) {
        tracing::info!(
            delivered = self.stats.delivered,
            duplicates = self.stats.duplicates,
            forced_losses = self.stats.forced_losses,
            "window shutdown"
        );
    }

    /// Read-only observability counters.
    pub fn stats(&self) -> &WindowStats {
        &self.stats
    }

    /// Whether the window currently holds no slots.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether the window holds `capacity` slots and cannot extend without
    /// evicting `trail`.
    pub fn is_full(&self) -> bool {
        self.count() == self.capacity
    }

    /// The oldest sequence not yet delivered upstream.
    pub fn trail(&self) -> u32 {
        self.trail
    }

    /// The highest sequence admitted into the window.
    pub fn lead(&self) -> u32 {
        self.lead
    }

    fn count(&self) -> u32 {
        self.lead.wrapping_sub(self.trail).wrapping_add(1)
    }

    fn index(&self, seq: u32) -> usize {
        (seq % self.capacity) as usize
    }

    fn anchor(&mut self, seq: u32) {
        self.lead = seq.wrapping_sub(1);
        self.trail = seq;
        self.rxw_trail = seq;
        self.rxw_trail_init = seq;
        self.window_defined = true;
        self.rxw_constrained = true;
        tracing::debug!(seq, "window anchored");
    }

    /// Ingest a received data packet.
    pub fn push(&mut self, payload: &[u8], seq: u32, advertised_trail: u32) -> Result<PushOutcome> {
        if !self.window_defined {
            self.anchor(seq);
        } else {
            if seq_lt(seq, advertised_trail) {
                self.stats.record_not_in_tx_window();
                return Err(WindowError::not_in_tx_window(seq, advertised_trail));
            }
            self.update(advertised_trail, self.lead);
        }

        if seq_lt(seq, self.trail) {
            self.stats.record_duplicate();
            return Ok(PushOutcome::Discarded);
        }

        if seq_le(seq, self.lead) {
            let idx = self.index(seq);
            let existing_state = self.slots[idx].as_ref().map(|slot| slot.state);
            match existing_state {
                Some(SlotState::HaveData) => {
                    self.stats.record_duplicate();
                    return Ok(PushOutcome::Discarded);
                }
                Some(state) => {
                    // `Lost` holes carry no queue membership; only
                    // unlink states that are actually queued.
                    if state.is_queued() {
                        self.queues.remove(state, seq);
                    }
                    let buf = self.pool.acquire(payload);
                    if let Some(slot) = self.slots[idx].as_mut() {
                        slot.install_data(buf);
                    }
                    #[cfg(feature = "trace")]
                    tracing::trace!(seq, from = ?state, "gap filled, slot -> HaveData");
                }
                None => {
                    return Err(WindowError::invariant(format!(
                        "slot within [trail, lead] missing for seq {seq}"
                    )));
                }
            }
        } else {
            self.extend_to(seq);
            if self.is_full() {
                self.evict_trail();
                self.flush();
            }
            self.lead = seq;
            let buf = self.pool.acquire(payload);
            let idx = self.index(seq);
            self.slots[idx] = Some(Slot::with_data(seq, buf));
        }

        self.flush();
        Ok(PushOutcome::Accepted)
    }

    /// Advance `lead` to `seq - 1` with BackOff placeholders, evicting
    /// `trail` along the way whenever the window is already full. Shared by
    /// the push extension path, `update`'s lead advance, and NCF
    /// pre-extension.
    ///
    /// Every eviction here is immediately followed by a flush: the slot
    /// `evict_trail` exposes at the new `trail` may already be `HaveData`
    /// (a gap filled out of order behind a placeholder that still blocked
    /// delivery), and that payload must drain to the sink before a later
    /// eviction in the same loop can reach it and destroy it.
    ///
    /// Does not evict on behalf of a slot the caller is about to insert at
    /// `seq` itself — callers that follow this with their own insert
    /// (`push`'s extend branch, `ncf_preextend`) must do their own
    /// `is_full`/`evict_trail`/`flush` check first; `update`'s lead advance
    /// inserts nothing further, so leaving that check out here avoids an
    /// off-by-one eviction when the advertised lead lands exactly at
    /// capacity.
    fn extend_to(&mut self, seq: u32) {
        while seq_lt(self.lead.wrapping_add(1), seq) {
            if self.is_full() {
                self.evict_trail();
                // Evicting trail can expose a slot that was already filled
                // out of order (e.g. a gap closed behind a remaining
                // placeholder). Flush immediately so a genuinely-delivered
                // payload is drained to the sink before any further
                // eviction in this same loop can reach it.
                self.flush();
            }
            self.lead = self.lead.wrapping_add(1);
            let now = self.clock.now();
            let idx = self.index(self.lead);
            self.slots[idx] = Some(Slot::placeholder(self.lead, now));
            self.queues.push_head(SlotState::BackOff, self.lead);
            self.stats.record_gap_placeholder();
        }
    }

    /// Apply the sender's advertised trail/lead.
    pub fn update(&mut self, txw_trail: u32, txw_lead: u32) {
        if seq_gt(txw_lead, self.lead) {
            // extend_to's loop boundary is exclusive, so pass txw_lead + 1
            // to also plant a placeholder at txw_lead itself.
            self.extend_to(txw_lead.wrapping_add(1));
        }

        if self.rxw_constrained && seq_gt(txw_trail, self.rxw_trail_init) {
            self.rxw_constrained = false;
            tracing::debug!(txw_trail, "rxw_constrained cleared");
        }

        if !self.rxw_constrained {
            if seq_gt(txw_trail, self.rxw_trail) {
                self.rxw_trail = txw_trail;
                while seq_gt(self.rxw_trail, self.trail) {
                    if self.is_empty() {
                        let distance = self.rxw_trail.wrapping_sub(self.trail);
                        self.trail = self.trail.wrapping_add(distance);
                        self.lead = self.lead.wrapping_add(distance);
                        break;
                    }
                    self.evict_trail();
                    self.flush();
                }
            } else if seq_lt(txw_trail, self.rxw_trail) {
                tracing::warn!(
                    txw_trail,
                    rxw_trail = self.rxw_trail,
                    "sender advertised trail moved backwards"
                );
            }
        }
    }

    /// Process a NAK confirmation.
    pub fn ncf(&mut self, seq: u32, advertised_trail: u32) -> Result<()> {
        if seq_ge(seq, self.trail) && seq_le(seq, self.lead) {
            return self.ncf_existing(seq);
        }
        if seq_gt(seq, self.lead) {
            if seq_lt(seq, advertised_trail) {
                self.stats.record_not_in_tx_window();
                return Err(WindowError::not_in_tx_window(seq, advertised_trail));
            }
            self.ncf_preextend(seq);
            return Ok(());
        }
        // seq < trail: already committed upstream or evicted, nothing to do.
        Ok(())
    }

    fn ncf_existing(&mut self, seq: u32) -> Result<()> {
        let idx = self.index(seq);
        let state = match self.slots[idx].as_ref() {
            Some(slot) => slot.state,
            None => {
                return Err(WindowError::invariant(format!(
                    "missing slot for in-window seq {seq}"
                )));
            }
        };
        match state {
            SlotState::WaitData => Ok(()),
            SlotState::BackOff | SlotState::WaitNcf => {
                let now = self.clock.now();
                if let Some(slot) = self.slots[idx].as_mut() {
                    slot.state = SlotState::WaitData;
                    slot.ncf_received = now;
                }
                self.queues.remove(state, seq);
                self.queues.push_head(SlotState::WaitData, seq);
                Ok(())
            }
            SlotState::HaveData | SlotState::Lost => Err(WindowError::invariant(format!(
                "ncf received for seq {seq} already in state {state:?}"
            ))),
        }
    }

    fn ncf_preextend(&mut self, seq: u32) {
        self.extend_to(seq);
        if self.is_full() {
            self.evict_trail();
            self.flush();
        }
        self.lead = seq;
        let now = self.clock.now();
        let idx = self.index(seq);
        self.slots[idx] = Some(Slot::waiting_on_ncf_data(seq, now));
        self.queues.push_head(SlotState::WaitData, seq);
        self.stats.record_ncf_preextension();
        tracing::trace!(seq, "ncf pre-extension created a waitdata placeholder");
    }

    /// Drain contiguous `HaveData` slots from `trail` to the upstream sink.
    fn flush(&mut self) {
        loop {
            if self.is_empty() {
                break;
            }
            let idx = self.index(self.trail);
            let ready = matches!(self.slots[idx].as_ref().map(|s| s.state), Some(SlotState::HaveData));
            if !ready {
                break;
            }
            let mut slot = self.slots[idx].take().expect("checked HaveData above");
            let payload = slot.take_data().expect("HaveData slot always carries a payload");
            #[cfg(feature = "trace")]
            tracing::trace!(seq = self.trail, len = payload.len(), "flushing slot upstream");
            self.trail = self.trail.wrapping_add(1);
            self.stats.record_delivered();
            (self.sink)(payload);
        }
    }

    /// Evict the slot at `trail`: irrecoverable loss.
    fn evict_trail(&mut self) {
        let idx = self.index(self.trail);
        if let Some(mut slot) = self.slots[idx].take() {
            if slot.state.is_queued() {
                self.queues.remove(slot.state, slot.sequence_number);
            }
            if let Some(buf) = slot.take_data() {
                self.pool.release(buf);
            }
        }
        self.stats.record_forced_loss();
        tracing::warn!(seq = self.trail, "evicting trail slot: irrecoverable loss");
        self.trail = self.trail.wrapping_add(1);
    }

    /// Apply the lead/trail edge rules for a slot just cancelled to `Lost`
    /// by the iteration callback.
    ///
    /// `trail` and `lead` are checked as mutually exclusive alternatives,
    /// trail first: a single-slot window has `seq == trail == lead`, and
    /// shrinking both cursors for the same freed slot would violate the
    /// `is_empty() <=> trail == lead + 1` invariant.
    fn apply_lost(&mut self, seq: u32) {
        let idx = self.index(seq);
        if seq == self.trail {
            self.slots[idx] = None;
            self.trail = self.trail.wrapping_add(1);
            self.flush();
        } else if seq == self.lead {
            self.slots[idx] = None;
            self.lead = self.lead.wrapping_sub(1);
        }
        // Otherwise the slot stays as a `Lost` hole blocking flush until a
        // later trail advance reaps it. Intentional: see DESIGN.md.
    }

    /// Visit the tail-to-head run of `target_state`'s queue, letting the
    /// caller inspect and transition each slot.
    ///
    /// `callback` receives the slot's payload (always `None`, since only
    /// placeholder states are ever queued), sequence number, a mutable
    /// handle on its state, its age in the current state, and its retry
    /// counter. Returning `true` halts iteration and leaves the slot's
    /// state untouched.
    pub fn state_foreach(
        &mut self,
        target_state: SlotState,
        mut callback: impl FnMut(Option<&[u8]>, u32, &mut SlotState, f64, u32) -> bool,
    ) {
        let rounds = self.queues.len(target_state);
        let now = self.clock.now();
        for _ in 0..rounds {
            let seq = match self.queues.pop_tail(target_state) {
                Some(seq) => seq,
                None => break,
            };
            let idx = self.index(seq);

            let (age, retry_count) = match self.slots[idx].as_ref() {
                Some(slot) if slot.sequence_number == seq => match target_state {
                    SlotState::BackOff => (now - slot.bo_start, 0),
                    SlotState::WaitNcf => (now - slot.nak_sent, slot.ncf_retry_count),
                    SlotState::WaitData => (now - slot.ncf_received, slot.data_retry_count),
                    SlotState::HaveData | SlotState::Lost => (0.0, 0),
                },
                _ => continue,
            };

            let mut new_state = target_state;
            let stop = {
                let slot = self.slots[idx].as_mut().expect("slot present, checked above");
                let payload = slot.payload();
                callback(payload, seq, &mut new_state, age, retry_count)
            };

            if stop {
                self.queues.push_head(target_state, seq);
                continue;
            }

            match new_state {
                SlotState::BackOff => {
                    if let Some(slot) = self.slots[idx].as_mut() {
                        slot.state = SlotState::BackOff;
                        slot.bo_start = now;
                    }
                    self.queues.push_head(SlotState::BackOff, seq);
                }
                SlotState::WaitNcf => {
                    if let Some(slot) = self.slots[idx].as_mut() {
                        slot.state = SlotState::WaitNcf;
                        slot.nak_sent = now;
                    }
                    self.queues.push_head(SlotState::WaitNcf, seq);
                }
                SlotState::Lost => {
                    if let Some(slot) = self.slots[idx].as_mut() {
                        slot.state = SlotState::Lost;
                    }
                    self.stats.record_lead_cancellation();
                    self.apply_lost(seq);
                }
                SlotState::HaveData => {
                    debug_assert!(false, "state_foreach callback produced HaveData for seq {seq}");
                    tracing::error!(seq, "invalid post-state HaveData from state_foreach callback");
                }
            }
        }
    }
}
