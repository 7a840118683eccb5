//! The three FIFOs threading slots currently in BackOff / WaitNcf / WaitData.
//!
//! Queue membership is stored as `VecDeque<u32>` of sequence numbers rather
//! than intrusive pointers: a slot is looked back up through the ring by
//! sequence number whenever it is dequeued. This avoids the aliasing a
//! doubly-linked intrusive structure would otherwise force.
//! New entries are pushed to the head (front); `state_foreach` walks from
//! the tail (back), giving oldest-first service order with O(1)
//! re-insertion.

use std::collections::VecDeque;

use crate::window::slot::SlotState;

#[derive(Debug, Default)]
pub(crate) struct StateQueues {
    backoff: VecDeque<u32>,
    wait_ncf: VecDeque<u32>,
    wait_data: VecDeque<u32>,
}

impl StateQueues {
    fn queue_mut(&mut self, state: SlotState) -> &mut VecDeque<u32> {
        match state {
            SlotState::BackOff => &mut self.backoff,
            SlotState::WaitNcf => &mut self.wait_ncf,
            SlotState::WaitData => &mut self.wait_data,
            SlotState::HaveData | SlotState::Lost => {
                unreachable!("{state:?} slots are not queued")
            }
        }
    }

    fn queue(&self, state: SlotState) -> &VecDeque<u32> {
        match state {
            SlotState::BackOff => &self.backoff,
            SlotState::WaitNcf => &self.wait_ncf,
            SlotState::WaitData => &self.wait_data,
            SlotState::HaveData | SlotState::Lost => {
                unreachable!("{state:?} slots are not queued")
            }
        }
    }

    /// Push a newly (re)queued sequence number onto the head of `state`'s
    /// queue.
    pub(crate) fn push_head(&mut self, state: SlotState, seq: u32) {
        self.queue_mut(state).push_front(seq);
    }

    /// Pop the oldest (tail) entry from `state`'s queue.
    pub(crate) fn pop_tail(&mut self, state: SlotState) -> Option<u32> {
        self.queue_mut(state).pop_back()
    }

    /// Remove `seq` from wherever it sits in `state`'s queue. Used when a
    /// slot leaves its queue for a reason other than tail iteration (data
    /// arriving on a placeholder, an NCF retargeting it, trail eviction).
    pub(crate) fn remove(&mut self, state: SlotState, seq: u32) {
        let queue = self.queue_mut(state);
        if let Some(pos) = queue.iter().position(|&s| s == seq) {
            queue.remove(pos);
        }
    }

    /// Current length of `state`'s queue.
    pub(crate) fn len(&self, state: SlotState) -> usize {
        self.queue(state).len()
    }

    /// Total number of slots currently tracked across all three queues.
    pub(crate) fn total_len(&self) -> usize {
        self.backoff.len() + self.wait_ncf.len() + self.wait_data.len()
    }
}
