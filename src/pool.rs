//! Slot and payload buffer recycling.
//!
//! The window's scheduling model is single-threaded cooperative, so there
//! is no need for `Arc<Mutex<VecDeque<_>>>` — a plain `Vec` freelist is
//! enough. Pooling is an optimization, not part of the external contract; a
//! build that skipped this module entirely (always allocating) would be
//! externally indistinguishable.

/// Recycles payload buffers so repeated push/flush cycles do not churn the
/// allocator once the window has warmed up.
#[derive(Debug, Default)]
pub struct SlotPool {
    free_buffers: Vec<Vec<u8>>,
    hits: u64,
    misses: u64,
}

impl SlotPool {
    /// Create a pool preallocated with `count` empty buffers.
    pub fn with_preallocated(count: usize) -> Self {
        Self {
            free_buffers: (0..count).map(|_| Vec::new()).collect(),
            hits: 0,
            misses: 0,
        }
    }

    /// Take a buffer from the pool (or allocate a fresh one) and fill it
    /// with `payload`.
    pub fn acquire(&mut self, payload: &[u8]) -> Vec<u8> {
        let mut buf = match self.free_buffers.pop() {
            Some(buf) => {
                self.hits += 1;
                buf
            }
            None => {
                self.misses += 1;
                Vec::new()
            }
        };
        buf.clear();
        buf.extend_from_slice(payload);
        buf
    }

    /// Return a buffer to the pool for reuse. Capacity is kept, contents
    /// are dropped on next `acquire`.
    pub fn release(&mut self, mut buf: Vec<u8>) {
        buf.clear();
        self.free_buffers.push(buf);
    }

    /// Number of buffers currently held idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.free_buffers.len()
    }

    /// Cumulative count of `acquire` calls served from the freelist.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Cumulative count of `acquire` calls that had to allocate.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
