//! Round-robin distribution of packed brick data over bounded buffers
//!
//! Brick `i` goes to buffer `i % B` and offsets are running totals, so the
//! plan is a pure function of the word counts and the budget. A single brick
//! whose size shifts changes every later offset in its buffer, which is why a
//! LOD change re-runs the whole plan instead of patching it.

use crate::core::{Error, Result};
use crate::pack::packer::WORD_BYTES;

/// Most destination buffers the external renderer can bind
pub const MAX_BUFFERS: usize = 10;

/// Destination buffer configuration
#[derive(Clone, Copy, Debug)]
pub struct BufferBudget {
    /// Number of destination buffers, `1..=MAX_BUFFERS`
    pub buffers: usize,
    /// Hard ceiling on any single buffer, in bytes
    pub max_bytes_per_buffer: usize,
}

impl BufferBudget {
    pub fn new(buffers: usize, max_bytes_per_buffer: usize) -> Self {
        Self {
            buffers,
            max_bytes_per_buffer,
        }
    }

    /// Per-buffer capacity in packed words
    pub fn capacity_words(&self) -> usize {
        self.max_bytes_per_buffer / WORD_BYTES
    }
}

impl Default for BufferBudget {
    fn default() -> Self {
        Self {
            buffers: 3,
            max_bytes_per_buffer: 200_000_000,
        }
    }
}

/// Where one brick's packed words land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrickSlot {
    /// Destination buffer index
    pub buffer: usize,
    /// Word offset within that buffer
    pub offset: usize,
    /// Packed word count
    pub words: usize,
}

/// Complete placement for one pack pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationPlan {
    /// One slot per brick, in brick order
    pub slots: Vec<BrickSlot>,
    /// Total words per buffer, over the full configured buffer count.
    /// Buffers beyond `active_buffers` hold one placeholder word so the
    /// renderer can always bind a fixed number of slots.
    pub buffer_words: Vec<usize>,
    /// Buffers actually receiving brick data (configured count clamped down
    /// to the brick count)
    pub active_buffers: usize,
}

/// Assign every brick to a buffer and a contiguous word offset.
///
/// Deterministic round-robin in brick index order; no bin-packing search.
/// Fails if the budget is out of range or any buffer would exceed its
/// capacity.
pub fn plan(word_counts: &[usize], budget: &BufferBudget) -> Result<AllocationPlan> {
    if budget.buffers == 0 || budget.buffers > MAX_BUFFERS {
        return Err(Error::Config(format!(
            "buffer count {} outside 1..={}",
            budget.buffers, MAX_BUFFERS
        )));
    }
    if word_counts.is_empty() {
        return Err(Error::Config("no bricks to allocate".into()));
    }

    let active = budget.buffers.min(word_counts.len());
    if active < budget.buffers {
        log::debug!(
            "clamping {} buffers down to {} bricks",
            budget.buffers,
            word_counts.len()
        );
    }

    let capacity = budget.capacity_words();
    let mut buffer_words = vec![0usize; budget.buffers];
    let mut slots = Vec::with_capacity(word_counts.len());

    for (i, &words) in word_counts.iter().enumerate() {
        let buffer = i % active;
        let offset = buffer_words[buffer];

        if words > capacity {
            return Err(Error::CapacityExceeded {
                brick: i as u32,
                buffer,
                words,
                capacity,
            });
        }
        if offset + words > capacity {
            return Err(Error::CapacityExceeded {
                brick: i as u32,
                buffer,
                words: offset + words,
                capacity,
            });
        }

        slots.push(BrickSlot { buffer, offset, words });
        buffer_words[buffer] = offset + words;
    }

    // Placeholder word for clamped-out trailing buffers
    for total in buffer_words.iter_mut().skip(active) {
        *total = 1;
    }

    Ok(AllocationPlan {
        slots,
        buffer_words,
        active_buffers: active,
    })
}
