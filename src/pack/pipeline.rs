//! The full pack pass: accounting, allocation, parallel read+pack, export
//!
//! A pass either completes for the whole volume or fails; a partially packed
//! buffer set is never returned. Callers keep their previous `PackedVolume`
//! until a new pass succeeds. LOD changes invalidate the pass wholesale, so
//! the response to `set_level` is simply to run [`pack_volume`] again.

use rayon::prelude::*;

use crate::core::Result;
use crate::pack::allocator::{self, AllocationPlan, BufferBudget};
use crate::pack::packer::{self, WordWidth};
use crate::pack::records::{self, BrickRecord, VolumeRecord};
use crate::volume::Volume;

/// One destination buffer of packed words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedBuffer {
    /// Stable identifier, `0..N-1`
    pub index: usize,
    /// Packed payload; length never exceeds `capacity_words`
    pub words: Vec<u32>,
    /// Hard upper bound derived from the budget's byte ceiling
    pub capacity_words: usize,
}

impl PackedBuffer {
    pub fn occupied_words(&self) -> usize {
        self.words.len()
    }
}

/// Everything one successful pass produces
#[derive(Debug)]
pub struct PackedVolume {
    /// Destination word buffers, sized per the allocation plan
    pub buffers: Vec<PackedBuffer>,
    /// Per-brick placement records, in brick order
    pub bricks: Vec<BrickRecord>,
    /// Aggregate volume record
    pub volume: VolumeRecord,
    /// The placement the buffers were laid out with
    pub plan: AllocationPlan,
}

/// Run one pack pass over the volume at its bricks' current levels.
///
/// Per-brick reads are independent and run in parallel; each brick's packed
/// words land in the disjoint range the plan pre-computed for it, so the
/// scatter needs no locks. Re-running with unchanged levels yields
/// byte-identical buffers and records.
pub fn pack_volume(volume: &Volume, budget: &BufferBudget) -> Result<PackedVolume> {
    let width = WordWidth::Four;
    let bytes_per_pixel = volume.bytes_per_pixel();

    let word_counts: Vec<usize> = volume
        .bricks()
        .iter()
        .map(|b| packer::word_count(b.sample_count() * bytes_per_pixel as usize, width))
        .collect();

    let plan = allocator::plan(&word_counts, budget)?;

    let packed: Vec<Vec<u32>> = volume
        .bricks()
        .par_iter()
        .map(|brick| {
            let raw = brick.read_raw(bytes_per_pixel)?;
            Ok(packer::pack_words(&raw, width, volume.endianness()))
        })
        .collect::<Result<_>>()?;

    let capacity_words = budget.capacity_words();
    let mut buffers: Vec<PackedBuffer> = plan
        .buffer_words
        .iter()
        .enumerate()
        .map(|(index, &words)| PackedBuffer {
            index,
            words: vec![0u32; words],
            capacity_words,
        })
        .collect();

    for (words, slot) in packed.iter().zip(&plan.slots) {
        buffers[slot.buffer].words[slot.offset..slot.offset + slot.words].copy_from_slice(words);
    }

    let bricks: Vec<BrickRecord> = volume
        .bricks()
        .iter()
        .zip(&plan.slots)
        .map(|(brick, slot)| records::brick_record(brick, slot))
        .collect();

    log::info!(
        "packed {} bricks into {} buffers ({} active), {} words total",
        bricks.len(),
        buffers.len(),
        plan.active_buffers,
        plan.buffer_words.iter().sum::<usize>(),
    );

    Ok(PackedVolume {
        buffers,
        bricks,
        volume: records::volume_record(volume),
        plan,
    })
}
