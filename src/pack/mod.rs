//! Packing stage: byte-to-word packing, buffer allocation, pass orchestration

pub mod packer;
pub mod allocator;
pub mod records;
pub mod pipeline;

pub use allocator::{AllocationPlan, BrickSlot, BufferBudget, MAX_BUFFERS};
pub use packer::WordWidth;
pub use pipeline::{pack_volume, PackedBuffer, PackedVolume};
pub use records::{BrickRecord, VolumeRecord};
