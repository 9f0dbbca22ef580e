//! Metadata records handed to the external rendering stage
//!
//! Both records are 64 bytes with explicit C layout so they can be uploaded
//! next to the packed word buffers unchanged. The renderer combines
//! `last_bit_mask`, `max_level`, and `current_level` with the Morton decode to
//! address voxels inside the packed data.

use bytemuck::{Pod, Zeroable};

use crate::core::Vec3;
use crate::pack::allocator::BrickSlot;
use crate::volume::{Brick, Volume};

/// Per-brick placement record
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BrickRecord {
    /// World-space center of the brick
    pub position: Vec3,
    /// Edge length in voxels
    pub size: u32,
    /// Word offset of this brick's data within its buffer
    pub buffer_offset: u32,
    /// Destination buffer index
    pub buffer_index: u32,
    pub max_level: u32,
    pub current_level: u32,
    /// Brick index in load order
    pub id: u32,
    pub box_min: Vec3,
    pub box_max: Vec3,
    /// Curve-prefix sentinel, `1 << (3 * max_level)`
    pub last_bit_mask: u32,
}

/// Per-volume record
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VolumeRecord {
    /// World-space center of the volume
    pub position: Vec3,
    pub box_min: Vec3,
    pub box_max: Vec3,
    pub scale: Vec3,
    pub brick_count: u32,
    /// 1 if brick sources are hierarchical Z ordered
    pub hz_ordered: u32,
    pub bits_per_pixel: u32,
    /// Largest global dimension, the world-space normalizer
    pub max_global_dim: u32,
}

/// Build the placement record for one brick
pub fn brick_record(brick: &Brick, slot: &BrickSlot) -> BrickRecord {
    BrickRecord {
        position: brick.position(),
        size: brick.size(),
        buffer_offset: slot.offset as u32,
        buffer_index: slot.buffer as u32,
        max_level: brick.max_level(),
        current_level: brick.current_level(),
        id: brick.id(),
        box_min: brick.bounds().min,
        box_max: brick.bounds().max,
        last_bit_mask: brick.last_bit_mask(),
    }
}

/// Build the aggregate record for the volume
pub fn volume_record(volume: &Volume) -> VolumeRecord {
    VolumeRecord {
        position: volume.position(),
        box_min: volume.bounds().min,
        box_max: volume.bounds().max,
        scale: volume.scale(),
        brick_count: volume.bricks().len() as u32,
        hz_ordered: volume.hz_ordered() as u32,
        bits_per_pixel: volume.bits_per_pixel(),
        max_global_dim: volume.max_global_dim(),
    }
}
