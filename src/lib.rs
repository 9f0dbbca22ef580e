//! hzpack - Brick decomposition and hierarchical Z-order LOD packing for volume data

pub mod core;
pub mod math;
pub mod volume;
pub mod pack;
