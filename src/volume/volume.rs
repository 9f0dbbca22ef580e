//! The full dataset: brick collection, placement, and aggregate metadata

use std::path::{Path, PathBuf};

use crate::core::{Error, Result, UVec3, Vec3};
use crate::math::Aabb;
use crate::volume::brick::Brick;
use crate::volume::layout::{Endianness, VolumeLayout, LAYOUT_FILENAME};

/// The whole volume: an ordered brick collection plus dataset-wide metadata.
///
/// Brick order is load order; brick index is the identity referenced by the
/// packing stage and the emitted records. Immutable after load except for
/// per-brick LOD updates.
#[derive(Debug)]
pub struct Volume {
    bricks: Vec<Brick>,
    global_size: UVec3,
    bytes_per_pixel: u32,
    endianness: Endianness,
    position: Vec3,
    bounds: Aabb,
    scale: Vec3,
    hz_ordered: bool,
    data_dir: PathBuf,
}

impl Volume {
    /// Load a volume from a directory containing `metadata.json` and the brick
    /// source files it references.
    ///
    /// Every brick starts at `default_level`, clamped per brick. Any parse,
    /// validation, or I/O failure aborts the whole load; a partial volume is
    /// never returned.
    pub fn load(dir: impl AsRef<Path>, default_level: u32) -> Result<Self> {
        let dir = dir.as_ref();
        let layout = VolumeLayout::from_file(&dir.join(LAYOUT_FILENAME))?;

        let global_size = UVec3::from_array(layout.global_size);
        let max_dim = global_size.max_element() as f32;
        let hz_ordered = layout.hz_ordered();

        // Two-stage centering: the global bounding cube and the (possibly
        // non-cubic) data extents are both centered on the same point, and the
        // difference of the two centering offsets gives the data's corner in
        // voxel space. Bricks that only partially fill the volume still end up
        // symmetric about the common center.
        let bounding_center = Vec3::splat(max_dim) * 0.5;
        let data_center = global_size.as_vec3() * 0.5;
        let data_corner = bounding_center - data_center;

        let mut bricks = Vec::with_capacity(layout.bricks.len());
        for (i, entry) in layout.bricks.iter().enumerate() {
            let source = dir.join(&entry.filename);
            std::fs::metadata(&source).map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("brick {}: {}: {}", i, source.display(), e),
                ))
            })?;

            let half_extent = Vec3::splat(entry.size as f32 * 0.5);
            let voxel_offset = Vec3::new(
                entry.position[0] as f32,
                entry.position[1] as f32,
                entry.position[2] as f32,
            );
            let center = (data_corner + voxel_offset + half_extent) / max_dim;
            let bounds = Aabb::from_center_half_extent(center, half_extent / max_dim);

            bricks.push(Brick::new(
                i as u32,
                source,
                entry.size,
                default_level,
                center,
                bounds,
            )?);
        }

        let scale = layout.scale.map_or(Vec3::ONE, Vec3::from_array);

        log::info!(
            "loaded volume from {}: {} bricks, {}x{}x{} voxels, {} bytes/pixel{}",
            dir.display(),
            bricks.len(),
            global_size.x,
            global_size.y,
            global_size.z,
            layout.bytes_per_pixel,
            if hz_ordered { ", hz ordered" } else { "" },
        );

        Ok(Self {
            bricks,
            global_size,
            bytes_per_pixel: layout.bytes_per_pixel,
            endianness: layout.endianness,
            position: Vec3::splat(0.5),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
            scale,
            hz_ordered,
            data_dir: dir.to_path_buf(),
        })
    }

    /// Upper end of the isovalue range: `2^bits_per_pixel - 1`
    pub fn isovalue_range(&self) -> u32 {
        ((1u64 << self.bits_per_pixel()) - 1) as u32
    }

    /// Set every brick's LOD, clamped per brick. Invalidates any previously
    /// packed buffers; run a fresh pack pass afterwards.
    pub fn set_level_all(&mut self, level: u32) {
        for brick in &mut self.bricks {
            brick.set_level(level);
        }
    }

    /// Set one brick's LOD by index, clamped. Returns the applied level.
    pub fn set_brick_level(&mut self, index: usize, level: u32) -> Option<u32> {
        self.bricks.get_mut(index).map(|b| b.set_level(level))
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn global_size(&self) -> UVec3 {
        self.global_size
    }

    /// Largest of the three global dimensions; the world-space normalizer
    pub fn max_global_dim(&self) -> u32 {
        self.global_size.max_element()
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bytes_per_pixel * 8
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// World-space center of the volume
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space bounding box of the whole dataset
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Whether brick sources carry hierarchical Z ordered data
    pub fn hz_ordered(&self) -> bool {
        self.hz_ordered
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
