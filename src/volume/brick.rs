//! A single cubic sub-volume of the dataset
//!
//! Each brick owns one HZ-ordered byte source. The source holds the brick at
//! full resolution; because the samples are curve ordered, reading the brick
//! at a coarser level is just reading a prefix of the same file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::{Error, Result, Vec3};
use crate::math::Aabb;

/// Largest supported brick edge length. Beyond this the 32-bit Morton code
/// (3 bits per level) runs out of room.
pub const MAX_BRICK_SIZE: u32 = 1024;

/// One cubic region of the volume, the unit of LOD selection and packing
#[derive(Debug)]
pub struct Brick {
    id: u32,
    size: u32,
    max_level: u32,
    current_level: u32,
    last_bit_mask: u32,
    position: Vec3,
    bounds: Aabb,
    source: PathBuf,
}

impl Brick {
    /// Create a brick from its layout entry and computed placement.
    ///
    /// `size` must be a power of two no larger than [`MAX_BRICK_SIZE`].
    /// `default_level` is clamped to the brick's maximum level.
    pub fn new(
        id: u32,
        source: PathBuf,
        size: u32,
        default_level: u32,
        position: Vec3,
        bounds: Aabb,
    ) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(Error::Config(format!(
                "brick {}: size {} is not a power of two",
                id, size
            )));
        }
        if size > MAX_BRICK_SIZE {
            return Err(Error::Config(format!(
                "brick {}: size {} exceeds maximum of {}",
                id, size, MAX_BRICK_SIZE
            )));
        }

        let max_level = size.trailing_zeros();
        let mut brick = Self {
            id,
            size,
            max_level,
            current_level: 0,
            last_bit_mask: 1u32 << (3 * max_level),
            position,
            bounds,
            source,
        };
        brick.set_level(default_level);
        Ok(brick)
    }

    /// Set the active LOD, clamped to `[0, max_level]`. Returns the level that
    /// was actually applied. Any previously packed data for this brick is
    /// stale afterwards; the caller must re-run the pack pass.
    pub fn set_level(&mut self, level: u32) -> u32 {
        let clamped = level.min(self.max_level);
        if clamped != level {
            log::debug!(
                "brick {}: level {} clamped to max {}",
                self.id, level, self.max_level
            );
        }
        self.current_level = clamped;
        clamped
    }

    /// Number of samples the current level selects: `(2^level)^3`
    pub fn sample_count(&self) -> usize {
        let edge = 1usize << self.current_level;
        edge * edge * edge
    }

    /// Read the curve prefix for the current level from the byte source.
    ///
    /// Returns exactly `sample_count() * bytes_per_pixel` bytes. A source
    /// shorter than that is an error, never silently zero-filled.
    pub fn read_raw(&self, bytes_per_pixel: u32) -> Result<Vec<u8>> {
        let expected = self.sample_count() * bytes_per_pixel as usize;

        let file = File::open(&self.source).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("brick {}: {}: {}", self.id, self.source.display(), e),
            ))
        })?;

        let mut buffer = Vec::with_capacity(expected);
        file.take(expected as u64).read_to_end(&mut buffer)?;

        if buffer.len() != expected {
            return Err(Error::SizeMismatch {
                brick: self.id,
                expected,
                actual: buffer.len(),
            });
        }
        Ok(buffer)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Sentinel bit at position `3 * max_level`, used by the curve decode to
    /// find the prefix boundary
    pub fn last_bit_mask(&self) -> u32 {
        self.last_bit_mask
    }

    /// World-space center of the brick
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space axis-aligned bounds
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn test_brick(dir: &TempDir, size: u32, byte_len: usize) -> Brick {
        let path = dir.path().join("brick_0.hz");
        let data: Vec<u8> = (0..byte_len).map(|i| (i % 251) as u8).collect();
        let mut file = std::fs::File::create(&path).expect("failed to create brick file");
        file.write_all(&data).expect("failed to write brick file");

        Brick::new(0, path, size, 0, Vec3::splat(0.5), Aabb::default())
            .expect("brick construction failed")
    }

    #[test]
    fn test_derived_levels_and_mask() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let brick = test_brick(&dir, 8, 512);
        assert_eq!(brick.max_level(), 3);
        assert_eq!(brick.last_bit_mask(), 512);

        let dir = TempDir::new().expect("failed to create temp dir");
        let brick = test_brick(&dir, 256, 0);
        assert_eq!(brick.max_level(), 8);
        assert_eq!(brick.last_bit_mask(), 1 << 24);
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        let result = Brick::new(
            3,
            PathBuf::from("missing.hz"),
            100,
            0,
            Vec3::ZERO,
            Aabb::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_set_level_clamps() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut brick = test_brick(&dir, 8, 512);
        assert_eq!(brick.set_level(2), 2);
        assert_eq!(brick.current_level(), 2);
        assert_eq!(brick.set_level(99), 3);
        assert_eq!(brick.current_level(), 3);
    }

    #[test]
    fn test_sample_count_per_level() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut brick = test_brick(&dir, 8, 512);
        brick.set_level(0);
        assert_eq!(brick.sample_count(), 1);
        brick.set_level(1);
        assert_eq!(brick.sample_count(), 8);
        brick.set_level(3);
        assert_eq!(brick.sample_count(), 512);
    }

    #[test]
    fn test_read_raw_reads_curve_prefix() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut brick = test_brick(&dir, 8, 512);
        brick.set_level(1);

        let data = brick.read_raw(1).expect("read failed");
        assert_eq!(data.len(), 8);
        // Prefix of the full-resolution curve, not a separate coarse file
        assert_eq!(data, (0..8).map(|i| i as u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_short_source_reports_mismatch() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut brick = test_brick(&dir, 8, 100);
        brick.set_level(3);

        match brick.read_raw(1) {
            Err(Error::SizeMismatch { brick: 0, expected: 512, actual: 100 }) => {}
            other => panic!("expected size mismatch, got {:?}", other.map(|d| d.len())),
        }
    }
}
