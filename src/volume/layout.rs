//! On-disk layout description for a bricked volume
//!
//! A volume directory holds one `metadata.json` describing the dataset plus one
//! HZ-ordered byte file per brick. Field names are camelCase to stay loadable
//! for datasets produced by existing brick generators.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Name of the layout file inside a volume directory
pub const LAYOUT_FILENAME: &str = "metadata.json";

/// File extension marking brick sources as hierarchical Z ordered
pub const HZ_EXTENSION: &str = "hz";

/// Byte order used when reassembling multi-byte samples into packed words
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

/// Layout description parsed from `metadata.json`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeLayout {
    /// Voxel-space extents of the full dataset
    pub global_size: [u32; 3],
    /// Sample width; 1 for 8-bit data, 2 for 16-bit data
    pub bytes_per_pixel: u32,
    /// Byte order of multi-byte samples
    #[serde(default)]
    pub endianness: Endianness,
    /// Expected brick count, cross-checked against `bricks`
    #[serde(default)]
    pub total_bricks: Option<usize>,
    /// Global scale transform applied to the volume bounding box
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    /// One entry per brick source file
    pub bricks: Vec<BrickLayout>,
}

/// Per-brick entry in the layout description
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrickLayout {
    /// Source file name, relative to the volume directory
    pub filename: String,
    /// Edge length in voxels, must be a power of two
    pub size: u32,
    /// Voxel-space offset of the brick's corner within the dataset
    pub position: [i32; 3],
}

impl VolumeLayout {
    /// Read and validate a layout file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let layout: VolumeLayout = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("malformed {}: {}", path.display(), e)))?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        if self.global_size.iter().any(|&d| d == 0) {
            return Err(Error::Config(format!(
                "global size {:?} has a zero dimension",
                self.global_size
            )));
        }
        if !matches!(self.bytes_per_pixel, 1 | 2) {
            return Err(Error::Config(format!(
                "unsupported bytes per pixel: {}",
                self.bytes_per_pixel
            )));
        }
        if self.bricks.is_empty() {
            return Err(Error::Config("layout describes no bricks".into()));
        }
        if let Some(total) = self.total_bricks {
            if total != self.bricks.len() {
                return Err(Error::Config(format!(
                    "totalBricks is {} but {} brick entries are present",
                    total,
                    self.bricks.len()
                )));
            }
        }
        Ok(())
    }

    /// Whether the brick sources carry hierarchical Z ordered data
    pub fn hz_ordered(&self) -> bool {
        self.bricks
            .first()
            .and_then(|b| Path::new(&b.filename).extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(HZ_EXTENSION))
    }
}
