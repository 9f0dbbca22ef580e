//! Bit-packing of raw voxel bytes into fixed-width words
//!
//! The downstream compute stage addresses 32-bit words, not bytes, so raw
//! samples are packed several to a word. Byte order within a word follows the
//! volume's endianness.

use crate::core::{Error, Result};
use crate::volume::Endianness;

/// Size of one packed word in bytes
pub const WORD_BYTES: usize = 4;

/// How many source bytes each 32-bit word consumes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordWidth {
    One,
    Two,
    Four,
}

impl WordWidth {
    pub fn bytes(self) -> usize {
        match self {
            WordWidth::One => 1,
            WordWidth::Two => 2,
            WordWidth::Four => 4,
        }
    }
}

/// Number of words needed to hold `byte_len` bytes, rounding the last
/// partially filled word up
pub fn word_count(byte_len: usize, width: WordWidth) -> usize {
    byte_len.div_ceil(width.bytes())
}

/// Pack bytes into 32-bit words, `width.bytes()` per word.
///
/// Big-endian places the first byte in the most significant slot of the word's
/// span, little-endian in the least. Unfilled slots of the final word are
/// zero, so re-packing the same bytes is idempotent.
pub fn pack_words(bytes: &[u8], width: WordWidth, endianness: Endianness) -> Vec<u32> {
    let w = width.bytes();
    let mut words = vec![0u32; word_count(bytes.len(), width)];

    for (i, &byte) in bytes.iter().enumerate() {
        let slot = i % w;
        let shift = match endianness {
            Endianness::Big => 8 * (w - 1 - slot),
            Endianness::Little => 8 * slot,
        };
        words[i / w] |= (byte as u32) << shift;
    }
    words
}

/// Pack bytes that must tile words exactly; a byte count that is not a
/// multiple of the word width is an error rather than padded.
pub fn pack_words_exact(
    bytes: &[u8],
    width: WordWidth,
    endianness: Endianness,
) -> Result<Vec<u32>> {
    if bytes.len() % width.bytes() != 0 {
        return Err(Error::Config(format!(
            "{} bytes do not tile {}-byte words evenly",
            bytes.len(),
            width.bytes()
        )));
    }
    Ok(pack_words(bytes, width, endianness))
}

/// Recover the first `byte_len` bytes from packed words. Inverse of
/// [`pack_words`] over the unpadded region.
pub fn unpack_words(
    words: &[u32],
    width: WordWidth,
    endianness: Endianness,
    byte_len: usize,
) -> Vec<u8> {
    let w = width.bytes();
    debug_assert!(byte_len <= words.len() * w);

    let mut bytes = Vec::with_capacity(byte_len);
    for i in 0..byte_len {
        let slot = i % w;
        let shift = match endianness {
            Endianness::Big => 8 * (w - 1 - slot),
            Endianness::Little => 8 * slot,
        };
        bytes.push((words[i / w] >> shift) as u8);
    }
    bytes
}
