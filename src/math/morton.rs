//! Morton encoding (Z-order curve) and HZ-curve indexing
//!
//! Brick data is stored in hierarchical Z order: a Morton code truncated to the
//! brick's current level of detail, then compacted into a dense index with the
//! last-bit-mask trick. The dense index addresses the packed word buffers
//! directly, so no sparse per-level lookup table has to be shipped.

/// Spread bits of a 10-bit integer into every third bit of a 32-bit integer
fn spread_bits(x: u32) -> u32 {
    let mut x = x & 0x3ff; // 10 bits max
    x = (x | (x << 16)) & 0xff0000ff;
    x = (x | (x << 8)) & 0x0300f00f;
    x = (x | (x << 4)) & 0x030c30c3;
    x = (x | (x << 2)) & 0x09249249;
    x
}

/// Compact every third bit of a 32-bit integer into a 10-bit integer
fn compact_bits(x: u32) -> u32 {
    let mut x = x & 0x09249249;
    x = (x | (x >> 2)) & 0x030c30c3;
    x = (x | (x >> 4)) & 0x0300f00f;
    x = (x | (x >> 8)) & 0xff0000ff;
    x = (x | (x >> 16)) & 0x3ff;
    x
}

/// Encode 3D coordinates into a Morton code covering `bits_per_axis` bits each.
///
/// Bit layout is `.. z1 y1 x1 z0 y0 x0`: x occupies the least significant bit
/// of each interleaved triple. Coordinates above `2^bits_per_axis - 1` are
/// masked down. `bits_per_axis` can be at most 10 for a 32-bit code.
pub fn encode(x: u32, y: u32, z: u32, bits_per_axis: u32) -> u32 {
    debug_assert!(bits_per_axis <= 10);
    let mask = (1u32 << bits_per_axis) - 1;
    spread_bits(x & mask) | (spread_bits(y & mask) << 1) | (spread_bits(z & mask) << 2)
}

/// Decode a Morton code back to 3D coordinates. Exact inverse of [`encode`].
pub fn decode(code: u32, bits_per_axis: u32) -> (u32, u32, u32) {
    debug_assert!(bits_per_axis <= 10);
    let mask = (1u32 << bits_per_axis) - 1;
    (
        compact_bits(code) & mask,
        compact_bits(code >> 1) & mask,
        compact_bits(code >> 2) & mask,
    )
}

/// Coarsen a Morton code to `level` by discarding the finest curve bits.
///
/// Masks off the low `3 * (max_level - level)` bits. `level == max_level`
/// leaves the code untouched; `level == 0` collapses the whole brick onto a
/// single sample.
pub fn truncate_to_level(code: u32, max_level: u32, level: u32) -> u32 {
    debug_assert!(level <= max_level && max_level <= 10);
    let dropped = 3 * (max_level - level);
    code & !((1u32 << dropped) - 1)
}

/// Position of a truncated Morton code within the compacted (holes-removed)
/// HZ ordering of the curve.
///
/// ORs in `last_bit_mask` (`1 << 3 * max_level`) to mark the curve-prefix
/// boundary, divides by the lowest set bit to strip trailing zeros, then
/// drops the marker bit. The result is dense over `[0, (2^level)^3)` for the
/// distinct codes at that level.
pub fn curve_index(masked_code: u32, last_bit_mask: u32) -> u32 {
    let c = masked_code | last_bit_mask;
    let c = c / (c & c.wrapping_neg());
    c >> 1
}
