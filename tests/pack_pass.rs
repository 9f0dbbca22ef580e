//! End-to-end pack pass over a filesystem-backed volume.

use std::io::Write;

use tempfile::TempDir;

use hzpack::core::Error;
use hzpack::math::morton;
use hzpack::pack::{pack_volume, BufferBudget};
use hzpack::volume::Volume;

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) {
    let mut file = std::fs::File::create(dir.path().join(name)).expect("failed to create file");
    file.write_all(bytes).expect("failed to write file");
}

/// Deterministic per-brick sample data, distinct across bricks.
fn brick_bytes(brick: usize, len: usize) -> Vec<u8> {
    (0..len).map(|i| (brick * 97 + i * 31 + 5) as u8).collect()
}

/// Four size-8 bricks tiling a 16x16x8 dataset.
fn four_brick_volume(dir: &TempDir) -> Volume {
    write_file(
        dir,
        "metadata.json",
        br#"{
            "globalSize": [16, 16, 8],
            "bytesPerPixel": 1,
            "endianness": "big",
            "totalBricks": 4,
            "scale": [1.0, 1.0, 0.5],
            "bricks": [
                { "filename": "b0.hz", "size": 8, "position": [0, 0, 0] },
                { "filename": "b1.hz", "size": 8, "position": [8, 0, 0] },
                { "filename": "b2.hz", "size": 8, "position": [0, 8, 0] },
                { "filename": "b3.hz", "size": 8, "position": [8, 8, 0] }
            ]
        }"#,
    );
    for brick in 0..4 {
        write_file(dir, &format!("b{}.hz", brick), &brick_bytes(brick, 512));
    }
    Volume::load(dir.path(), u32::MAX).expect("load failed")
}

#[test]
fn full_pass_round_robin_placement() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);

    // 512 bytes per brick at max level = 128 words each
    let packed = pack_volume(&volume, &BufferBudget::new(2, 1 << 20)).expect("pass failed");

    assert_eq!(packed.buffers.len(), 2);
    assert_eq!(packed.buffers[0].occupied_words(), 256);
    assert_eq!(packed.buffers[1].occupied_words(), 256);

    // Bricks {0, 2} in buffer 0 at offsets {0, 128}, {1, 3} in buffer 1
    let placements: Vec<(u32, u32)> = packed
        .bricks
        .iter()
        .map(|r| (r.buffer_index, r.buffer_offset))
        .collect();
    assert_eq!(placements, vec![(0, 0), (1, 0), (0, 128), (1, 128)]);

    for record in &packed.bricks {
        assert_eq!(record.max_level, 3);
        assert_eq!(record.current_level, 3);
        assert_eq!(record.last_bit_mask, 512);
    }
}

#[test]
fn volume_record_reflects_layout() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);
    let packed = pack_volume(&volume, &BufferBudget::default()).expect("pass failed");

    assert_eq!(packed.volume.brick_count, 4);
    assert_eq!(packed.volume.hz_ordered, 1);
    assert_eq!(packed.volume.bits_per_pixel, 8);
    assert_eq!(packed.volume.max_global_dim, 16);
    assert_eq!(packed.volume.scale.to_array(), [1.0, 1.0, 0.5]);
    assert_eq!(volume.isovalue_range(), 255);
}

/// Walk the full decode chain a renderer would use: voxel coordinate ->
/// Morton code -> truncated curve index -> word fetch from the packed buffer.
#[test]
fn packed_voxels_addressable_via_curve_index() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);
    let packed = pack_volume(&volume, &BufferBudget::new(2, 1 << 20)).expect("pass failed");

    for record in &packed.bricks {
        let source = brick_bytes(record.id as usize, 512);

        for (x, y, z) in [(0, 0, 0), (1, 0, 0), (3, 5, 2), (7, 7, 7)] {
            let code = morton::encode(x, y, z, record.max_level);
            let masked = morton::truncate_to_level(code, record.max_level, record.current_level);
            let index = morton::curve_index(masked, record.last_bit_mask);

            let word = packed.buffers[record.buffer_index as usize].words
                [record.buffer_offset as usize + index as usize / 4];
            let byte = (word >> (8 * (3 - index as usize % 4))) as u8; // big-endian slots

            assert_eq!(byte, source[index as usize], "voxel ({},{},{})", x, y, z);
        }
    }
}

#[test]
fn two_passes_are_byte_identical() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);
    let budget = BufferBudget::new(3, 1 << 20);

    let first = pack_volume(&volume, &budget).expect("first pass failed");
    let second = pack_volume(&volume, &budget).expect("second pass failed");

    assert_eq!(first.buffers, second.buffers);
    assert_eq!(first.bricks, second.bricks);
    assert_eq!(first.volume, second.volume);
    assert_eq!(first.plan, second.plan);
}

#[test]
fn lod_change_invalidates_and_repacks() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let mut volume = four_brick_volume(&dir);
    let budget = BufferBudget::new(2, 1 << 20);

    let full = pack_volume(&volume, &budget).expect("pass failed");
    assert_eq!(full.buffers[0].occupied_words(), 256);

    volume.set_level_all(2);
    let coarse = pack_volume(&volume, &budget).expect("pass failed");

    // 64 samples per brick -> 16 words, two bricks per buffer
    assert_eq!(coarse.buffers[0].occupied_words(), 32);
    assert_eq!(coarse.bricks[2].buffer_offset, 16);

    // The coarse pass packs the same curve prefix the full pass did
    assert_eq!(coarse.buffers[0].words[..16], full.buffers[0].words[..16]);
}

#[test]
fn truncated_brick_file_fails_pass_with_context() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);

    // Truncate one brick's source behind the volume's back
    write_file(&dir, "b2.hz", &[0u8; 37]);

    match pack_volume(&volume, &BufferBudget::default()) {
        Err(Error::SizeMismatch { brick: 2, expected: 512, actual: 37 }) => {}
        Err(other) => panic!("wrong error: {}", other),
        Ok(_) => panic!("pass should not succeed with a truncated source"),
    }
}

#[test]
fn oversized_brick_fails_before_any_read() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);

    // 128-word bricks against a 100-word ceiling
    match pack_volume(&volume, &BufferBudget::new(2, 400)) {
        Err(Error::CapacityExceeded { brick: 0, capacity: 100, .. }) => {}
        Err(other) => panic!("wrong error: {}", other),
        Ok(_) => panic!("pass should not succeed over capacity"),
    }
}

#[test]
fn more_buffers_than_bricks_get_placeholders() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let volume = four_brick_volume(&dir);

    let packed = pack_volume(&volume, &BufferBudget::new(10, 1 << 20)).expect("pass failed");
    assert_eq!(packed.buffers.len(), 10);
    assert_eq!(packed.plan.active_buffers, 4);
    for buffer in &packed.buffers[4..] {
        assert_eq!(buffer.words.as_slice(), &[0u32]);
        assert_eq!(buffer.occupied_words(), 1);
    }
}
