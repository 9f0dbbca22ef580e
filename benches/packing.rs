use criterion::{criterion_group, criterion_main, Criterion, black_box};

use hzpack::math::morton;
use hzpack::pack::allocator::{self, BufferBudget};
use hzpack::pack::packer::{self, WordWidth};
use hzpack::volume::Endianness;

fn bench_morton_encode_sweep(c: &mut Criterion) {
    c.bench_function("morton_encode_64cube", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for x in 0..64 {
                for y in 0..64 {
                    for z in 0..64 {
                        acc ^= morton::encode(black_box(x), black_box(y), black_box(z), 6);
                    }
                }
            }
            acc
        });
    });
}

fn bench_curve_index_sweep(c: &mut Criterion) {
    let last_bit_mask = 1u32 << 18; // size-64 brick
    c.bench_function("curve_index_64cube", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for code in 0..(1u32 << 18) {
                acc ^= morton::curve_index(black_box(code), black_box(last_bit_mask));
            }
            acc
        });
    });
}

fn bench_pack_words_256k(c: &mut Criterion) {
    let bytes: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();

    c.bench_function("pack_words_256k_be", |b| {
        b.iter(|| packer::pack_words(black_box(&bytes), WordWidth::Four, Endianness::Big));
    });

    c.bench_function("pack_words_256k_le", |b| {
        b.iter(|| packer::pack_words(black_box(&bytes), WordWidth::Four, Endianness::Little));
    });
}

fn bench_allocation_plan(c: &mut Criterion) {
    let word_counts: Vec<usize> = (0..4096).map(|i| 1024 + (i % 7) * 128).collect();
    let budget = BufferBudget::new(10, 1 << 30);

    c.bench_function("allocation_plan_4096_bricks", |b| {
        b.iter(|| allocator::plan(black_box(&word_counts), black_box(&budget)));
    });
}

criterion_group!(
    benches,
    bench_morton_encode_sweep,
    bench_curve_index_sweep,
    bench_pack_words_256k,
    bench_allocation_plan
);
criterion_main!(benches);
