//! Volume packer binary — loads a bricked volume and runs one pack pass.
//!
//! Usage: cargo run --release --bin pack_volume -- --data <DIR> [OPTIONS]
//!
//! Options:
//!   --data <DIR>         Volume directory containing metadata.json (required)
//!   --level <N>          LOD for all bricks, clamped per brick (default: max per brick)
//!   --buffers <N>        Number of destination buffers, 1-10 (default: 3)
//!   --max-bytes <BYTES>  Per-buffer byte ceiling (default: 200000000)
//!
//! Prints per-buffer occupancy and per-brick placements, then exits. The
//! packed buffers themselves stay in memory; this bin exists to validate a
//! dataset and preview how it will be laid out for the renderer.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use hzpack::pack::{pack_volume, BufferBudget};
use hzpack::volume::Volume;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(data_dir) = parse_str_arg(&args, "--data") else {
        eprintln!("usage: pack_volume --data <DIR> [--level <N>] [--buffers <N>] [--max-bytes <BYTES>]");
        return ExitCode::FAILURE;
    };
    // u32::MAX clamps to each brick's own max level
    let level = parse_u32_arg(&args, "--level").unwrap_or(u32::MAX);
    let default_budget = BufferBudget::default();
    let budget = BufferBudget::new(
        parse_usize_arg(&args, "--buffers").unwrap_or(default_budget.buffers),
        parse_usize_arg(&args, "--max-bytes").unwrap_or(default_budget.max_bytes_per_buffer),
    );

    let start = Instant::now();
    let volume = match Volume::load(PathBuf::from(&data_dir), level) {
        Ok(volume) => volume,
        Err(e) => {
            log::error!("failed to load volume: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let packed = match pack_volume(&volume, &budget) {
        Ok(packed) => packed,
        Err(e) => {
            log::error!("pack pass failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let elapsed = start.elapsed();

    println!();
    println!("Volume: {}", data_dir);
    println!(
        "  {} bricks, {} bits/pixel, isovalue range {}, hz ordered: {}",
        packed.volume.brick_count,
        packed.volume.bits_per_pixel,
        volume.isovalue_range(),
        packed.volume.hz_ordered == 1,
    );
    println!("Buffers ({} active of {}):", packed.plan.active_buffers, packed.buffers.len());
    for buffer in &packed.buffers {
        println!(
            "  [{}] {} / {} words ({:.1}%)",
            buffer.index,
            buffer.occupied_words(),
            buffer.capacity_words,
            buffer.occupied_words() as f64 / buffer.capacity_words as f64 * 100.0,
        );
    }
    for record in &packed.bricks {
        log::debug!(
            "brick {}: buffer {} offset {}, level {}/{}, mask {:#x}",
            record.id,
            record.buffer_index,
            record.buffer_offset,
            record.current_level,
            record.max_level,
            record.last_bit_mask,
        );
    }
    println!("Packed in {:.1}ms", elapsed.as_secs_f64() * 1000.0);

    ExitCode::SUCCESS
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
