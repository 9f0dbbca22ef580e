//! Error types for the packing pipeline

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("brick {brick}: read {actual} bytes, expected {expected}")]
    SizeMismatch {
        brick: u32,
        expected: usize,
        actual: usize,
    },

    #[error(
        "brick {brick}: {words} packed words exceed buffer {buffer} capacity of {capacity} words"
    )]
    CapacityExceeded {
        brick: u32,
        buffer: usize,
        words: usize,
        capacity: usize,
    },
}
