//! Volume dataset model: layout parsing, bricks, and placement

pub mod layout;
pub mod brick;
pub mod volume;

pub use brick::Brick;
pub use layout::{BrickLayout, Endianness, VolumeLayout};
pub use volume::Volume;
