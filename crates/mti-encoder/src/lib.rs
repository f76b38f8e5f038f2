#![warn(clippy::pedantic)]

pub mod compression;
pub mod encoder;
pub mod payload;

pub use encoder::{encode_tile, EncodedTile, TileEncodeInput};
pub use payload::encode_values;
