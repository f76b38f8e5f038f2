#![warn(clippy::pedantic)]

pub mod dims;
pub mod dtype;
pub mod enums;
pub mod error;

pub use dims::TileDimensions;
pub use dtype::DType;
pub use enums::{CompressionMode, Endianness, MeshKind};
pub use error::{Result, TileError, TileErrorCode};
