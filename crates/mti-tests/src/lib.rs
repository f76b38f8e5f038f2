//! Shared fixtures for the integration tests and benchmarks.
//!
//! [`TileFixture`] bundles every encode input plus the sample values and
//! offers chainable `with_*` overrides, so each test states only the
//! fields it actually cares about.

#![warn(clippy::pedantic)]

use mti_encoder::{encode_tile, encode_values, EncodedTile, TileEncodeInput};
use mti_types::{CompressionMode, DType, Endianness, MeshKind, TileDimensions};

/// A complete, valid encode input that tests tweak field by field.
#[derive(Clone, Debug)]
pub struct TileFixture {
    pub tile_id: u64,
    pub mesh_kind: MeshKind,
    pub dtype: DType,
    pub endianness: Endianness,
    pub compression: CompressionMode,
    pub dimensions: TileDimensions,
    pub no_data: Option<f64>,
    pub values: Vec<f64>,
}

impl TileFixture {
    /// The canonical small tile: 2×2×1 uint16 samples `[1, 2, 3, 4]`,
    /// JIS mesh id 1001, little-endian, uncompressed, no sentinel.
    #[must_use]
    pub fn uint16_2x2() -> Self {
        Self {
            tile_id: 1001,
            mesh_kind: MeshKind::JisX0410,
            dtype: DType::Uint16,
            endianness: Endianness::Little,
            compression: CompressionMode::None,
            dimensions: TileDimensions { rows: 2, cols: 2, bands: 1 },
            no_data: None,
            values: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[must_use]
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_tile_id(mut self, mesh_kind: MeshKind, tile_id: u64) -> Self {
        self.mesh_kind = mesh_kind;
        self.tile_id = tile_id;
        self
    }

    #[must_use]
    pub fn with_no_data(mut self, no_data: Option<f64>) -> Self {
        self.no_data = no_data;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, rows: u32, cols: u32, bands: u8, values: Vec<f64>) -> Self {
        self.dimensions = TileDimensions { rows, cols, bands };
        self.values = values;
        self
    }

    /// Serialize the values and encode the tile.
    ///
    /// # Panics
    ///
    /// Panics when the fixture is invalid — integration tests that probe
    /// failure paths call the codec directly instead.
    #[must_use]
    pub fn encode(&self) -> EncodedTile {
        let payload = encode_values(
            self.dtype,
            self.endianness,
            &self.values,
            self.values.len(),
        )
        .expect("fixture values serialize");

        encode_tile(TileEncodeInput {
            tile_id: self.tile_id,
            mesh_kind: self.mesh_kind,
            dtype: self.dtype,
            endianness: self.endianness,
            compression: self.compression,
            dimensions: self.dimensions,
            no_data: self.no_data,
            payload: &payload,
        })
        .expect("fixture encodes")
    }

    /// Shorthand for `encode().bytes`.
    #[must_use]
    pub fn encode_bytes(&self) -> Vec<u8> {
        self.encode().bytes
    }
}
