use mti_types::{
    CompressionMode, DType, Endianness, MeshKind, Result, TileDimensions, TileError,
    TileErrorCode,
};
use mti_wire::header::{TileHeader, HEADER_CHECKSUM_OFFSET, TILE_VERSION_MAJOR};
use mti_wire::no_data::encode_no_data_field;
use mti_wire::tile_id::validate_tile_id;

use crate::compression::{compress_payload, is_supported};

/// Everything the encoder needs to produce one tile.
///
/// `payload` is the raw uncompressed sample bytes in wire order — use
/// [`encode_values`](crate::encode_values) to produce them from a flat
/// `f64` sequence. Its length must equal
/// `rows * cols * bands * byte_size(dtype)` exactly.
#[derive(Clone, Debug)]
pub struct TileEncodeInput<'a> {
    pub tile_id: u64,
    pub mesh_kind: MeshKind,
    pub dtype: DType,
    pub endianness: Endianness,
    pub compression: CompressionMode,
    pub dimensions: TileDimensions,
    pub no_data: Option<f64>,
    pub payload: &'a [u8],
}

/// The result of a successful encode: the complete tile bytes plus the
/// header exactly as it was written (checksums included).
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedTile {
    pub bytes: Vec<u8>,
    pub header: TileHeader,
}

/// Encode one tile: fixed 58-byte header followed by the stored payload.
///
/// The pipeline runs every validation before any bytes are produced:
/// dimensions, tile-id structure for the mesh kind, compression
/// availability, no-data finiteness, and the payload byte length against
/// the declared shape. The payload CRC is computed over the raw
/// (uncompressed) bytes, then the payload is compressed, and finally the
/// header is packed — which computes the header CRC over bytes `[0..54)`.
///
/// # Errors
///
/// - `INVALID_FIELD_VALUE` for empty dimensions, invalid tile ids, or a
///   no-data sentinel that does not fit the dtype.
/// - `INVALID_PAYLOAD_LENGTH` when `payload` does not match
///   `sample_count * byte_size(dtype)`.
/// - `UNSUPPORTED_COMPRESSION` / `COMPRESSION_FAILED` from the
///   compression stage.
pub fn encode_tile(input: TileEncodeInput<'_>) -> Result<EncodedTile> {
    input.dimensions.validate()?;
    validate_tile_id(input.tile_id, input.mesh_kind)?;

    if !is_supported(input.compression) {
        return Err(TileError::new(
            TileErrorCode::UnsupportedCompression,
            format!("compression mode {} is not available", input.compression.name()),
        ));
    }

    let expected_payload_len = input.dimensions.payload_byte_length(input.dtype)?;
    if input.payload.len() != expected_payload_len {
        return Err(TileError::new(
            TileErrorCode::InvalidPayloadLength,
            format!(
                "payload byte length mismatch: expected={expected_payload_len} got={}",
                input.payload.len()
            ),
        ));
    }

    let (no_data_kind, no_data_value_raw) =
        encode_no_data_field(input.no_data, input.dtype, input.endianness)?;

    let payload_crc32 = crc32fast::hash(input.payload);
    let stored_payload = compress_payload(input.compression, input.payload)?;

    let mut header = TileHeader {
        format_major: TILE_VERSION_MAJOR,
        tile_id: input.tile_id,
        mesh_kind: input.mesh_kind,
        dtype: input.dtype,
        endianness: input.endianness,
        compression: input.compression,
        dimensions: input.dimensions,
        no_data_kind,
        no_data_value_raw,
        no_data: input.no_data,
        payload_uncompressed_bytes: input.payload.len() as u64,
        payload_compressed_bytes: stored_payload.len() as u64,
        payload_crc32,
        header_crc32: 0,
    };

    let header_bytes = header.to_bytes();
    header.header_crc32 = u32::from_le_bytes([
        header_bytes[HEADER_CHECKSUM_OFFSET],
        header_bytes[HEADER_CHECKSUM_OFFSET + 1],
        header_bytes[HEADER_CHECKSUM_OFFSET + 2],
        header_bytes[HEADER_CHECKSUM_OFFSET + 3],
    ]);

    let mut bytes = Vec::with_capacity(header_bytes.len() + stored_payload.len());
    bytes.extend_from_slice(&header_bytes);
    bytes.extend_from_slice(&stored_payload);

    Ok(EncodedTile { bytes, header })
}
