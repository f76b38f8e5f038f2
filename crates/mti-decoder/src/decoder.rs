use mti_types::{Result, TileError, TileErrorCode};
use mti_wire::header::{ParsedHeader, TileHeader, TILE_FIXED_HEADER_LENGTH};

use crate::decompression::{decompress_payload, is_supported};
use crate::payload::decode_values;

/// The result of inspecting a tile without touching its payload.
///
/// `payload_length` is the stored (possibly compressed) byte count as
/// declared by the header — inspection performs no decompression and no
/// payload CRC check, so a tile with a corrupt payload but an intact
/// header still inspects cleanly.
#[derive(Clone, Debug)]
pub struct TileInspection {
    pub header: TileHeader,
    pub header_length: usize,
    pub payload_offset: usize,
    pub payload_length: u64,
}

/// The result of a full decode: the header, the uncompressed payload
/// bytes, and the samples as a flat `f64` sequence in wire order.
///
/// No-data matching is not applied; use
/// [`mask_no_data`](crate::mask_no_data) with `header.no_data` when a
/// null-aware view is needed.
#[derive(Clone, Debug)]
pub struct DecodedTile {
    pub header: TileHeader,
    pub payload: Vec<u8>,
    pub values: Vec<f64>,
}

/// Parse and validate the fixed header, returning it with the derived
/// offsets and lengths.
///
/// This runs the full header-level rejection sequence (magic, version,
/// header CRC, field values, tile id, no-data padding, declared length
/// vs file length) but stops there: the payload is neither decompressed
/// nor checksummed.
///
/// # Errors
///
/// Any header-level [`TileError`] from
/// [`TileHeader::read_from`].
pub fn inspect_tile(bytes: &[u8]) -> Result<TileInspection> {
    let parsed = TileHeader::read_from(bytes)?;
    Ok(TileInspection {
        payload_length: parsed.header.payload_compressed_bytes,
        header: parsed.header,
        header_length: TILE_FIXED_HEADER_LENGTH,
        payload_offset: TILE_FIXED_HEADER_LENGTH,
    })
}

/// Fully decode a tile: header, payload integrity, and sample values.
///
/// The pipeline is a straight line with no retries — each stage consumes
/// the previous stage's output only after its integrity check passed:
///
/// ```text
/// NEW → HEADER_PARSED → PAYLOAD_LOADED → DECOMPRESSED
///     → CRC_VERIFIED → SAMPLES_DECODED
/// ```
///
/// # Errors
///
/// Everything [`inspect_tile`] can produce, plus:
/// - `UNSUPPORTED_COMPRESSION` when the stored mode cannot be decoded
///   by this build.
/// - `DECOMPRESSION_FAILED` for a corrupt DEFLATE stream.
/// - `INVALID_PAYLOAD_LENGTH` when the decompressed length disagrees
///   with the header or with `sample_count * byte_size(dtype)`.
/// - `PAYLOAD_CHECKSUM_MISMATCH` when the CRC over the uncompressed
///   bytes does not match the header.
pub fn decode_tile(bytes: &[u8]) -> Result<DecodedTile> {
    let ParsedHeader {
        header,
        stored_payload_len,
        uncompressed_payload_len,
    } = TileHeader::read_from(bytes)?;

    if !is_supported(header.compression) {
        return Err(TileError::new(
            TileErrorCode::UnsupportedCompression,
            format!("compression mode {} is not available", header.compression.name()),
        ));
    }

    // read_from already verified the buffer reaches this far
    let stored =
        &bytes[TILE_FIXED_HEADER_LENGTH..TILE_FIXED_HEADER_LENGTH + stored_payload_len];

    let payload = decompress_payload(header.compression, stored)?;

    if payload.len() != uncompressed_payload_len {
        return Err(TileError::new(
            TileErrorCode::InvalidPayloadLength,
            format!(
                "uncompressed payload length mismatch: expected={uncompressed_payload_len} got={}",
                payload.len()
            ),
        ));
    }

    let payload_crc32 = crc32fast::hash(&payload);
    if payload_crc32 != header.payload_crc32 {
        return Err(TileError::new(
            TileErrorCode::PayloadChecksumMismatch,
            format!(
                "payload checksum mismatch: expected={:08x} actual={payload_crc32:08x}",
                header.payload_crc32
            ),
        ));
    }

    let expected_len = header.dimensions.payload_byte_length(header.dtype)?;
    if payload.len() != expected_len {
        return Err(TileError::new(
            TileErrorCode::InvalidPayloadLength,
            format!(
                "decoded payload length mismatch: expected={expected_len} got={}",
                payload.len()
            ),
        ));
    }

    let values = decode_values(header.dtype, header.endianness, &payload)?;

    Ok(DecodedTile {
        header,
        payload,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mti_encoder::{encode_tile, encode_values, TileEncodeInput};
    use mti_types::{CompressionMode, DType, Endianness, MeshKind, TileDimensions};

    fn encoded_sample(compression: CompressionMode) -> Vec<u8> {
        let payload =
            encode_values(DType::Uint16, Endianness::Little, &[1.0, 2.0, 3.0, 4.0], 4).unwrap();
        encode_tile(TileEncodeInput {
            tile_id: 1001,
            mesh_kind: MeshKind::JisX0410,
            dtype: DType::Uint16,
            endianness: Endianness::Little,
            compression,
            dimensions: TileDimensions { rows: 2, cols: 2, bands: 1 },
            no_data: None,
            payload: &payload,
        })
        .unwrap()
        .bytes
    }

    #[test]
    fn inspect_reports_offsets_without_reading_payload() {
        let bytes = encoded_sample(CompressionMode::None);
        let inspection = inspect_tile(&bytes).unwrap();

        assert_eq!(inspection.header_length, 58);
        assert_eq!(inspection.payload_offset, 58);
        assert_eq!(inspection.payload_length, 8);
        assert_eq!(inspection.header.tile_id, 1001);
    }

    #[test]
    fn inspect_ignores_payload_corruption() {
        let mut bytes = encoded_sample(CompressionMode::None);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(inspect_tile(&bytes).is_ok());
    }

    #[test]
    fn decode_roundtrips_values() {
        let bytes = encoded_sample(CompressionMode::None);
        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(decoded.payload, [1, 0, 2, 0, 3, 0, 4, 0]);
    }

    #[test]
    fn decode_inflates_deflate_raw() {
        let bytes = encoded_sample(CompressionMode::DeflateRaw);
        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.header.compression, CompressionMode::DeflateRaw);
        assert_eq!(decoded.values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(decoded.header.payload_uncompressed_bytes, 8);
    }

    #[test]
    fn payload_corruption_fails_checksum() {
        let mut bytes = encoded_sample(CompressionMode::None);
        bytes[TILE_FIXED_HEADER_LENGTH] ^= 0x01;
        let err = decode_tile(&bytes).unwrap_err();
        assert_eq!(err.code, TileErrorCode::PayloadChecksumMismatch);
    }

    #[test]
    fn corrupt_deflate_stream_fails_decompression() {
        let mut bytes = encoded_sample(CompressionMode::DeflateRaw);
        // stomp the whole stored stream so inflation cannot succeed
        for byte in &mut bytes[TILE_FIXED_HEADER_LENGTH..] {
            *byte = 0xFF;
        }
        let err = decode_tile(&bytes).unwrap_err();
        assert_eq!(err.code, TileErrorCode::DecompressionFailed);
    }

    #[test]
    fn truncated_file_rejected_before_decompression() {
        let bytes = encoded_sample(CompressionMode::None);
        let err = decode_tile(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
    }
}
