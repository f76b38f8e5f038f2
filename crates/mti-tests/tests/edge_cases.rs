//! Edge case integration tests for the MTI1 decoder.
//!
//! Beyond the happy path, the decoder's contract is dominated by its
//! rejection behavior: the fixed check order, the strict no-data padding
//! rule, and the length checks that run before any allocation. These
//! tests tamper with real encoded tiles — refreshing the header CRC when
//! the point is to reach a check *behind* it — and assert the exact
//! error code for each condition.

use mti_decoder::{decode_tile, inspect_tile};
use mti_encoder::{encode_tile, encode_values, TileEncodeInput};
use mti_tests::TileFixture;
use mti_types::{
    CompressionMode, DType, Endianness, MeshKind, TileDimensions, TileErrorCode,
};

/// Recompute the header CRC after a deliberate field edit, so the test
/// reaches the validation stage behind the checksum.
fn refresh_header_crc(bytes: &mut [u8]) {
    let crc = crc32fast::hash(&bytes[..54]);
    bytes[54..58].copy_from_slice(&crc.to_le_bytes());
}

// ── Header length ─────────────────────────────────────────────────────────────

#[test]
fn empty_and_short_files_rejected() {
    for len in [0, 1, 57] {
        let bytes = vec![0_u8; len];
        let err = inspect_tile(&bytes).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidHeaderLength, "len {len}");
    }
}

#[test]
fn exactly_58_bytes_with_empty_declared_payload_is_invalid() {
    // dimensions can never be zero, so a legitimate tile always has
    // payload; craft a header claiming 0/0 lengths and watch the decoded
    // length check fire
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes.truncate(58);
    bytes[34..42].copy_from_slice(&0_u64.to_le_bytes());
    bytes[42..50].copy_from_slice(&0_u64.to_le_bytes());
    // CRC of the empty payload
    bytes[50..54].copy_from_slice(&crc32fast::hash(&[]).to_le_bytes());
    refresh_header_crc(&mut bytes);

    assert!(inspect_tile(&bytes).is_ok());
    let err = decode_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
}

// ── Declared lengths vs file ──────────────────────────────────────────────────

#[test]
fn file_shorter_than_declared_payload_rejected() {
    let bytes = TileFixture::uint16_2x2().encode_bytes();
    let err = decode_tile(&bytes[..bytes.len() - 3]).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
}

#[test]
fn trailing_bytes_after_declared_payload_are_ignored() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    let decoded = decode_tile(&bytes).unwrap();
    assert_eq!(decoded.values, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn understated_stored_length_breaks_the_identity_invariant() {
    // compression=none requires stored == uncompressed; shrink the
    // stored length and the post-decompression length check fires
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[42..50].copy_from_slice(&7_u64.to_le_bytes());
    refresh_header_crc(&mut bytes);

    let err = decode_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
}

#[test]
fn overstated_uncompressed_length_rejected_after_inflation() {
    let mut bytes = TileFixture::uint16_2x2()
        .with_compression(CompressionMode::DeflateRaw)
        .encode_bytes();
    bytes[34..42].copy_from_slice(&16_u64.to_le_bytes());
    refresh_header_crc(&mut bytes);

    let err = decode_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
}

#[test]
fn declared_length_beyond_file_end_rejected_at_parse() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[42..50].copy_from_slice(&u64::from(u32::MAX).to_le_bytes());
    refresh_header_crc(&mut bytes);

    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
}

// ── Enum codes behind a valid checksum ───────────────────────────────────────

#[test]
fn unknown_mesh_kind_code_rejected() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[13] = 3;
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn unknown_dtype_code_rejected() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[14] = 0x0F; // dtype code 15, little-endian
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn unknown_compression_code_rejected() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[15] = 2;
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn zero_dimension_rejected_behind_valid_crc() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[16..20].copy_from_slice(&0_u32.to_le_bytes());
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

// ── Tile id validity behind a valid checksum ─────────────────────────────────

#[test]
fn xyz_tile_with_stray_bits_rejected_at_parse() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[13] = 2; // switch kind to XYZ
    let bad_id = (1_u64 << 58) | 16;
    bytes[5..13].copy_from_slice(&bad_id.to_le_bytes());
    refresh_header_crc(&mut bytes);

    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn jis_tile_accepts_any_id() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[5..13].copy_from_slice(&u64::MAX.to_le_bytes());
    refresh_header_crc(&mut bytes);
    assert!(decode_tile(&bytes).is_ok());
}

// ── No-data padding rule ─────────────────────────────────────────────────────

#[test]
fn nonzero_slot_with_absent_kind_rejected() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[30] = 0x01;
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn nonzero_padding_with_present_kind_rejected() {
    let mut bytes = TileFixture::uint16_2x2()
        .with_no_data(Some(0x1234 as f64))
        .encode_bytes();
    // little-endian uint16 sentinel occupies bytes 26..28; byte 33 is padding
    bytes[33] = 0x01;
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn unknown_no_data_kind_rejected() {
    let mut bytes = TileFixture::uint16_2x2().encode_bytes();
    bytes[25] = 2;
    refresh_header_crc(&mut bytes);
    let err = inspect_tile(&bytes).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

// ── Encoder-side validation ──────────────────────────────────────────────────

#[test]
fn encode_rejects_zero_dimensions() {
    for dims in [
        TileDimensions { rows: 0, cols: 2, bands: 1 },
        TileDimensions { rows: 2, cols: 0, bands: 1 },
        TileDimensions { rows: 2, cols: 2, bands: 0 },
    ] {
        let err = encode_tile(TileEncodeInput {
            tile_id: 1,
            mesh_kind: MeshKind::JisX0410,
            dtype: DType::Uint8,
            endianness: Endianness::Little,
            compression: CompressionMode::None,
            dimensions: dims,
            no_data: None,
            payload: &[],
        })
        .unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }
}

#[test]
fn encode_rejects_value_count_mismatch() {
    let err = encode_values(DType::Uint8, Endianness::Little, &[1.0, 2.0, 3.0], 4).unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}

#[test]
fn encode_rejects_out_of_range_no_data() {
    let payload = encode_values(DType::Uint8, Endianness::Little, &[1.0; 4], 4).unwrap();
    let err = encode_tile(TileEncodeInput {
        tile_id: 1,
        mesh_kind: MeshKind::JisX0410,
        dtype: DType::Uint8,
        endianness: Endianness::Little,
        compression: CompressionMode::None,
        dimensions: TileDimensions { rows: 2, cols: 2, bands: 1 },
        no_data: Some(300.0),
        payload: &payload,
    })
    .unwrap_err();
    assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
}
