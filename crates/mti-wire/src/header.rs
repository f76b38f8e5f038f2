use mti_types::{
    CompressionMode, DType, Endianness, MeshKind, Result, TileDimensions, TileError,
    TileErrorCode,
};

use crate::no_data::decode_no_data_field;
use crate::tile_id::validate_tile_id;

/// Magic number: ASCII `"MTI1"`. Stored as raw bytes, not as a u32, so
/// byte order never enters the comparison.
pub const TILE_MAGIC: [u8; 4] = *b"MTI1";

/// Total fixed header size in bytes. The stored payload begins at this
/// offset in every tile.
pub const TILE_FIXED_HEADER_LENGTH: usize = 58;

/// Current format major version. Any other value is a hard reject.
pub const TILE_VERSION_MAJOR: u8 = 1;

/// Offset of the header CRC slot; also the length of the CRC input,
/// since the checksum covers every byte before its own slot.
pub const HEADER_CHECKSUM_OFFSET: usize = 54;

/// Number of header bytes covered by the header CRC.
pub const HEADER_CHECKSUM_INPUT_LENGTH: usize = HEADER_CHECKSUM_OFFSET;

const OFFSET_FORMAT_MAJOR: usize = 4;
const OFFSET_TILE_ID: usize = 5;
const OFFSET_MESH_KIND: usize = 13;
const OFFSET_DTYPE_ENDIAN: usize = 14;
const OFFSET_COMPRESSION: usize = 15;
const OFFSET_ROWS: usize = 16;
const OFFSET_COLS: usize = 20;
const OFFSET_BANDS: usize = 24;
const OFFSET_NO_DATA_KIND: usize = 25;
const OFFSET_NO_DATA_VALUE: usize = 26;
const OFFSET_UNCOMPRESSED_PAYLOAD_LENGTH: usize = 34;
const OFFSET_COMPRESSED_PAYLOAD_LENGTH: usize = 42;
const OFFSET_PAYLOAD_CHECKSUM: usize = 50;

/// The parsed (or to-be-packed) fixed tile header.
///
/// All multi-byte numeric header fields are little-endian on the wire;
/// only payload samples and the no-data slot follow the tile's declared
/// [`Endianness`].
///
/// ```text
/// ┌────────┬─────────┬─────────────────────────────────────────────┐
/// │ Offset │ Size    │ Field                                       │
/// ├────────┼─────────┼─────────────────────────────────────────────┤
/// │ 0      │ 4 bytes │ Magic "MTI1" (0x4D 0x54 0x49 0x31)          │
/// │ 4      │ 1 byte  │ format_major (= 1)                          │
/// │ 5      │ 8 bytes │ tile_id (u64)                               │
/// │ 13     │ 1 byte  │ mesh_kind code (1 = JIS_X0410, 2 = XYZ)     │
/// │ 14     │ 1 byte  │ dtype/endian: bit 7 = big-endian, 0..6 code │
/// │ 15     │ 1 byte  │ compression code (0 = none, 1 = deflate)    │
/// │ 16     │ 4 bytes │ rows (u32)                                  │
/// │ 20     │ 4 bytes │ cols (u32)                                  │
/// │ 24     │ 1 byte  │ bands (u8)                                  │
/// │ 25     │ 1 byte  │ no_data kind (0 = absent, 1 = present)      │
/// │ 26     │ 8 bytes │ no_data value slot                          │
/// │ 34     │ 8 bytes │ uncompressed payload length (u64)           │
/// │ 42     │ 8 bytes │ compressed payload length (u64)             │
/// │ 50     │ 4 bytes │ payload CRC-32 (u32)                        │
/// │ 54     │ 4 bytes │ header CRC-32 over [0..54) with slot zeroed │
/// └────────┴─────────┴─────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TileHeader {
    pub format_major: u8,
    pub tile_id: u64,
    pub mesh_kind: MeshKind,
    pub dtype: DType,
    pub endianness: Endianness,
    pub compression: CompressionMode,
    pub dimensions: TileDimensions,
    pub no_data_kind: u8,
    pub no_data_value_raw: [u8; 8],
    pub no_data: Option<f64>,
    pub payload_uncompressed_bytes: u64,
    pub payload_compressed_bytes: u64,
    pub payload_crc32: u32,
    pub header_crc32: u32,
}

/// A successfully parsed header plus the payload lengths converted to
/// pointer-safe sizes, ready for slicing and allocation.
#[derive(Clone, Debug)]
pub struct ParsedHeader {
    pub header: TileHeader,
    pub stored_payload_len: usize,
    pub uncompressed_payload_len: usize,
}

impl TileHeader {
    /// Pack into the fixed 58-byte wire layout.
    ///
    /// The header CRC is always recomputed over bytes `[0..54)` with the
    /// CRC slot zeroed; the struct's `header_crc32` field is ignored on
    /// the way out. Callers that need the final value can read it back
    /// from the returned bytes.
    pub fn to_bytes(&self) -> [u8; TILE_FIXED_HEADER_LENGTH] {
        let mut bytes = [0_u8; TILE_FIXED_HEADER_LENGTH];

        bytes[0..4].copy_from_slice(&TILE_MAGIC);
        bytes[OFFSET_FORMAT_MAJOR] = self.format_major;
        bytes[OFFSET_TILE_ID..OFFSET_TILE_ID + 8].copy_from_slice(&self.tile_id.to_le_bytes());
        bytes[OFFSET_MESH_KIND] = self.mesh_kind.code();
        bytes[OFFSET_DTYPE_ENDIAN] = pack_dtype_endian(self.dtype, self.endianness);
        bytes[OFFSET_COMPRESSION] = self.compression.code();
        bytes[OFFSET_ROWS..OFFSET_ROWS + 4]
            .copy_from_slice(&self.dimensions.rows.to_le_bytes());
        bytes[OFFSET_COLS..OFFSET_COLS + 4]
            .copy_from_slice(&self.dimensions.cols.to_le_bytes());
        bytes[OFFSET_BANDS] = self.dimensions.bands;
        bytes[OFFSET_NO_DATA_KIND] = self.no_data_kind;
        bytes[OFFSET_NO_DATA_VALUE..OFFSET_NO_DATA_VALUE + 8]
            .copy_from_slice(&self.no_data_value_raw);
        bytes[OFFSET_UNCOMPRESSED_PAYLOAD_LENGTH..OFFSET_UNCOMPRESSED_PAYLOAD_LENGTH + 8]
            .copy_from_slice(&self.payload_uncompressed_bytes.to_le_bytes());
        bytes[OFFSET_COMPRESSED_PAYLOAD_LENGTH..OFFSET_COMPRESSED_PAYLOAD_LENGTH + 8]
            .copy_from_slice(&self.payload_compressed_bytes.to_le_bytes());
        bytes[OFFSET_PAYLOAD_CHECKSUM..OFFSET_PAYLOAD_CHECKSUM + 4]
            .copy_from_slice(&self.payload_crc32.to_le_bytes());

        // CRC slot is still zero here; the checksum covers exactly [0..54).
        let header_crc32 = crc32fast::hash(&bytes[..HEADER_CHECKSUM_INPUT_LENGTH]);
        bytes[HEADER_CHECKSUM_OFFSET..HEADER_CHECKSUM_OFFSET + 4]
            .copy_from_slice(&header_crc32.to_le_bytes());

        bytes
    }

    /// Parse and validate a fixed header from the front of `bytes`.
    ///
    /// The rejection order is fixed and observable through error codes:
    /// magic → version → header CRC → enum and dimension values →
    /// tile-id validity for the mesh kind → no-data padding → declared
    /// payload length vs file length. Payload lengths that do not fit
    /// the platform `usize` are rejected before any allocation.
    ///
    /// # Errors
    ///
    /// - `INVALID_HEADER_LENGTH` if `bytes` is shorter than 58 bytes or
    ///   a declared length exceeds `usize`.
    /// - `INVALID_MAGIC`, `UNSUPPORTED_VERSION`,
    ///   `HEADER_CHECKSUM_MISMATCH` for the fixed prefix checks.
    /// - `INVALID_FIELD_VALUE` for unknown enum codes, empty dimensions,
    ///   invalid tile ids, or no-data violations.
    /// - `INVALID_PAYLOAD_LENGTH` if the buffer is shorter than the
    ///   declared stored payload.
    pub fn read_from(bytes: &[u8]) -> Result<ParsedHeader> {
        if bytes.len() < TILE_FIXED_HEADER_LENGTH {
            return Err(TileError::new(
                TileErrorCode::InvalidHeaderLength,
                format!(
                    "file is {} bytes, fixed header needs {TILE_FIXED_HEADER_LENGTH}",
                    bytes.len()
                ),
            ));
        }

        if bytes[0..4] != TILE_MAGIC {
            return Err(TileError::new(
                TileErrorCode::InvalidMagic,
                "invalid file magic",
            ));
        }

        let format_major = bytes[OFFSET_FORMAT_MAJOR];
        if format_major != TILE_VERSION_MAJOR {
            return Err(TileError::new(
                TileErrorCode::UnsupportedVersion,
                format!("unsupported major version {format_major}"),
            ));
        }

        let expected_header_crc32 = read_u32_le(bytes, HEADER_CHECKSUM_OFFSET);
        let actual_header_crc32 = crc32fast::hash(&bytes[..HEADER_CHECKSUM_INPUT_LENGTH]);
        if expected_header_crc32 != actual_header_crc32 {
            return Err(TileError::new(
                TileErrorCode::HeaderChecksumMismatch,
                format!(
                    "header checksum mismatch: expected={expected_header_crc32:08x} actual={actual_header_crc32:08x}"
                ),
            ));
        }

        let mesh_kind = MeshKind::from_code(bytes[OFFSET_MESH_KIND])?;
        let (dtype, endianness) = unpack_dtype_endian(bytes[OFFSET_DTYPE_ENDIAN])?;
        let compression = CompressionMode::from_code(bytes[OFFSET_COMPRESSION])?;

        let dimensions = TileDimensions {
            rows: read_u32_le(bytes, OFFSET_ROWS),
            cols: read_u32_le(bytes, OFFSET_COLS),
            bands: bytes[OFFSET_BANDS],
        };
        dimensions.validate()?;

        let tile_id = read_u64_le(bytes, OFFSET_TILE_ID);
        validate_tile_id(tile_id, mesh_kind)?;

        let no_data_kind = bytes[OFFSET_NO_DATA_KIND];
        let mut no_data_value_raw = [0_u8; 8];
        no_data_value_raw.copy_from_slice(&bytes[OFFSET_NO_DATA_VALUE..OFFSET_NO_DATA_VALUE + 8]);
        let no_data = decode_no_data_field(no_data_kind, no_data_value_raw, dtype, endianness)?;

        let payload_uncompressed_bytes = read_u64_le(bytes, OFFSET_UNCOMPRESSED_PAYLOAD_LENGTH);
        let payload_compressed_bytes = read_u64_le(bytes, OFFSET_COMPRESSED_PAYLOAD_LENGTH);
        let payload_crc32 = read_u32_le(bytes, OFFSET_PAYLOAD_CHECKSUM);

        let uncompressed_payload_len =
            usize::try_from(payload_uncompressed_bytes).map_err(|_| {
                TileError::new(
                    TileErrorCode::InvalidHeaderLength,
                    "uncompressed payload length exceeds platform usize",
                )
            })?;
        let stored_payload_len = usize::try_from(payload_compressed_bytes).map_err(|_| {
            TileError::new(
                TileErrorCode::InvalidHeaderLength,
                "compressed payload length exceeds platform usize",
            )
        })?;

        let payload_end = TILE_FIXED_HEADER_LENGTH
            .checked_add(stored_payload_len)
            .ok_or_else(|| {
                TileError::new(
                    TileErrorCode::InvalidPayloadLength,
                    "compressed payload length overflow",
                )
            })?;
        if bytes.len() < payload_end {
            return Err(TileError::new(
                TileErrorCode::InvalidPayloadLength,
                format!(
                    "file is {} bytes, header declares {stored_payload_len} stored payload bytes",
                    bytes.len()
                ),
            ));
        }

        let header = TileHeader {
            format_major,
            tile_id,
            mesh_kind,
            dtype,
            endianness,
            compression,
            dimensions,
            no_data_kind,
            no_data_value_raw,
            no_data,
            payload_uncompressed_bytes,
            payload_compressed_bytes,
            payload_crc32,
            header_crc32: expected_header_crc32,
        };

        Ok(ParsedHeader {
            header,
            stored_payload_len,
            uncompressed_payload_len,
        })
    }
}

/// Pack the dtype code and the endianness flag into the single header
/// byte at offset 14: bit 7 set means big-endian, bits 0..6 carry the
/// dtype code.
pub fn pack_dtype_endian(dtype: DType, endianness: Endianness) -> u8 {
    let endian_bit = match endianness {
        Endianness::Little => 0x00,
        Endianness::Big => 0x80,
    };
    endian_bit | dtype.code()
}

/// Split the packed dtype/endian byte back into its parts.
pub fn unpack_dtype_endian(value: u8) -> Result<(DType, Endianness)> {
    let dtype = DType::from_code(value & 0x7F)?;
    let endianness = if value & 0x80 == 0 {
        Endianness::Little
    } else {
        Endianness::Big
    };
    Ok((dtype, endianness))
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_u64_le(bytes: &[u8], offset: usize) -> u64 {
    let mut arr = [0_u8; 8];
    arr.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(arr)
}
