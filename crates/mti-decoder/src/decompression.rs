use std::io::Read as _;

use flate2::read::DeflateDecoder;
use mti_types::{CompressionMode, Result, TileError, TileErrorCode};

/// Whether this build can decode payloads stored in `mode`.
///
/// Mirrors the encode-side probe: the decoder checks this before
/// touching the stored payload so an unavailable codec surfaces as
/// `UNSUPPORTED_COMPRESSION` rather than a decode failure. With `flate2`
/// linked in, both modes are always available here.
pub fn is_supported(mode: CompressionMode) -> bool {
    match mode {
        CompressionMode::None | CompressionMode::DeflateRaw => true,
    }
}

/// Expand the stored payload back to its uncompressed form.
///
/// `None` is the identity. `DeflateRaw` inflates a raw DEFLATE stream
/// (no zlib wrapper). Length and checksum verification belong to the
/// caller — this stage only undoes the compression.
///
/// # Errors
///
/// - `UNSUPPORTED_COMPRESSION` when [`is_supported`] is false for `mode`.
/// - `DECOMPRESSION_FAILED` when the stream is truncated or corrupt.
pub fn decompress_payload(mode: CompressionMode, stored: &[u8]) -> Result<Vec<u8>> {
    if !is_supported(mode) {
        return Err(TileError::new(
            TileErrorCode::UnsupportedCompression,
            format!("compression mode {} is not available", mode.name()),
        ));
    }

    match mode {
        CompressionMode::None => Ok(stored.to_vec()),
        CompressionMode::DeflateRaw => {
            let mut decoder = DeflateDecoder::new(stored);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).map_err(|err| {
                TileError::new(
                    TileErrorCode::DecompressionFailed,
                    "could not decompress payload using deflate-raw",
                )
                .with_cause(err)
            })?;
            Ok(out)
        }
    }
}
