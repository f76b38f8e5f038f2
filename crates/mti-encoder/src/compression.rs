use std::io::Write as _;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use mti_types::{CompressionMode, Result, TileError, TileErrorCode};

/// Whether this build can produce payloads in `mode`.
///
/// Raw DEFLATE is treated as a capability rather than a given: an
/// encoder must refuse to claim a mode it cannot produce, and the
/// refusal has its own error code so callers can distinguish "codec
/// unavailable" from "codec failed". With `flate2` linked in, both modes
/// are always available here.
pub fn is_supported(mode: CompressionMode) -> bool {
    match mode {
        CompressionMode::None | CompressionMode::DeflateRaw => true,
    }
}

/// Compress the exact uncompressed payload bytes for storage.
///
/// `None` is the identity. `DeflateRaw` produces a raw DEFLATE stream —
/// no zlib header, no trailer — at the highest compression level; the
/// returned length becomes the header's stored payload length.
///
/// # Errors
///
/// - `UNSUPPORTED_COMPRESSION` when [`is_supported`] is false for `mode`
///   (the payload is not touched in that case).
/// - `COMPRESSION_FAILED` when the DEFLATE stream errors.
pub fn compress_payload(mode: CompressionMode, payload: &[u8]) -> Result<Vec<u8>> {
    if !is_supported(mode) {
        return Err(TileError::new(
            TileErrorCode::UnsupportedCompression,
            format!("compression mode {} is not available", mode.name()),
        ));
    }

    match mode {
        CompressionMode::None => Ok(payload.to_vec()),
        CompressionMode::DeflateRaw => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(payload).map_err(|err| {
                TileError::new(
                    TileErrorCode::CompressionFailed,
                    "could not compress payload using deflate-raw",
                )
                .with_cause(err)
            })?;
            encoder.finish().map_err(|err| {
                TileError::new(
                    TileErrorCode::CompressionFailed,
                    "could not finish deflate-raw compression",
                )
                .with_cause(err)
            })
        }
    }
}
