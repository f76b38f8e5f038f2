use std::fmt;

/// Stable machine-readable codes for every failure the codec can produce.
///
/// The set is closed: callers (the CLI, conformance harnesses, other
/// language implementations) match on these codes, so adding or renaming
/// a variant is a format-level change. The external form is the
/// SCREAMING_SNAKE string from [`as_str`](Self::as_str).
///
/// `InternalFailure` is reserved for invariants the codec itself violated
/// (e.g. a dtype code reaching a match arm that earlier validation should
/// have filtered). It must never be observable from valid external input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileErrorCode {
    InvalidMagic,
    UnsupportedVersion,
    InvalidHeaderLength,
    InvalidFieldValue,
    MissingRequiredField,
    HeaderChecksumMismatch,
    InvalidPayloadLength,
    UnsupportedCompression,
    CompressionFailed,
    DecompressionFailed,
    PayloadChecksumMismatch,
    InternalFailure,
}

impl TileErrorCode {
    /// The wire-stable string form used in CLI output and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidMagic => "INVALID_MAGIC",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
            Self::InvalidHeaderLength => "INVALID_HEADER_LENGTH",
            Self::InvalidFieldValue => "INVALID_FIELD_VALUE",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::HeaderChecksumMismatch => "HEADER_CHECKSUM_MISMATCH",
            Self::InvalidPayloadLength => "INVALID_PAYLOAD_LENGTH",
            Self::UnsupportedCompression => "UNSUPPORTED_COMPRESSION",
            Self::CompressionFailed => "COMPRESSION_FAILED",
            Self::DecompressionFailed => "DECOMPRESSION_FAILED",
            Self::PayloadChecksumMismatch => "PAYLOAD_CHECKSUM_MISMATCH",
            Self::InternalFailure => "INTERNAL_FAILURE",
        }
    }
}

impl fmt::Display for TileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type surfaced by every codec operation.
///
/// Carries a [`TileErrorCode`], a human-readable message, and optionally
/// the underlying cause (e.g. the `std::io::Error` from a DEFLATE stream).
/// Displays as `CODE: message`, which is exactly the form the CLI prints
/// after its `error: ` prefix.
///
/// No error is recovered or retried inside the codec: the first failing
/// check in the fixed decode order produces the definitive code.
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct TileError {
    pub code: TileErrorCode,
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TileError {
    pub fn new(code: TileErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying error that triggered this failure.
    #[must_use]
    pub fn with_cause(
        mut self,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Shorthand for the invariant-violation code. Reaching this from
    /// valid external input is a bug in the codec, not in the input.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(TileErrorCode::InternalFailure, message)
    }
}

pub type Result<T> = std::result::Result<T, TileError>;
