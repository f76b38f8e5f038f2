use crate::error::{TileError, TileErrorCode};

// ── Macro for header-code enum boilerplate ────────────────────────────
//
// The header stores each of these enums as a single byte drawn from a
// closed code table. Every enum follows the same pattern: named variants
// mapped to fixed codes, plus a conversion pair (code / from_code). The
// macro removes the repetition while keeping each enum's doc comments
// and derive list explicit at the call site.

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Encode this variant as its header code byte.
            pub fn code(self) -> u8 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            /// Decode a header code byte into this enum.
            ///
            /// Unknown codes are `INVALID_FIELD_VALUE` — the code tables
            /// are closed in format major version 1.
            pub fn from_code(value: u8) -> Result<Self, TileError> {
                match value {
                    $( $code => Ok(Self::$variant), )+
                    other => Err(TileError::new(
                        TileErrorCode::InvalidFieldValue,
                        format!("invalid {} code {other}", stringify!($name)),
                    )),
                }
            }
        }
    };
}

// ── MeshKind ──────────────────────────────────────────────────────────

code_enum! {
    /// Semantics of the 64-bit tile identity.
    ///
    /// ```text
    /// ┌──────┬──────────┬───────────────────────────────────────────┐
    /// │ Code │ Kind     │ tile_id interpretation                    │
    /// ├──────┼──────────┼───────────────────────────────────────────┤
    /// │ 1    │ JisX0410 │ JIS X0410 mesh code, no structural check  │
    /// │ 2    │ Xyz      │ (zoom << 58) | quadkey_integer            │
    /// └──────┴──────────┴───────────────────────────────────────────┘
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum MeshKind {
        JisX0410 = 1,
        Xyz = 2,
    }
}

impl MeshKind {
    /// Display name used by the CLI and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::JisX0410 => "JIS_X0410",
            Self::Xyz => "XYZ",
        }
    }
}

// ── CompressionMode ───────────────────────────────────────────────────

code_enum! {
    /// Payload compression mode.
    ///
    /// `DeflateRaw` is raw DEFLATE — no zlib header, no trailer. The
    /// stored payload length in the header reflects the compressed size;
    /// the payload CRC always covers the uncompressed bytes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub enum CompressionMode {
        #[default]
        None = 0,
        DeflateRaw = 1,
    }
}

impl CompressionMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DeflateRaw => "deflate_raw",
        }
    }
}

// ── Endianness ────────────────────────────────────────────────────────

/// Byte order applied to payload samples and the no-data scalar slot.
///
/// The fixed header itself is always little-endian; this enum only
/// governs the data plane. On the wire it occupies bit 7 of the packed
/// dtype/endian byte rather than a code byte of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    pub fn name(self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_kind_roundtrip() {
        for (variant, code) in [(MeshKind::JisX0410, 1), (MeshKind::Xyz, 2)] {
            assert_eq!(variant.code(), code);
            assert_eq!(MeshKind::from_code(code).unwrap(), variant);
        }
    }

    #[test]
    fn mesh_kind_invalid_rejected() {
        let err = MeshKind::from_code(0).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
        let err = MeshKind::from_code(3).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }

    #[test]
    fn compression_roundtrip() {
        for (variant, code) in [(CompressionMode::None, 0), (CompressionMode::DeflateRaw, 1)] {
            assert_eq!(variant.code(), code);
            assert_eq!(CompressionMode::from_code(code).unwrap(), variant);
        }
    }

    #[test]
    fn compression_defaults_to_none() {
        assert_eq!(CompressionMode::default(), CompressionMode::None);
    }

    #[test]
    fn compression_invalid_rejected() {
        let err = CompressionMode::from_code(2).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }
}
