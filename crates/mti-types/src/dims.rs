use crate::dtype::DType;
use crate::error::{Result, TileError, TileErrorCode};

/// Grid shape of a tile: `rows × cols` cells, `bands` channels per cell.
///
/// The wire layout fixes the widths — rows and cols are u32, bands is a
/// single byte — so the struct cannot represent out-of-range shapes.
/// Zero extents are representable and rejected by [`validate`](Self::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDimensions {
    pub rows: u32,
    pub cols: u32,
    pub bands: u8,
}

impl TileDimensions {
    /// Reject empty grids. Every axis must be at least 1.
    pub fn validate(self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.bands == 0 {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                "rows, cols, and bands must be > 0",
            ));
        }
        Ok(())
    }

    /// Total sample count, `rows * cols * bands`, with overflow checked.
    pub fn sample_count(self) -> Result<u64> {
        u64::from(self.rows)
            .checked_mul(u64::from(self.cols))
            .and_then(|v| v.checked_mul(u64::from(self.bands)))
            .ok_or_else(|| {
                TileError::new(
                    TileErrorCode::InvalidFieldValue,
                    "sample count overflows u64",
                )
            })
    }

    /// Byte length of the uncompressed payload for `dtype`, as a
    /// pointer-safe `usize`.
    ///
    /// # Errors
    ///
    /// `INVALID_PAYLOAD_LENGTH` when the byte length overflows u64 or
    /// exceeds the platform `usize` — this check runs before any
    /// allocation is attempted.
    pub fn payload_byte_length(self, dtype: DType) -> Result<usize> {
        let byte_len = self
            .sample_count()?
            .checked_mul(dtype.byte_size() as u64)
            .ok_or_else(|| {
                TileError::new(TileErrorCode::InvalidPayloadLength, "payload length overflow")
            })?;

        usize::try_from(byte_len).map_err(|_| {
            TileError::new(
                TileErrorCode::InvalidPayloadLength,
                "payload length exceeds platform usize",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_rejected() {
        for dims in [
            TileDimensions { rows: 0, cols: 1, bands: 1 },
            TileDimensions { rows: 1, cols: 0, bands: 1 },
            TileDimensions { rows: 1, cols: 1, bands: 0 },
        ] {
            let err = dims.validate().unwrap_err();
            assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
        }
    }

    #[test]
    fn sample_count_multiplies_axes() {
        let dims = TileDimensions { rows: 3, cols: 4, bands: 2 };
        assert_eq!(dims.sample_count().unwrap(), 24);
    }

    #[test]
    fn sample_count_overflow_rejected() {
        let dims = TileDimensions { rows: u32::MAX, cols: u32::MAX, bands: u8::MAX };
        let err = dims.sample_count().unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);

        let dims = TileDimensions { rows: u32::MAX, cols: 1, bands: u8::MAX };
        assert_eq!(dims.sample_count().unwrap(), u64::from(u32::MAX) * 255);
    }

    #[test]
    fn payload_byte_length_scales_by_width() {
        let dims = TileDimensions { rows: 2, cols: 2, bands: 1 };
        assert_eq!(dims.payload_byte_length(DType::Uint16).unwrap(), 8);
        assert_eq!(dims.payload_byte_length(DType::Float64).unwrap(), 32);
    }

    #[test]
    fn payload_byte_length_overflow_rejected() {
        // sample count itself fits u64, the byte length does not
        let dims = TileDimensions { rows: u32::MAX, cols: u32::MAX, bands: 1 };
        let err = dims.payload_byte_length(DType::Float64).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidPayloadLength);
    }
}
