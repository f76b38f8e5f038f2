use crate::error::{Result, TileError, TileErrorCode};
use crate::Endianness;

/// The eight numeric sample types a tile can carry.
///
/// Each variant is a self-describing descriptor: byte width, integrality,
/// inclusive value range, and endian-aware scalar read/write. Everything
/// else in the codec is monomorphic in the dtype it operates on — there
/// are no trait objects and no reflection, just this tagged sum.
///
/// ```text
/// ┌──────┬─────────┬───────┬───────────────────────────────┐
/// │ Code │ DType   │ Width │ Range                         │
/// ├──────┼─────────┼───────┼───────────────────────────────┤
/// │ 0    │ Uint8   │ 1     │ 0 ..= 255                     │
/// │ 1    │ Int8    │ 1     │ -128 ..= 127                  │
/// │ 2    │ Uint16  │ 2     │ 0 ..= 65535                   │
/// │ 3    │ Int16   │ 2     │ -32768 ..= 32767              │
/// │ 4    │ Uint32  │ 4     │ 0 ..= 4294967295              │
/// │ 5    │ Int32   │ 4     │ -2147483648 ..= 2147483647    │
/// │ 6    │ Float32 │ 4     │ ±f32::MAX (NaN permitted)     │
/// │ 7    │ Float64 │ 8     │ unbounded (NaN permitted)     │
/// └──────┴─────────┴───────┴───────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl DType {
    /// Encode this dtype as its header code (bits 0..6 of the packed
    /// dtype/endian byte).
    pub fn code(self) -> u8 {
        match self {
            Self::Uint8 => 0,
            Self::Int8 => 1,
            Self::Uint16 => 2,
            Self::Int16 => 3,
            Self::Uint32 => 4,
            Self::Int32 => 5,
            Self::Float32 => 6,
            Self::Float64 => 7,
        }
    }

    /// Decode a header code into a dtype.
    pub fn from_code(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Uint8),
            1 => Ok(Self::Int8),
            2 => Ok(Self::Uint16),
            3 => Ok(Self::Int16),
            4 => Ok(Self::Uint32),
            5 => Ok(Self::Int32),
            6 => Ok(Self::Float32),
            7 => Ok(Self::Float64),
            other => Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("unsupported packed dtype code {other}"),
            )),
        }
    }

    /// Display name used by the CLI and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Width of one sample in bytes.
    pub fn byte_size(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Whether samples of this dtype must be whole numbers.
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }

    /// Inclusive lower bound of the representable range.
    pub fn min_value(self) -> f64 {
        match self {
            Self::Uint8 | Self::Uint16 | Self::Uint32 => 0.0,
            Self::Int8 => f64::from(i8::MIN),
            Self::Int16 => f64::from(i16::MIN),
            Self::Int32 => f64::from(i32::MIN),
            Self::Float32 => f64::from(f32::MIN),
            Self::Float64 => f64::NEG_INFINITY,
        }
    }

    /// Inclusive upper bound of the representable range.
    pub fn max_value(self) -> f64 {
        match self {
            Self::Uint8 => f64::from(u8::MAX),
            Self::Int8 => f64::from(i8::MAX),
            Self::Uint16 => f64::from(u16::MAX),
            Self::Int16 => f64::from(i16::MAX),
            Self::Uint32 => f64::from(u32::MAX),
            Self::Int32 => f64::from(i32::MAX),
            Self::Float32 => f64::from(f32::MAX),
            Self::Float64 => f64::INFINITY,
        }
    }

    /// Write one scalar into `out` (which must be exactly
    /// [`byte_size`](Self::byte_size) bytes) under the given endianness.
    ///
    /// Validation happens here, on the encode side only: non-finite
    /// values are rejected unless the dtype is a float and the value is
    /// NaN with `allow_nan` set; integer dtypes reject fractional values;
    /// out-of-range values are rejected, including finite `f64` inputs
    /// that overflow to infinity when narrowed to `f32`.
    ///
    /// # Errors
    ///
    /// `INVALID_FIELD_VALUE` for any rejected value. `INTERNAL_FAILURE`
    /// if `out` has the wrong length — callers size the buffer from
    /// `byte_size`, so that path indicates a codec bug.
    pub fn write_scalar(
        self,
        value: f64,
        endianness: Endianness,
        allow_nan: bool,
        out: &mut [u8],
    ) -> Result<()> {
        if out.len() != self.byte_size() {
            return Err(TileError::internal(format!(
                "scalar write buffer is {} bytes, dtype {} needs {}",
                out.len(),
                self.name(),
                self.byte_size()
            )));
        }

        match self {
            Self::Uint8 => {
                let v = self.validate_integer(value)?;
                out[0] = v as u8;
            }
            Self::Int8 => {
                let v = self.validate_integer(value)?;
                out[0] = (v as i8) as u8;
            }
            Self::Uint16 => {
                let v = self.validate_integer(value)? as u16;
                out.copy_from_slice(&endian_bytes_u16(v, endianness));
            }
            Self::Int16 => {
                let v = self.validate_integer(value)? as i16;
                out.copy_from_slice(&endian_bytes_u16(v as u16, endianness));
            }
            Self::Uint32 => {
                let v = self.validate_integer(value)? as u32;
                out.copy_from_slice(&endian_bytes_u32(v, endianness));
            }
            Self::Int32 => {
                let v = self.validate_integer(value)? as i32;
                out.copy_from_slice(&endian_bytes_u32(v as u32, endianness));
            }
            Self::Float32 => {
                validate_float(value, allow_nan)?;
                let v = value as f32;
                if value.is_finite() && !v.is_finite() {
                    return Err(TileError::new(
                        TileErrorCode::InvalidFieldValue,
                        format!("out-of-range value for float32: {value}"),
                    ));
                }
                out.copy_from_slice(&endian_bytes_u32(v.to_bits(), endianness));
            }
            Self::Float64 => {
                validate_float(value, allow_nan)?;
                out.copy_from_slice(&match endianness {
                    Endianness::Little => value.to_le_bytes(),
                    Endianness::Big => value.to_be_bytes(),
                });
            }
        }

        Ok(())
    }

    /// Read one scalar from `bytes` (exactly [`byte_size`](Self::byte_size)
    /// bytes) under the given endianness.
    ///
    /// Decoding never range-checks — the byte width and signedness already
    /// constrain the value.
    pub fn read_scalar(self, bytes: &[u8], endianness: Endianness) -> Result<f64> {
        if bytes.len() != self.byte_size() {
            return Err(TileError::internal(format!(
                "scalar read chunk is {} bytes, dtype {} needs {}",
                bytes.len(),
                self.name(),
                self.byte_size()
            )));
        }

        let value = match self {
            Self::Uint8 => f64::from(bytes[0]),
            Self::Int8 => f64::from(bytes[0] as i8),
            Self::Uint16 => f64::from(read_u16(bytes, endianness)),
            Self::Int16 => f64::from(read_u16(bytes, endianness) as i16),
            Self::Uint32 => f64::from(read_u32(bytes, endianness)),
            Self::Int32 => f64::from(read_u32(bytes, endianness) as i32),
            Self::Float32 => f64::from(f32::from_bits(read_u32(bytes, endianness))),
            Self::Float64 => {
                let mut arr = [0_u8; 8];
                arr.copy_from_slice(bytes);
                match endianness {
                    Endianness::Little => f64::from_le_bytes(arr),
                    Endianness::Big => f64::from_be_bytes(arr),
                }
            }
        };

        Ok(value)
    }

    fn validate_integer(self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("non-finite value: {value}"),
            ));
        }
        if value.fract() != 0.0 {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("non-integer value for {}: {value}", self.name()),
            ));
        }
        if value < self.min_value() || value > self.max_value() {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("out-of-range value for {}: {value}", self.name()),
            ));
        }
        Ok(value)
    }
}

fn validate_float(value: f64, allow_nan: bool) -> Result<()> {
    if value.is_finite() || (allow_nan && value.is_nan()) {
        return Ok(());
    }
    Err(TileError::new(
        TileErrorCode::InvalidFieldValue,
        format!("non-finite value: {value}"),
    ))
}

fn endian_bytes_u16(v: u16, endianness: Endianness) -> [u8; 2] {
    match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    }
}

fn endian_bytes_u32(v: u32, endianness: Endianness) -> [u8; 4] {
    match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    }
}

fn read_u16(bytes: &[u8], endianness: Endianness) -> u16 {
    let arr = [bytes[0], bytes[1]];
    match endianness {
        Endianness::Little => u16::from_le_bytes(arr),
        Endianness::Big => u16::from_be_bytes(arr),
    }
}

fn read_u32(bytes: &[u8], endianness: Endianness) -> u32 {
    let arr = [bytes[0], bytes[1], bytes[2], bytes[3]];
    match endianness {
        Endianness::Little => u32::from_le_bytes(arr),
        Endianness::Big => u32::from_be_bytes(arr),
    }
}
