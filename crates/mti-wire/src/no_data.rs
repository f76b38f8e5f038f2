use mti_types::{DType, Endianness, Result, TileError, TileErrorCode};

/// Encode the optional no-data sentinel into its wire form: a kind byte
/// (0 = absent, 1 = present) and the fixed 8-byte value slot.
///
/// The slot is zeroed before the scalar bytes are written, so every
/// unused byte is guaranteed zero. For dtypes narrower than 8 bytes the
/// scalar occupies the least significant end of the slot: offsets
/// `[0, w)` on little-endian, `[8-w, 8)` on big-endian.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when the sentinel is non-finite (NaN is not a
/// representable no-data marker) or does not fit `dtype`.
pub fn encode_no_data_field(
    no_data: Option<f64>,
    dtype: DType,
    endianness: Endianness,
) -> Result<(u8, [u8; 8])> {
    let mut slot = [0_u8; 8];
    let Some(value) = no_data else {
        return Ok((0, slot));
    };

    if !value.is_finite() {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            "no_data must be a finite number or null",
        ));
    }

    let width = dtype.byte_size();
    match endianness {
        Endianness::Little => {
            dtype.write_scalar(value, endianness, false, &mut slot[..width])?;
        }
        Endianness::Big => {
            dtype.write_scalar(value, endianness, false, &mut slot[8 - width..])?;
        }
    }

    Ok((1, slot))
}

/// Decode the no-data sentinel from its wire form.
///
/// The padding rule is strict in both directions: for kind 0 the entire
/// slot must be zero, and for kind 1 every byte outside the scalar's
/// position must be zero. A lenient reader here would silently widen the
/// set of accepted inputs, so any nonzero padding byte is rejected.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` for an unknown kind byte, nonzero padding, or a
/// decoded scalar that is not finite.
pub fn decode_no_data_field(
    kind: u8,
    slot: [u8; 8],
    dtype: DType,
    endianness: Endianness,
) -> Result<Option<f64>> {
    if kind == 0 {
        if slot.iter().any(|byte| *byte != 0) {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                "no_data_value must be zero when no_data_kind=0",
            ));
        }
        return Ok(None);
    }

    if kind != 1 {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("unsupported no_data kind {kind}"),
        ));
    }

    let width = dtype.byte_size();
    let (value_bytes, padding) = match endianness {
        Endianness::Little => (&slot[..width], &slot[width..]),
        Endianness::Big => (&slot[8 - width..], &slot[..8 - width]),
    };

    if padding.iter().any(|byte| *byte != 0) {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            "no_data_value must pad most significant bytes with 0",
        ));
    }

    let value = dtype.read_scalar(value_bytes, endianness)?;
    if !value.is_finite() {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            "no_data numeric value must be finite",
        ));
    }

    Ok(Some(value))
}
