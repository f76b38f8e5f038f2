use mti_types::{DType, Endianness, Result, TileError, TileErrorCode};

/// Serialize a flat sample sequence into raw payload bytes.
///
/// Samples are laid out in the fixed linear order
/// `i = ((row * cols) + col) * bands + band` — row outermost, band
/// innermost — which is exactly the order callers are expected to supply
/// them in. Each value goes through the dtype's write-side validation,
/// so a single out-of-range or fractional sample fails the whole encode.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when `values.len() != expected_count` or any
/// individual value is rejected by the dtype.
pub fn encode_values(
    dtype: DType,
    endianness: Endianness,
    values: &[f64],
    expected_count: usize,
) -> Result<Vec<u8>> {
    if values.len() != expected_count {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!(
                "expected {expected_count} sample values, got {}",
                values.len()
            ),
        ));
    }

    let width = dtype.byte_size();
    let mut out = vec![0_u8; values.len() * width];

    for (idx, value) in values.iter().enumerate() {
        let start = idx * width;
        dtype.write_scalar(*value, endianness, true, &mut out[start..start + width])?;
    }

    Ok(out)
}
