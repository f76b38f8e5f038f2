use mti_types::{DType, Endianness, Result, TileError, TileErrorCode};

/// Deserialize raw payload bytes into a flat `f64` sample sequence.
///
/// The inverse of the encode-side serializer: samples come back in the
/// linear order `((row * cols) + col) * bands + band`. Decoding never
/// range-checks — byte width and signedness already constrain every
/// value — and no-data matching is deliberately left to the caller.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when `payload.len()` is not a multiple of the
/// dtype width.
pub fn decode_values(dtype: DType, endianness: Endianness, payload: &[u8]) -> Result<Vec<f64>> {
    let width = dtype.byte_size();
    if payload.len() % width != 0 {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!(
                "payload byte length {} is not divisible by {width}",
                payload.len()
            ),
        ));
    }

    let mut values = Vec::with_capacity(payload.len() / width);
    for chunk in payload.chunks_exact(width) {
        values.push(dtype.read_scalar(chunk, endianness)?);
    }
    Ok(values)
}

/// Replace samples equal to the no-data sentinel with `None`.
///
/// A pure projection over already-decoded values; `decode_values` never
/// applies it implicitly. With no sentinel every sample maps to `Some`.
/// NaN samples never match (NaN compares unequal to everything,
/// including a NaN sentinel — which the no-data codec rejects anyway).
pub fn mask_no_data(values: &[f64], no_data: Option<f64>) -> Vec<Option<f64>> {
    match no_data {
        None => values.iter().map(|v| Some(*v)).collect(),
        Some(sentinel) => values
            .iter()
            .map(|v| if *v == sentinel { None } else { Some(*v) })
            .collect(),
    }
}
