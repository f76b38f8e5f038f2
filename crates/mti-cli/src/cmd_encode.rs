/// Implementation of `mti encode`.
///
/// Collects the tile metadata from an optional JSON file plus the
/// command-line flags (flags win), reads the sample values from an
/// inline JSON array or a values file, serializes the samples, and
/// writes the encoded tile. Prints `Wrote N bytes to <path>` on success.
///
/// # Metadata format
///
/// ```json
/// {
///   "tile_id": 1001,
///   "mesh_kind": "jis_x0410",
///   "dtype": "uint16",
///   "endianness": "little",
///   "compression": "none",
///   "rows": 2,
///   "cols": 2,
///   "bands": 1,
///   "no_data": null
/// }
/// ```
///
/// `tile_id` accepts an unsigned integer or a decimal-digit string (ids
/// near 2^64 are not representable in every JSON producer). Missing
/// `endianness` defaults to little, missing `compression` to none, and
/// missing `no_data` to absent; everything else is required.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mti_encoder::{encode_tile, encode_values, TileEncodeInput};
use mti_types::{
    CompressionMode, DType, Endianness, MeshKind, TileDimensions, TileError, TileErrorCode,
};

use crate::EncodeArgs;

// ── Metadata file shape ───────────────────────────────────────────────────────

/// Optional defaults loaded from `--metadata`. Every field can be
/// overridden by the corresponding flag.
#[derive(Default, serde::Deserialize)]
struct Metadata {
    tile_id: Option<serde_json::Value>,
    mesh_kind: Option<String>,
    dtype: Option<String>,
    endianness: Option<String>,
    compression: Option<String>,
    rows: Option<u64>,
    cols: Option<u64>,
    bands: Option<u64>,
    no_data: Option<serde_json::Value>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Run the `mti encode` command.
///
/// # Errors
///
/// Returns an error when a required field is missing
/// (`MISSING_REQUIRED_FIELD`), a field value is malformed or out of
/// range (`INVALID_FIELD_VALUE`), the value count does not match the
/// declared shape, or the output file cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let metadata = match &args.metadata {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&src)
                .with_context(|| format!("failed to parse metadata {}", path.display()))?
        }
        None => Metadata::default(),
    };

    let tile_id = resolve_tile_id(args.tile_id.as_deref(), metadata.tile_id.as_ref())?;
    let mesh_kind = parse_mesh_kind(&require_str(
        args.mesh_kind.as_deref(),
        metadata.mesh_kind.as_deref(),
        "mesh_kind",
    )?)?;
    let dtype = parse_dtype(&require_str(
        args.dtype.as_deref(),
        metadata.dtype.as_deref(),
        "dtype",
    )?)?;
    let endianness = match args.endianness.as_deref().or(metadata.endianness.as_deref()) {
        Some(name) => parse_endianness(name)?,
        None => Endianness::default(),
    };
    let compression = match args.compression.as_deref().or(metadata.compression.as_deref()) {
        Some(name) => parse_compression(name)?,
        None => CompressionMode::default(),
    };

    let dimensions = TileDimensions {
        rows: dimension_u32(args.rows.or(metadata.rows), "rows")?,
        cols: dimension_u32(args.cols.or(metadata.cols), "cols")?,
        bands: dimension_u8(args.bands.or(metadata.bands), "bands")?,
    };

    let no_data = resolve_no_data(args.no_data.as_deref(), metadata.no_data.as_ref())?;

    let values = load_values(args.values.as_deref(), args.values_file.as_ref())?;

    let expected_count = usize::try_from(dimensions.sample_count()?).map_err(|_| {
        TileError::new(
            TileErrorCode::InvalidPayloadLength,
            "sample count exceeds platform usize",
        )
    })?;
    let payload = encode_values(dtype, endianness, &values, expected_count)?;

    let encoded = encode_tile(TileEncodeInput {
        tile_id,
        mesh_kind,
        dtype,
        endianness,
        compression,
        dimensions,
        no_data,
        payload: &payload,
    })?;

    fs::write(&args.output, &encoded.bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!("Wrote {} bytes to {}", encoded.bytes.len(), args.output.display());
    Ok(())
}

// ── Field resolution ──────────────────────────────────────────────────────────

/// Picks the flag value over the metadata value, erroring with
/// `MISSING_REQUIRED_FIELD` when neither is present.
fn require_str(flag: Option<&str>, meta: Option<&str>, field: &str) -> Result<String, TileError> {
    flag.or(meta).map(str::to_owned).ok_or_else(|| {
        TileError::new(
            TileErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    })
}

fn resolve_tile_id(
    flag: Option<&str>,
    meta: Option<&serde_json::Value>,
) -> Result<u64, TileError> {
    if let Some(text) = flag {
        return parse_tile_id_digits(text);
    }
    match meta {
        Some(value) => normalize_tile_id(value),
        None => Err(TileError::new(
            TileErrorCode::MissingRequiredField,
            "tile_id is required",
        )),
    }
}

/// Normalize a JSON tile id: an unsigned integer, or a string of
/// decimal digits. Negative numbers, fractional numbers, and anything
/// else are rejected.
fn normalize_tile_id(value: &serde_json::Value) -> Result<u64, TileError> {
    match value {
        serde_json::Value::Number(num) => num.as_u64().ok_or_else(|| {
            TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("tile_id must be an unsigned integer, got {num}"),
            )
        }),
        serde_json::Value::String(text) => parse_tile_id_digits(text),
        other => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("tile_id must be a number or digit string, got {other}"),
        )),
    }
}

fn parse_tile_id_digits(text: &str) -> Result<u64, TileError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("tile_id must be an unsigned decimal string, got {text:?}"),
        ));
    }
    text.parse::<u64>().map_err(|_| {
        TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("tile_id {text} is outside [0, 2^64)"),
        )
    })
}

fn dimension_u32(value: Option<u64>, field: &str) -> Result<u32, TileError> {
    let raw = value.ok_or_else(|| {
        TileError::new(
            TileErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    })?;
    if raw == 0 || raw > u64::from(u32::MAX) {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("{field} must be in [1, {}], got {raw}", u32::MAX),
        ));
    }
    Ok(raw as u32)
}

fn dimension_u8(value: Option<u64>, field: &str) -> Result<u8, TileError> {
    let raw = value.ok_or_else(|| {
        TileError::new(
            TileErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    })?;
    if raw == 0 || raw > u64::from(u8::MAX) {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("{field} must be in [1, 255], got {raw}"),
        ));
    }
    Ok(raw as u8)
}

fn resolve_no_data(
    flag: Option<&str>,
    meta: Option<&serde_json::Value>,
) -> Result<Option<f64>, TileError> {
    if let Some(text) = flag {
        if text == "null" {
            return Ok(None);
        }
        return text.parse::<f64>().map(Some).map_err(|_| {
            TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("no_data must be a number or null, got {text:?}"),
            )
        });
    }
    match meta {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(num)) => num.as_f64().map(Some).ok_or_else(|| {
            TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("no_data is not representable as a number: {num}"),
            )
        }),
        Some(other) => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("no_data must be a number or null, got {other}"),
        )),
    }
}

// ── Value loading ─────────────────────────────────────────────────────────────

/// Reads the sample values from `--values` or `--values-file`.
fn load_values(inline: Option<&str>, file: Option<&PathBuf>) -> Result<Vec<f64>> {
    let text = match (inline, file) {
        (Some(_), Some(_)) => {
            return Err(TileError::new(
                TileErrorCode::InvalidFieldValue,
                "pass either --values or --values-file, not both",
            )
            .into());
        }
        (Some(text), None) => text.to_owned(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        (None, None) => {
            return Err(TileError::new(
                TileErrorCode::MissingRequiredField,
                "sample values are required (--values or --values-file)",
            )
            .into());
        }
    };

    let parsed: serde_json::Value =
        serde_json::from_str(&text).context("failed to parse values JSON")?;
    let array = parsed.as_array().ok_or_else(|| {
        TileError::new(TileErrorCode::InvalidFieldValue, "values must be a JSON array")
    })?;

    let mut values = Vec::with_capacity(array.len());
    for (idx, entry) in array.iter().enumerate() {
        let number = entry.as_f64().ok_or_else(|| {
            TileError::new(
                TileErrorCode::InvalidFieldValue,
                format!("values[{idx}] is not a number: {entry}"),
            )
        })?;
        values.push(number);
    }
    Ok(values)
}

// ── Enum parsers ──────────────────────────────────────────────────────────────

fn parse_mesh_kind(name: &str) -> Result<MeshKind, TileError> {
    match name.to_lowercase().as_str() {
        "jis_x0410" => Ok(MeshKind::JisX0410),
        "xyz" => Ok(MeshKind::Xyz),
        _ => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("unknown mesh_kind {name:?} — expected jis_x0410|xyz"),
        )),
    }
}

fn parse_dtype(name: &str) -> Result<DType, TileError> {
    match name.to_lowercase().as_str() {
        "uint8" => Ok(DType::Uint8),
        "int8" => Ok(DType::Int8),
        "uint16" => Ok(DType::Uint16),
        "int16" => Ok(DType::Int16),
        "uint32" => Ok(DType::Uint32),
        "int32" => Ok(DType::Int32),
        "float32" => Ok(DType::Float32),
        "float64" => Ok(DType::Float64),
        _ => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!(
                "unknown dtype {name:?} — expected uint8|int8|uint16|int16|uint32|int32|float32|float64"
            ),
        )),
    }
}

fn parse_endianness(name: &str) -> Result<Endianness, TileError> {
    match name.to_lowercase().as_str() {
        "little" => Ok(Endianness::Little),
        "big" => Ok(Endianness::Big),
        _ => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("unknown endianness {name:?} — expected little|big"),
        )),
    }
}

fn parse_compression(name: &str) -> Result<CompressionMode, TileError> {
    match name.to_lowercase().as_str() {
        "none" => Ok(CompressionMode::None),
        "deflate_raw" => Ok(CompressionMode::DeflateRaw),
        _ => Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("unknown compression {name:?} — expected none|deflate_raw"),
        )),
    }
}
