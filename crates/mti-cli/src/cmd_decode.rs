/// Implementation of `mti decode`.
///
/// Runs the full decode pipeline and projects the samples as CSV. The
/// projection is a pure function of the header dimensions and the
/// decoded values: the first row names the columns
/// (`x,y,b0,…,b{bands-1}`), then one row per cell, iterating `col`
/// within `row`, each carrying the cell coordinates and its band values.
///
/// ```text
/// x,y,b0
/// 0,0,1
/// 1,0,2
/// 0,1,3
/// 1,1,4
/// ```
///
/// No-data samples are printed as-is; mapping the sentinel to a null
/// marker is left to downstream consumers.
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use mti_decoder::{decode_tile, DecodedTile};

use crate::DecodeArgs;

/// Run the `mti decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any decode stage fails
/// (header validation, decompression, checksums, sample decoding), or
/// the output file cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let decoded = decode_tile(&bytes)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let csv = render_csv(&decoded);

    match &args.output {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => print!("{csv}"),
    }

    Ok(())
}

/// Render the decoded samples as CSV text, one line per cell.
fn render_csv(decoded: &DecodedTile) -> String {
    let dims = decoded.header.dimensions;
    let bands = usize::from(dims.bands);

    let mut out = String::new();
    out.push_str("x,y");
    for band in 0..bands {
        let _ = write!(out, ",b{band}");
    }
    out.push('\n');

    for row in 0..dims.rows as usize {
        for col in 0..dims.cols as usize {
            let _ = write!(out, "{col},{row}");
            let cell_start = (row * dims.cols as usize + col) * bands;
            for band in 0..bands {
                let _ = write!(out, ",{}", decoded.values[cell_start + band]);
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mti_encoder::{encode_tile, encode_values, TileEncodeInput};
    use mti_types::{CompressionMode, DType, Endianness, MeshKind, TileDimensions};

    fn decoded_grid(rows: u32, cols: u32, bands: u8, values: &[f64]) -> DecodedTile {
        let dims = TileDimensions { rows, cols, bands };
        let payload =
            encode_values(DType::Float64, Endianness::Little, values, values.len()).unwrap();
        let encoded = encode_tile(TileEncodeInput {
            tile_id: 1,
            mesh_kind: MeshKind::JisX0410,
            dtype: DType::Float64,
            endianness: Endianness::Little,
            compression: CompressionMode::None,
            dimensions: dims,
            no_data: None,
            payload: &payload,
        })
        .unwrap();
        decode_tile(&encoded.bytes).unwrap()
    }

    #[test]
    fn csv_iterates_col_within_row() {
        let decoded = decoded_grid(2, 2, 1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(render_csv(&decoded), "x,y,b0\n0,0,1\n1,0,2\n0,1,3\n1,1,4\n");
    }

    #[test]
    fn csv_expands_bands_per_cell() {
        let decoded = decoded_grid(1, 2, 2, &[1.0, 10.0, 2.0, 20.0]);
        assert_eq!(render_csv(&decoded), "x,y,b0,b1\n0,0,1,10\n1,0,2,20\n");
    }

    #[test]
    fn csv_keeps_fractional_values() {
        let decoded = decoded_grid(1, 1, 1, &[2.5]);
        assert_eq!(render_csv(&decoded), "x,y,b0\n0,0,2.5\n");
    }
}
