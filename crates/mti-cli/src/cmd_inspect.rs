/// Implementation of `mti inspect`.
///
/// Reads a tile file, parses and validates the fixed header, and prints
/// one `Label: value` line per field plus the derived layout values.
/// CRCs print as 8-digit lowercase hex. XYZ tiles additionally get their
/// unpacked zoom and coordinates.
///
/// # Output format
///
/// ```text
/// Magic: MTI1
/// Format Major: 1
/// Tile ID: 1001
/// Mesh Kind: JIS_X0410
/// DType: uint16
/// Endianness: little
/// Compression: none
/// Rows: 2
/// Cols: 2
/// Bands: 1
/// No Data: (absent)
/// Uncompressed Payload Bytes: 8
/// Stored Payload Bytes: 8
/// Payload CRC32: 6cbd20ff
/// Header CRC32: 0e9b9df6
/// Header Length: 58
/// Payload Offset: 58
/// Payload Length: 8
/// ```
use std::fs;

use anyhow::{Context, Result};
use mti_decoder::inspect_tile;
use mti_types::MeshKind;
use mti_wire::decode_xyz;

use crate::InspectArgs;

/// Run the `mti inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its header fails any
/// of the fixed validation steps (bad magic, version, checksum, field
/// values, declared lengths).
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let inspection = inspect_tile(&bytes)
        .with_context(|| format!("failed to inspect {}", args.file.display()))?;
    let header = &inspection.header;

    println!("Magic: MTI1");
    println!("Format Major: {}", header.format_major);
    println!("Tile ID: {}", header.tile_id);
    println!("Mesh Kind: {}", header.mesh_kind.name());
    if header.mesh_kind == MeshKind::Xyz {
        // already validated during header parse
        if let Ok(xyz) = decode_xyz(header.tile_id) {
            println!("XYZ Zoom: {}", xyz.zoom);
            println!("XYZ X: {}", xyz.x);
            println!("XYZ Y: {}", xyz.y);
        }
    }
    println!("DType: {}", header.dtype.name());
    println!("Endianness: {}", header.endianness.name());
    println!("Compression: {}", header.compression.name());
    println!("Rows: {}", header.dimensions.rows);
    println!("Cols: {}", header.dimensions.cols);
    println!("Bands: {}", header.dimensions.bands);
    match header.no_data {
        Some(value) => println!("No Data: {value}"),
        None => println!("No Data: (absent)"),
    }
    println!("Uncompressed Payload Bytes: {}", header.payload_uncompressed_bytes);
    println!("Stored Payload Bytes: {}", header.payload_compressed_bytes);
    println!("Payload CRC32: {:08x}", header.payload_crc32);
    println!("Header CRC32: {:08x}", header.header_crc32);
    println!("Header Length: {}", inspection.header_length);
    println!("Payload Offset: {}", inspection.payload_offset);
    println!("Payload Length: {}", inspection.payload_length);

    Ok(())
}
