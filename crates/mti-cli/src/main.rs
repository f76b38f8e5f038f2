/// MTI command-line tool — inspect, decode, and encode MTI1 mesh data
/// tile files.
///
/// # Command overview
///
/// ```text
/// mti <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print the parsed header of a tile file, one field per line
///   decode     Decode a tile file and write its samples as CSV
///   encode     Encode a tile file from metadata and a JSON value array
///   help       Print help information
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                   |
/// |------|-------------------------------------------|
/// | 0    | Success                                   |
/// | 1    | Error (I/O failure, invalid tile, etc.)   |
///
/// Codec failures are printed as `error: <CODE>: <message>` using the
/// closed error-code set of the format; all error output goes to stderr
/// so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use mti_types::TileError;

mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The MTI (Mesh Tile Format v1) command-line tool.
#[derive(Parser)]
#[command(name = "mti", version, about = "Mesh Tile Format (MTI1) CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed header of a tile file, one `Label: value` per line.
    Inspect(InspectArgs),
    /// Decode a tile file and write its samples as CSV.
    Decode(DecodeArgs),
    /// Encode a tile file from metadata fields and a JSON value array.
    Encode(EncodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `mti inspect`.
///
/// Parses and validates the fixed header only — the payload is neither
/// decompressed nor checksummed, so inspection works even on tiles whose
/// payload bytes are damaged.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the tile file to inspect.
    pub file: PathBuf,
}

/// Arguments for `mti decode`.
///
/// Runs the full decode pipeline (header, decompression, checksums,
/// sample decoding) and writes one CSV row per cell: the first row is
/// `x,y,b0,…,b{bands-1}`, then `col,row,v0,…` iterating columns within
/// rows.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Path to the tile file to decode.
    pub file: PathBuf,

    /// Write the CSV to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `mti encode`.
///
/// Tile metadata can come from a JSON file (`--metadata`) with any field
/// overridden by its flag; sample values come from an inline JSON array
/// (`--values`) or a file containing one (`--values-file`).
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Field         │ Values                                           │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ tile-id       │ unsigned integer or decimal-digit string         │
/// │ mesh-kind     │ jis_x0410 | xyz                                  │
/// │ dtype         │ uint8|int8|uint16|int16|uint32|int32|            │
/// │               │ float32|float64                                  │
/// │ endianness    │ little (default) | big                           │
/// │ compression   │ none (default) | deflate_raw                     │
/// │ rows, cols    │ 1 ..= 4294967295                                 │
/// │ bands         │ 1 ..= 255                                        │
/// │ no-data       │ number | null (default null)                     │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Output tile file path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON file providing default metadata fields.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Inline JSON array of sample values, row-major, band innermost.
    #[arg(long)]
    pub values: Option<String>,

    /// File containing a JSON array of sample values.
    #[arg(long)]
    pub values_file: Option<PathBuf>,

    /// Tile identity: unsigned integer or decimal-digit string.
    #[arg(long)]
    pub tile_id: Option<String>,

    /// Tile identity scheme: `jis_x0410` or `xyz`.
    #[arg(long)]
    pub mesh_kind: Option<String>,

    /// Grid rows.
    #[arg(long)]
    pub rows: Option<u64>,

    /// Grid columns.
    #[arg(long)]
    pub cols: Option<u64>,

    /// Bands per cell.
    #[arg(long)]
    pub bands: Option<u64>,

    /// Sample dtype name.
    #[arg(long)]
    pub dtype: Option<String>,

    /// Sample byte order: `little` or `big`.
    #[arg(long)]
    pub endianness: Option<String>,

    /// Payload compression: `none` or `deflate_raw`.
    #[arg(long)]
    pub compression: Option<String>,

    /// No-data sentinel: a number, or `null` for none.
    #[arg(long)]
    pub no_data: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
    };

    if let Err(err) = result {
        // Codec errors carry their own CODE prefix; everything else
        // (I/O, JSON parsing) prints with its context chain.
        match err.downcast_ref::<TileError>() {
            Some(tile_err) => eprintln!("error: {tile_err}"),
            None => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}
