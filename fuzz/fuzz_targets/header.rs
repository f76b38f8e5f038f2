#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: TileHeader::read_from with arbitrary bytes.
//
// Catches bugs in:
// - Magic / version / checksum validation order
// - Enum code and dimension validation
// - Tile-id structural checks
// - No-data padding enforcement
// - Declared-length handling (must never panic or over-allocate)
fuzz_target!(|data: &[u8]| {
    let _ = mti_wire::header::TileHeader::read_from(data);
});
