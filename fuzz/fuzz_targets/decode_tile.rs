#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: the full decode pipeline with arbitrary bytes.
//
// Exercises header parsing, payload slicing, raw-DEFLATE inflation of
// attacker-controlled streams, and checksum verification. Every input
// must produce either a DecodedTile or a TileError — never a panic.
fuzz_target!(|data: &[u8]| {
    let _ = mti_decoder::decode_tile(data);
});
