#![no_main]

use libfuzzer_sys::fuzz_target;
use mti_wire::{assert_valid_xyz, decode_xyz, encode_xyz};

// Fuzz target: XYZ tile-id validity and roundtrip coherence.
//
// For any u64 the validity check must agree with decode_xyz, and every
// id that decodes must re-encode to the identical bits.
fuzz_target!(|tile_id: u64| {
    let valid = assert_valid_xyz(tile_id).is_ok();
    match decode_xyz(tile_id) {
        Ok(xyz) => {
            assert!(valid);
            let reencoded = encode_xyz(xyz.zoom, xyz.x, xyz.y).unwrap();
            assert_eq!(reencoded, tile_id);
        }
        Err(_) => assert!(!valid),
    }
});
