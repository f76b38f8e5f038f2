use mti_types::{MeshKind, Result, TileError, TileErrorCode};

/// Bits of the tile id reserved for the zoom level (the top of the u64).
pub const ZOOM_BITS: u32 = 6;

/// Bits of the tile id holding the quadkey integer (the low 58 bits).
pub const QUADKEY_BITS: u32 = 58;

/// Highest zoom level an XYZ tile id can carry: `2 * 29 = 58` quadkey
/// bits exactly fill the low field.
pub const MAX_ZOOM: u8 = 29;

const QUADKEY_MASK: u64 = (1_u64 << QUADKEY_BITS) - 1;

/// An unpacked XYZ tile identity.
///
/// `quadkey` is the base-4 interpretation of the tile's quadkey string as
/// an integer: one 2-bit digit `(x_bit | y_bit << 1)` per zoom level,
/// most significant level first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XyzTileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub quadkey: u64,
}

/// Pack `(zoom, x, y)` into a 64-bit XYZ tile id.
///
/// The resulting id satisfies `tile_id >> 58 == zoom` and has every
/// quadkey bit above `2 * zoom` clear.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when `zoom > 29` or either coordinate is
/// outside `[0, 2^zoom)`.
pub fn encode_xyz(zoom: u8, x: u32, y: u32) -> Result<u64> {
    if zoom > MAX_ZOOM {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("XYZ zoom must be <= {MAX_ZOOM}, got {zoom}"),
        ));
    }

    let extent = 1_u64 << zoom;
    if u64::from(x) >= extent || u64::from(y) >= extent {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("XYZ coordinates ({x}, {y}) exceed 2^{zoom} - 1"),
        ));
    }

    let mut quadkey = 0_u64;
    for level in (0..zoom).rev() {
        let x_bit = u64::from((x >> level) & 1);
        let y_bit = u64::from((y >> level) & 1);
        quadkey = (quadkey << 2) | (y_bit << 1) | x_bit;
    }

    Ok((u64::from(zoom) << QUADKEY_BITS) | quadkey)
}

/// Unpack a 64-bit XYZ tile id into `(zoom, x, y)` plus the quadkey
/// integer.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when the zoom field exceeds 29 or any quadkey
/// bit above `2 * zoom` is set.
pub fn decode_xyz(tile_id: u64) -> Result<XyzTileId> {
    assert_valid_xyz(tile_id)?;

    let zoom = (tile_id >> QUADKEY_BITS) as u8;
    let quadkey = tile_id & QUADKEY_MASK;

    let mut x = 0_u32;
    let mut y = 0_u32;
    for level in (0..zoom).rev() {
        let digit = (quadkey >> (2 * u32::from(level))) & 0b11;
        x = (x << 1) | (digit as u32 & 1);
        y = (y << 1) | ((digit as u32 >> 1) & 1);
    }

    Ok(XyzTileId { zoom, x, y, quadkey })
}

/// Validate an XYZ tile id without unpacking the coordinates.
///
/// Returns the id unchanged on success, so it can be used inline while
/// building headers.
///
/// # Errors
///
/// `INVALID_FIELD_VALUE` when the zoom field exceeds 29 or a quadkey bit
/// above `2 * zoom` is set.
pub fn assert_valid_xyz(tile_id: u64) -> Result<u64> {
    let zoom = tile_id >> QUADKEY_BITS;
    if zoom > u64::from(MAX_ZOOM) {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            format!("XYZ tile_id zoom must be <= {MAX_ZOOM}, got {zoom}"),
        ));
    }

    let quadkey = tile_id & QUADKEY_MASK;
    let used_bits = 2 * (zoom as u32);
    if used_bits < QUADKEY_BITS && (quadkey >> used_bits) != 0 {
        return Err(TileError::new(
            TileErrorCode::InvalidFieldValue,
            "XYZ tile_id quadkey_integer must be < 4^zoom",
        ));
    }

    Ok(tile_id)
}

/// Apply the structural check appropriate for `mesh_kind`.
///
/// JIS X0410 mesh codes are opaque u64 values with no structure to
/// verify; XYZ ids go through [`assert_valid_xyz`].
pub fn validate_tile_id(tile_id: u64, mesh_kind: MeshKind) -> Result<()> {
    match mesh_kind {
        MeshKind::JisX0410 => Ok(()),
        MeshKind::Xyz => assert_valid_xyz(tile_id).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_interleaves_digits() {
        // x=5 (101), y=2 (010) at zoom 3 → digits 1,2,1 → base-4 value 25
        let id = encode_xyz(3, 5, 2).unwrap();
        assert_eq!(id, (3_u64 << 58) | 25);
    }

    #[test]
    fn decode_recovers_coordinates() {
        let decoded = decode_xyz((3_u64 << 58) | 25).unwrap();
        assert_eq!(
            decoded,
            XyzTileId { zoom: 3, x: 5, y: 2, quadkey: 25 }
        );
    }

    #[test]
    fn zoom_zero_is_the_single_root_tile() {
        assert_eq!(encode_xyz(0, 0, 0).unwrap(), 0);
        let decoded = decode_xyz(0).unwrap();
        assert_eq!(decoded, XyzTileId { zoom: 0, x: 0, y: 0, quadkey: 0 });
    }

    #[test]
    fn max_zoom_corner_fills_the_quadkey_field() {
        let max_coord = (1_u32 << 29) - 1;
        let id = encode_xyz(MAX_ZOOM, max_coord, max_coord).unwrap();
        assert_eq!(id >> 58, 29);
        assert_eq!(id & ((1_u64 << 58) - 1), (1_u64 << 58) - 1);

        let decoded = decode_xyz(id).unwrap();
        assert_eq!((decoded.zoom, decoded.x, decoded.y), (MAX_ZOOM, max_coord, max_coord));
    }

    #[test]
    fn roundtrip_across_zoom_levels() {
        for zoom in 0..=MAX_ZOOM {
            let extent = 1_u64 << zoom;
            // corners plus an interior point
            let coords = [
                (0, 0),
                ((extent - 1) as u32, 0),
                (0, (extent - 1) as u32),
                ((extent - 1) as u32, (extent - 1) as u32),
                ((extent / 2) as u32, (extent / 3) as u32),
            ];
            for (x, y) in coords {
                let id = encode_xyz(zoom, x, y).unwrap();
                let decoded = decode_xyz(id).unwrap();
                assert_eq!((decoded.zoom, decoded.x, decoded.y), (zoom, x, y), "zoom {zoom}");
                assert!(u128::from(decoded.quadkey) < 1_u128 << (2 * u32::from(zoom)));
            }
        }
    }

    #[test]
    fn zoom_out_of_range_rejected() {
        let err = encode_xyz(30, 0, 0).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);

        let err = assert_valid_xyz(30_u64 << 58).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }

    #[test]
    fn coordinates_out_of_extent_rejected() {
        let err = encode_xyz(3, 8, 0).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
        let err = encode_xyz(0, 0, 1).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }

    #[test]
    fn stray_quadkey_bits_rejected() {
        // zoom=1 uses 2 quadkey bits; bit 4 set is structurally invalid
        let err = assert_valid_xyz((1_u64 << 58) | 16).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);

        let err = decode_xyz((1_u64 << 58) | 16).unwrap_err();
        assert_eq!(err.code, TileErrorCode::InvalidFieldValue);
    }

    #[test]
    fn jis_ids_pass_through_unchecked() {
        assert!(validate_tile_id(u64::MAX, MeshKind::JisX0410).is_ok());
        assert!(validate_tile_id(5_339_452_611, MeshKind::JisX0410).is_ok());
    }
}
