use super::types::{GridCell, PixelPosition};

/// Tiles are `1 << DEFAULT_TILE_SCALE` pixels wide (16 px).
pub const DEFAULT_TILE_SCALE: u32 = 4;

/// Largest accepted tile scale (65536 px tiles). Larger values are clamped.
pub const MAX_TILE_SCALE: u32 = 16;

/// Converts one screen coordinate to a tile index.
pub fn screen_to_tile(value: f64, tile_scale: u32) -> i32 {
    (value.floor() as i32) >> tile_scale.min(MAX_TILE_SCALE)
}

/// Tile currently under a pixel position.
pub fn location_of(position: &PixelPosition, tile_scale: u32) -> GridCell {
    GridCell::new(
        screen_to_tile(position.x, tile_scale),
        screen_to_tile(position.y, tile_scale),
    )
}

/// Centre pixel of a tile.
pub fn tile_center(cell: &GridCell, tile_scale: u32) -> PixelPosition {
    let size = f64::from(1u32 << tile_scale.min(MAX_TILE_SCALE));
    PixelPosition::new(
        f64::from(cell.col) * size + size / 2.0,
        f64::from(cell.row) * size + size / 2.0,
    )
}
