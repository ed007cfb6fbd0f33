//! Tile descrambling for scrambled page images
//!
//! The content service ships every page image cut into a 4x4 grid of tiles
//! and rearranged by a fixed, publicly known permutation. This module
//! restores the original layout. The transform is pure: same bytes in, same
//! bytes out, which keeps it golden-image testable.

use image::{GenericImage, GenericImageView, RgbaImage};

/// Tiles per axis. Pages are cut into a `TILE_GRID` x `TILE_GRID` grid.
pub const TILE_GRID: u32 = 4;

/// The published scramble order: slot `i` of a scrambled image holds the
/// original tile `SHUFFLE_ORDER[i]`.
pub const SHUFFLE_ORDER: [usize; 16] = [0, 5, 15, 13, 3, 12, 9, 6, 11, 1, 4, 2, 14, 7, 8, 10];

/// Inverse of [`SHUFFLE_ORDER`], computed once at compile time.
/// `RESTORE_ORDER[dst]` is the scrambled slot whose tile belongs at `dst`.
const RESTORE_ORDER: [usize; 16] = invert(SHUFFLE_ORDER);

const fn invert(order: [usize; 16]) -> [usize; 16] {
    let mut restore = [0usize; 16];
    let mut i = 0;
    while i < 16 {
        restore[order[i]] = i;
        i += 1;
    }
    restore
}

/// Pixel origin of tile `idx` (row-major) for the given tile dimensions.
fn tile_origin(idx: usize, tile_w: u32, tile_h: u32) -> (u32, u32) {
    let col = (idx as u32) % TILE_GRID;
    let row = (idx as u32) / TILE_GRID;
    (col * tile_w, row * tile_h)
}

/// Restore the original tile layout of a scrambled page image.
///
/// Tile size is `floor(dim / 4)` per axis. When a dimension is not divisible
/// by 4 the remainder strip on the right/bottom edge belongs to no tile and
/// stays unwritten; that loss is the service's defined behavior, not an
/// error. Output dimensions always equal input dimensions. Tiles are copied
/// verbatim, so placement is bit-identical across runs.
#[must_use]
pub fn descramble(source: &RgbaImage) -> RgbaImage {
    descramble_with(source, &RESTORE_ORDER)
}

/// Descramble using an explicit restore mapping: the tile for destination
/// slot `dst` is taken from scrambled slot `restore[dst]`.
#[must_use]
pub fn descramble_with(source: &RgbaImage, restore: &[usize; 16]) -> RgbaImage {
    let (width, height) = source.dimensions();
    let tile_w = width / TILE_GRID;
    let tile_h = height / TILE_GRID;

    let mut out = RgbaImage::new(width, height);
    if tile_w == 0 || tile_h == 0 {
        return out;
    }

    for (dst, &src) in restore.iter().enumerate() {
        let (sx, sy) = tile_origin(src, tile_w, tile_h);
        let (dx, dy) = tile_origin(dst, tile_w, tile_h);
        let tile = source.view(sx, sy, tile_w, tile_h);
        out.copy_from(&*tile, dx, dy)
            .expect("tile rectangle fits inside an equally sized output");
    }

    out
}
