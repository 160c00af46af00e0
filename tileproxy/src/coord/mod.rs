//! Grid coordinate normalization
//!
//! Converts tile addresses from the host's internal scheme, whose counting
//! corner depends on the grid origin, into the (row, col) pair that upstream
//! tile protocols expect: rows counted from the top, columns from the left.

mod types;

pub use types::{CoordError, GridLink, GridOrigin, LevelExtent, TileAddress, TileIndex};

/// Converts an internal (x, y) address into an upstream row/column index.
///
/// | origin | col | row |
/// |---|---|---|
/// | bottom-left | x | maxy - y - 1 |
/// | top-left | x | y |
/// | bottom-right | maxx - x - 1 | maxy - y - 1 |
/// | top-right | maxx - x - 1 | y |
///
/// Only the axes that get mirrored are checked against the extent.
///
/// # Example
///
/// ```
/// use tileproxy::coord::{normalize, GridOrigin, LevelExtent};
///
/// let index = normalize(5, 2, GridOrigin::BottomLeft, LevelExtent::new(8, 8)).unwrap();
/// assert_eq!((index.row, index.col), (5, 5));
/// ```
#[inline]
pub fn normalize(
    x: u32,
    y: u32,
    origin: GridOrigin,
    extent: LevelExtent,
) -> Result<TileIndex, CoordError> {
    let out_of_extent = || CoordError::OutOfExtent {
        x,
        y,
        maxx: extent.maxx,
        maxy: extent.maxy,
    };

    let col = if origin.flips_cols() {
        mirror(x, extent.maxx).ok_or_else(out_of_extent)?
    } else {
        x
    };
    let row = if origin.flips_rows() {
        mirror(y, extent.maxy).ok_or_else(out_of_extent)?
    } else {
        y
    };

    Ok(TileIndex { row, col })
}

/// Inverse of [`normalize`]: recovers the internal (x, y) of an upstream index.
#[inline]
pub fn denormalize(
    index: TileIndex,
    origin: GridOrigin,
    extent: LevelExtent,
) -> Result<TileAddressXY, CoordError> {
    // Mirroring is an involution, so the forward mapping applied to
    // (col, row) gives back (x, y).
    let back = normalize(index.col, index.row, origin, extent)?;
    Ok(TileAddressXY {
        x: back.col,
        y: back.row,
    })
}

/// Plain (x, y) pair produced by [`denormalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddressXY {
    pub x: u32,
    pub y: u32,
}

/// Normalizes a tile address against a grid, looking up the level extent.
pub fn normalize_address(grid: &GridLink, tile: &TileAddress) -> Result<TileIndex, CoordError> {
    let extent = grid.extent(tile.z)?;
    normalize(tile.x, tile.y, grid.origin, extent)
}

#[inline]
fn mirror(value: u32, max: u32) -> Option<u32> {
    max.checked_sub(value)?.checked_sub(1)
}
