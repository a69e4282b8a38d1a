//! Geometry primitives: [`TilePos`] and [`WorldPos`].
//!
//! Tile coordinates are unsigned with X growing right and Y growing down.
//! World coordinates are centred on the grid: the origin sits in the middle
//! of the grid and world Y grows up, so row 0 is the top edge.

use std::fmt;

// ---------------------------------------------------------------------------
// TilePos
// ---------------------------------------------------------------------------

/// An unsigned grid coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new tile position.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Return the position shifted by (dx, dy), or `None` if either axis
    /// would leave the `u32` domain.
    ///
    /// Stepping left of column 0 is therefore reported as absent rather
    /// than wrapping around.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };
        Some(Self { x, y })
    }

    /// Per-axis absolute distance to `other`.
    #[inline]
    pub const fn abs_diff(self, other: Self) -> (u32, u32) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }
}

impl PartialOrd for TilePos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TilePos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for TilePos {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// WorldPos
// ---------------------------------------------------------------------------

/// A point in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    /// Create a new world position.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// World-space centre of tile `pos` on a `dim_x` × `dim_y` grid of square
/// tiles `tile_dim` wide.
///
/// Map generators use this to fill in [`NodeInit`](crate::NodeInit) world
/// coordinates; [`Grid::world_to_tile`](crate::Grid::world_to_tile) is its
/// inverse.
pub fn tile_center(dim_x: u32, dim_y: u32, tile_dim: u32, pos: TilePos) -> WorldPos {
    let tile = tile_dim as f32;
    WorldPos {
        x: dim_x as f32 * -0.5 * tile + pos.x as f32 * tile + tile * 0.5,
        y: dim_y as f32 * 0.5 * tile - pos.y as f32 * tile - tile * 0.5,
    }
}

/// Tile column/row enclosing `world`, before any bounds check against the
/// grid's dimensions.
///
/// Returns `None` when the point lies left of or above the grid (negative
/// column or row), when `tile_dim` is zero, or when a coordinate is not
/// finite.
pub(crate) fn world_to_tile_coords(
    dim_x: u32,
    dim_y: u32,
    tile_dim: u32,
    world: WorldPos,
) -> Option<TilePos> {
    if tile_dim == 0 {
        return None;
    }
    let tile = tile_dim as f32;
    let col = ((world.x + dim_x as f32 * tile * 0.5) / tile).floor();
    let row = ((-world.y + dim_y as f32 * tile * 0.5) / tile).floor();
    Some(TilePos::new(to_u32(col)?, to_u32(row)?))
}

#[inline]
fn to_u32(v: f32) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v <= u32::MAX as f32 {
        Some(v as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_unsigned() {
        let p = TilePos::new(0, 3);
        assert_eq!(p.offset(1, -1), Some(TilePos::new(1, 2)));
        assert_eq!(p.offset(-1, 0), None);
        assert_eq!(TilePos::new(2, 0).offset(0, -1), None);
        assert_eq!(TilePos::new(u32::MAX, 0).offset(1, 0), None);
        assert_eq!(TilePos::ZERO.offset(-1, -1), None);
        assert_eq!(TilePos::ZERO.offset(1, 1), Some(TilePos::new(1, 1)));
    }

    #[test]
    fn abs_diff_per_axis() {
        let a = TilePos::new(1, 5);
        let b = TilePos::new(4, 2);
        assert_eq!(a.abs_diff(b), (3, 3));
        assert_eq!(b.abs_diff(a), (3, 3));
    }

    #[test]
    fn ordering_is_row_major() {
        let mut pts = vec![TilePos::new(2, 1), TilePos::new(0, 1), TilePos::new(3, 0)];
        pts.sort();
        assert_eq!(
            pts,
            vec![TilePos::new(3, 0), TilePos::new(0, 1), TilePos::new(2, 1)]
        );
    }

    #[test]
    fn tile_center_is_grid_centred() {
        // 4x4 grid, unit tiles: corners sit at +-1.5.
        assert_eq!(tile_center(4, 4, 1, TilePos::new(0, 0)), WorldPos::new(-1.5, 1.5));
        assert_eq!(tile_center(4, 4, 1, TilePos::new(3, 3)), WorldPos::new(1.5, -1.5));
        // Odd dimensions with wide tiles put the middle tile on the origin.
        assert_eq!(tile_center(5, 5, 3, TilePos::new(2, 2)), WorldPos::new(0.0, 0.0));
    }

    #[test]
    fn world_to_tile_inverts_tile_center() {
        for (dx, dy, tile) in [(4, 4, 1), (5, 3, 3), (7, 2, 2)] {
            for y in 0..dy {
                for x in 0..dx {
                    let p = TilePos::new(x, y);
                    let w = tile_center(dx, dy, tile, p);
                    assert_eq!(world_to_tile_coords(dx, dy, tile, w), Some(p));
                }
            }
        }
    }

    #[test]
    fn world_to_tile_rejects_negative_and_nan() {
        // Left of the grid.
        assert_eq!(world_to_tile_coords(4, 4, 1, WorldPos::new(-2.5, 0.0)), None);
        // Above the grid.
        assert_eq!(world_to_tile_coords(4, 4, 1, WorldPos::new(0.0, 2.5)), None);
        assert_eq!(world_to_tile_coords(4, 4, 1, WorldPos::new(f32::NAN, 0.0)), None);
        assert_eq!(world_to_tile_coords(4, 4, 0, WorldPos::new(0.0, 0.0)), None);
    }

    #[test]
    fn world_to_tile_floors_inside_tile() {
        // Just inside the left edge of column 0 and the top edge of row 0.
        let p = world_to_tile_coords(4, 4, 2, WorldPos::new(-3.99, 3.99));
        assert_eq!(p, Some(TilePos::new(0, 0)));
        // Right/bottom halves of the grid.
        let p = world_to_tile_coords(4, 4, 2, WorldPos::new(0.01, -0.01));
        assert_eq!(p, Some(TilePos::new(2, 2)));
    }
}
