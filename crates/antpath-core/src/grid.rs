//! The [`Grid`] type: an immutable, rectangular collection of [`Node`]s.
//!
//! Nodes are stored row-major: the node at `(x, y)` lives at index
//! `x + y * dim_x`. Once built, a grid exposes no way to change its nodes,
//! so it can be shared by plain `&Grid` borrows between any number of
//! searches and threads.

use thiserror::Error;

use crate::geom::{self, TilePos, WorldPos};
use crate::node::{Node, NodeInit};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a grid cannot be built from the supplied configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Width, height or tile size is zero.
    #[error("grid dimensions must be non-zero (got {dim_x}x{dim_y}, tile size {tile_dim})")]
    ZeroDimension { dim_x: u32, dim_y: u32, tile_dim: u32 },
    /// `dim_x * dim_y` does not fit in memory indices.
    #[error("grid of {dim_x}x{dim_y} nodes is too large")]
    TooLarge { dim_x: u32, dim_y: u32 },
    /// The initialisation data has the wrong number of columns.
    #[error("grid node data has {found} columns, expected {expected}")]
    ColumnCount { expected: u32, found: usize },
    /// One column of the initialisation data has the wrong number of rows.
    #[error("grid node data column {column} has {found} rows, expected {expected}")]
    RowCount {
        column: u32,
        expected: u32,
        found: usize,
    },
    /// Flat (row-major) initialisation data has the wrong length.
    #[error("grid node data has {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
    /// A travel cost modifier is negative, infinite or NaN.
    #[error("node ({x}, {y}) has invalid travel cost modifier {value}")]
    InvalidTravelCost { x: u32, y: u32, value: f32 },
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// An immutable 2D grid of [`Node`]s with tile/world coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridData", into = "GridData")
)]
pub struct Grid {
    dim_x: u32,
    dim_y: u32,
    tile_dim: u32,
    nodes: Vec<Node>,
}

impl Grid {
    /// Build a grid from column-major initialisation data: `init[x][y]` is
    /// the record for the cell at `(x, y)`.
    ///
    /// Fails, without building anything, if a dimension is zero, if `init`
    /// does not have exactly `dim_x` columns of `dim_y` records each, or if
    /// any travel cost modifier is invalid.
    pub fn new<C: AsRef<[NodeInit]>>(
        dim_x: u32,
        dim_y: u32,
        tile_dim: u32,
        init: &[C],
    ) -> Result<Self, GridError> {
        check_dimensions(dim_x, dim_y, tile_dim)?;
        if init.len() != dim_x as usize {
            return Err(GridError::ColumnCount {
                expected: dim_x,
                found: init.len(),
            });
        }
        for (column, rows) in (0..dim_x).zip(init) {
            let found = rows.as_ref().len();
            if found != dim_y as usize {
                return Err(GridError::RowCount {
                    column,
                    expected: dim_y,
                    found,
                });
            }
        }
        Self::from_fn(dim_x, dim_y, tile_dim, |x, y| {
            init[x as usize].as_ref()[y as usize]
        })
    }

    /// Build a grid by asking `f` for the record of every cell.
    ///
    /// Cells are visited row by row (y outer, x inner).
    pub fn from_fn<F>(dim_x: u32, dim_y: u32, tile_dim: u32, mut f: F) -> Result<Self, GridError>
    where
        F: FnMut(u32, u32) -> NodeInit,
    {
        let len = check_dimensions(dim_x, dim_y, tile_dim)?;
        let mut nodes = Vec::with_capacity(len);
        for y in 0..dim_y {
            for x in 0..dim_x {
                let init = f(x, y);
                let value = init.travel_cost_modifier;
                if !value.is_finite() || value < 0.0 {
                    return Err(GridError::InvalidTravelCost { x, y, value });
                }
                nodes.push(Node::new(TilePos::new(x, y), &init));
            }
        }
        Ok(Self {
            dim_x,
            dim_y,
            tile_dim,
            nodes,
        })
    }

    /// Width in tiles.
    #[inline]
    pub fn dim_x(&self) -> u32 {
        self.dim_x
    }

    /// Height in tiles.
    #[inline]
    pub fn dim_y(&self) -> u32 {
        self.dim_y
    }

    /// Side length of one square tile in world units.
    #[inline]
    pub fn tile_dim(&self) -> u32 {
        self.tile_dim
    }

    /// Number of nodes (`dim_x * dim_y`).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: construction rejects zero dimensions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `(x, y)`, or `None` if the coordinate is off the grid.
    #[inline]
    pub fn node_at(&self, x: u32, y: u32) -> Option<&Node> {
        self.index(x, y).map(|i| &self.nodes[i])
    }

    /// The node at `pos`, or `None` if it is off the grid.
    #[inline]
    pub fn node_at_pos(&self, pos: TilePos) -> Option<&Node> {
        self.node_at(pos.x, pos.y)
    }

    /// The node `(dx, dy)` away from `node`, or `None` if that cell is off
    /// the grid, including steps below coordinate zero.
    #[inline]
    pub fn node_at_offset(&self, node: &Node, dx: i32, dy: i32) -> Option<&Node> {
        node.pos().offset(dx, dy).and_then(|p| self.node_at_pos(p))
    }

    /// The node at flat index `index`.
    #[inline]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Flat index of `(x, y)`, or `None` if off the grid.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.dim_x && y < self.dim_y {
            Some(x as usize + y as usize * self.dim_x as usize)
        } else {
            None
        }
    }

    /// Flat index of `node` if it is one of this grid's nodes.
    ///
    /// Membership is by identity: an equal node belonging to another grid
    /// is not a member.
    pub fn index_of(&self, node: &Node) -> Option<usize> {
        let i = self.index(node.x(), node.y())?;
        std::ptr::eq(&self.nodes[i], node).then_some(i)
    }

    /// Whether `node` is one of this grid's nodes (by identity).
    #[inline]
    pub fn contains(&self, node: &Node) -> bool {
        self.index_of(node).is_some()
    }

    /// The node whose tile encloses the world-space point, or `None` if
    /// the point lies outside the grid.
    pub fn world_to_tile(&self, world_x: f32, world_y: f32) -> Option<&Node> {
        let p = geom::world_to_tile_coords(
            self.dim_x,
            self.dim_y,
            self.tile_dim,
            WorldPos::new(world_x, world_y),
        )?;
        self.node_at_pos(p)
    }

    /// Row-major iterator over every node.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_dimensions(dim_x: u32, dim_y: u32, tile_dim: u32) -> Result<usize, GridError> {
    if dim_x == 0 || dim_y == 0 || tile_dim == 0 {
        return Err(GridError::ZeroDimension {
            dim_x,
            dim_y,
            tile_dim,
        });
    }
    (dim_x as usize)
        .checked_mul(dim_y as usize)
        .ok_or(GridError::TooLarge { dim_x, dim_y })
}

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// Flat serialized form of a [`Grid`]; `nodes` is row-major.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridData {
    dim_x: u32,
    dim_y: u32,
    tile_dim: u32,
    nodes: Vec<NodeInit>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = check_dimensions(data.dim_x, data.dim_y, data.tile_dim)?;
        if data.nodes.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: data.nodes.len(),
            });
        }
        let dim_x = data.dim_x as usize;
        Grid::from_fn(data.dim_x, data.dim_y, data.tile_dim, |x, y| {
            data.nodes[x as usize + y as usize * dim_x]
        })
    }
}

#[cfg(feature = "serde")]
impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        GridData {
            dim_x: grid.dim_x,
            dim_y: grid.dim_y,
            tile_dim: grid.tile_dim,
            nodes: grid.nodes.iter().map(Node::to_init).collect(),
        }
    }
}
