//! **antpath-core**: the static grid model searched by `antpath-search`.
//!
//! This crate provides the read-only data that path searches run over:
//! tile/world geometry helpers, the immutable per-cell [`Node`] record and
//! the [`Grid`] that owns every node. A grid never changes after
//! construction, so any number of searches may borrow it at once.

pub mod geom;
pub mod grid;
pub mod node;

pub use geom::{TilePos, WorldPos, tile_center};
pub use grid::{Grid, GridError};
pub use node::{Node, NodeInit};
