//! The per-cell [`Node`] record and its construction input [`NodeInit`].

use crate::geom::{TilePos, WorldPos};

/// Construction data for one grid cell, supplied by a map generator.
///
/// The grid assigns the tile coordinates itself from the record's position
/// in the initialisation data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeInit {
    /// Whether searches may pass through the cell.
    pub passable: bool,
    /// Cost of stepping onto the cell. Must be finite and `>= 0`.
    pub travel_cost_modifier: f32,
    pub world_x: f32,
    pub world_y: f32,
}

impl Default for NodeInit {
    fn default() -> Self {
        Self {
            passable: true,
            travel_cost_modifier: 1.0,
            world_x: 0.0,
            world_y: 0.0,
        }
    }
}

impl NodeInit {
    /// A passable cell with the given cost modifier.
    pub fn open(travel_cost_modifier: f32) -> Self {
        Self {
            travel_cost_modifier,
            ..Self::default()
        }
    }

    /// An impassable cell.
    pub fn blocked() -> Self {
        Self {
            passable: false,
            ..Self::default()
        }
    }

    /// Set the world coordinates.
    pub fn at_world(mut self, world: WorldPos) -> Self {
        self.world_x = world.x;
        self.world_y = world.y;
        self
    }
}

/// One immutable grid cell.
///
/// Nodes are created by [`Grid`](crate::Grid) and only ever handed out by
/// reference; none of their fields can change after construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pos: TilePos,
    world: WorldPos,
    passable: bool,
    travel_cost_modifier: f32,
}

impl Node {
    pub(crate) fn new(pos: TilePos, init: &NodeInit) -> Self {
        Self {
            pos,
            world: WorldPos::new(init.world_x, init.world_y),
            passable: init.passable,
            travel_cost_modifier: init.travel_cost_modifier,
        }
    }

    /// Tile column.
    #[inline]
    pub fn x(&self) -> u32 {
        self.pos.x
    }

    /// Tile row.
    #[inline]
    pub fn y(&self) -> u32 {
        self.pos.y
    }

    #[inline]
    pub fn pos(&self) -> TilePos {
        self.pos
    }

    #[inline]
    pub fn world_x(&self) -> f32 {
        self.world.x
    }

    #[inline]
    pub fn world_y(&self) -> f32 {
        self.world.y
    }

    #[inline]
    pub fn world(&self) -> WorldPos {
        self.world
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Cost charged for stepping onto this node from any neighbour.
    #[inline]
    pub fn travel_cost_modifier(&self) -> f32 {
        self.travel_cost_modifier
    }

    /// The construction record this node was built from.
    pub fn to_init(&self) -> NodeInit {
        NodeInit {
            passable: self.passable,
            travel_cost_modifier: self.travel_cost_modifier,
            world_x: self.world.x,
            world_y: self.world.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_init_is_open_unit_cost() {
        let init = NodeInit::default();
        assert!(init.passable);
        assert_eq!(init.travel_cost_modifier, 1.0);
        assert!(!NodeInit::blocked().passable);
        assert_eq!(NodeInit::open(2.5).travel_cost_modifier, 2.5);
    }

    #[test]
    fn node_copies_init() {
        let init = NodeInit::open(3.0).at_world(WorldPos::new(-1.5, 0.5));
        let node = Node::new(TilePos::new(2, 7), &init);
        assert_eq!((node.x(), node.y()), (2, 7));
        assert_eq!(node.world_x(), -1.5);
        assert_eq!(node.world_y(), 0.5);
        assert!(node.is_passable());
        assert_eq!(node.travel_cost_modifier(), 3.0);
        assert_eq!(node.to_init(), init);
    }
}
