use antpath_core::{Grid, Node};

/// Offsets in expansion order: left, right, up, down, then the diagonals
/// up-left, up-right, down-left, down-right.
const DIRS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// The grid cells adjacent to a node, in a fixed order.
///
/// A diagonal cell is only listed when both orthogonal cells sharing its
/// corner exist and are passable, so a path never squeezes between two
/// blocked cells. Cells off the grid are skipped. Impassable cells are still
/// listed; filtering them is up to the caller.
pub struct Neighbors<'g> {
    slots: [Option<&'g Node>; 8],
    next: usize,
}

impl<'g> Neighbors<'g> {
    /// Neighbours of `node` on `grid`.
    pub fn of(grid: &'g Grid, node: &Node) -> Self {
        let mut slots = [None; 8];
        for (slot, &(dx, dy)) in slots.iter_mut().zip(DIRS.iter()).take(4) {
            *slot = grid.node_at_offset(node, dx, dy);
        }
        let open = |i: usize| slots[i].is_some_and(Node::is_passable);
        let [left, right, up, down] = [open(0), open(1), open(2), open(3)];
        let corners = [left && up, right && up, left && down, right && down];
        for (i, allowed) in corners.into_iter().enumerate() {
            if allowed {
                let (dx, dy) = DIRS[4 + i];
                slots[4 + i] = grid.node_at_offset(node, dx, dy);
            }
        }
        Self { slots, next: 0 }
    }
}

impl<'g> Iterator for Neighbors<'g> {
    type Item = &'g Node;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.slots.len() {
            let slot = self.slots[self.next];
            self.next += 1;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }
}
