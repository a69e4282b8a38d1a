use std::cmp::Ordering;

use antpath_core::Node;

// ---------------------------------------------------------------------------
// Search nodes
// ---------------------------------------------------------------------------

/// Where a search node currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeState {
    /// Queued; `seq` is the insertion order of its live open-set entry.
    Open { seq: u64 },
    /// Expanded; never reconsidered.
    Closed,
    /// Discovered but not queued: freshly created, or the goal.
    Unqueued,
}

/// Per-search wrapper around a grid node.
#[derive(Clone, Debug)]
pub(crate) struct SearchNode<'g> {
    pub(crate) target: &'g Node,
    /// Arena id of the node this one was reached from.
    pub(crate) parent: Option<usize>,
    pub(crate) travel_cost: f32,
    pub(crate) heuristic_cost: f32,
    pub(crate) state: NodeState,
}

impl<'g> SearchNode<'g> {
    /// A parentless node with zero costs.
    pub(crate) fn new(target: &'g Node, state: NodeState) -> Self {
        Self {
            target,
            parent: None,
            travel_cost: 0.0,
            heuristic_cost: 0.0,
            state,
        }
    }

    #[inline]
    pub(crate) fn total_cost(&self) -> f32 {
        self.travel_cost + self.heuristic_cost
    }
}

/// Open-set entry ordered for `BinaryHeap` (a max-heap) so that the lowest
/// total cost pops first, and among equal costs the earliest insertion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
    pub(crate) id: usize,
    pub(crate) total: f32,
    pub(crate) seq: u64,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys.
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Default)]
struct Slot {
    generation: u32,
    id: usize,
}

/// Storage for one search's [`SearchNode`]s.
///
/// Nodes are addressed by their position in the arena; parents are stored
/// as arena ids, so the parent links form a tree without any shared
/// ownership. A dense per-grid-cell lookup maps grid indices to arena ids.
/// Resetting only bumps a generation counter, so the lookup table is reused
/// between searches on same-sized grids without being cleared.
pub(crate) struct Arena<'g> {
    nodes: Vec<SearchNode<'g>>,
    lookup: Vec<Slot>,
    generation: u32,
}

impl<'g> Arena<'g> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            lookup: Vec::new(),
            generation: 0,
        }
    }

    /// Forget every node and size the lookup for a grid of `grid_len`
    /// cells.
    pub(crate) fn reset(&mut self, grid_len: usize) {
        self.nodes.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 || self.lookup.len() != grid_len {
            // Stale slots could alias the new generation; start clean.
            self.lookup.clear();
            self.lookup.resize(grid_len, Slot::default());
            self.generation = 1;
        }
    }

    /// Arena id of the node wrapping grid cell `grid_index`, if any.
    #[inline]
    pub(crate) fn find(&self, grid_index: usize) -> Option<usize> {
        let slot = self.lookup.get(grid_index)?;
        (slot.generation == self.generation).then_some(slot.id)
    }

    /// Store `node` for grid cell `grid_index` and return its arena id.
    pub(crate) fn insert(&mut self, grid_index: usize, node: SearchNode<'g>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(node);
        if let Some(slot) = self.lookup.get_mut(grid_index) {
            *slot = Slot {
                generation: self.generation,
                id,
            };
        }
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: usize) -> &SearchNode<'g> {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: usize) -> &mut SearchNode<'g> {
        &mut self.nodes[id]
    }

    /// Number of nodes discovered so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Grid nodes from the root to `id`, following parent links.
    pub(crate) fn trace(&self, id: usize) -> Vec<&'g Node> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(i) = cur {
            let n = &self.nodes[i];
            path.push(n.target);
            cur = n.parent;
        }
        path.reverse();
        path
    }
}
