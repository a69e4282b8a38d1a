//! The time-sliced A* engine.

use std::collections::BinaryHeap;

use antpath_core::{Grid, Node};

use crate::arena::{Arena, NodeState, OpenEntry, SearchNode};
use crate::distance::{octile, step_cost};
use crate::error::SearchError;
use crate::neighbors::Neighbors;

/// Progress of a [`PathSearch`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// No search has been started.
    #[default]
    Idle,
    /// Started and still expanding nodes.
    InProgress,
    /// Complete; a path was found.
    Found,
    /// Complete; the end node is unreachable.
    NoPath,
}

impl SearchStatus {
    /// Whether the search has finished, with or without a path.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Found | Self::NoPath)
    }
}

/// The request currently being served.
#[derive(Clone, Copy)]
struct Request<'g> {
    grid: &'g Grid,
    start: &'g Node,
    end: &'g Node,
    start_index: usize,
    end_index: usize,
}

/// An A* search that can be advanced a few node expansions at a time.
///
/// Start a search with [`start_search`](Self::start_search), then call
/// [`advance`](Self::advance) once per tick with a small step budget (or
/// once with a budget of 0 to run to completion). The nodes expanded and
/// the resulting path do not depend on how the work is split across calls.
///
/// The open set is a binary heap keyed by total cost with an insertion
/// counter as tie-break, so equal-cost entries leave in the order they were
/// queued. Re-costing a queued node pushes a fresh entry and leaves the old
/// one behind to be skipped when popped.
///
/// Internal buffers are kept across restarts, so a reused engine stops
/// allocating once it has served a search of the same size.
pub struct PathSearch<'g> {
    request: Option<Request<'g>>,
    arena: Arena<'g>,
    open: BinaryHeap<OpenEntry>,
    open_len: usize,
    closed_len: usize,
    seq: u64,
    expanded: u64,
    path: Vec<&'g Node>,
    status: SearchStatus,
}

impl Default for PathSearch<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> PathSearch<'g> {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self {
            request: None,
            arena: Arena::new(),
            open: BinaryHeap::new(),
            open_len: 0,
            closed_len: 0,
            seq: 0,
            expanded: 0,
            path: Vec::new(),
            status: SearchStatus::Idle,
        }
    }

    /// Begin searching `grid` for a path from `start` to `end`.
    ///
    /// Discards everything left over from a previous search. Both nodes
    /// must be nodes of `grid`.
    pub fn start_search(
        &mut self,
        grid: &'g Grid,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError> {
        let foreign = |n: &Node| SearchError::ForeignNode { x: n.x(), y: n.y() };
        let start_index = grid.index_of(start).ok_or_else(|| foreign(start))?;
        let end_index = grid.index_of(end).ok_or_else(|| foreign(end))?;

        self.arena.reset(grid.len());
        self.open.clear();
        self.path.clear();
        self.seq = 0;
        self.expanded = 0;
        self.closed_len = 0;

        let seq = self.next_seq();
        let id = self
            .arena
            .insert(start_index, SearchNode::new(start, NodeState::Open { seq }));
        self.open.push(OpenEntry { id, total: 0.0, seq });
        self.open_len = 1;

        self.request = Some(Request {
            grid,
            start,
            end,
            start_index,
            end_index,
        });
        self.status = SearchStatus::InProgress;
        log::debug!("path search {} -> {} started", start.pos(), end.pos());
        Ok(())
    }

    /// Expand up to `step_budget` nodes, or until done if `step_budget` is
    /// 0.
    ///
    /// Returns the status after this slice. Once complete, further calls do
    /// nothing.
    pub fn advance(&mut self, step_budget: u32) -> Result<SearchStatus, SearchError> {
        let req = self.request.ok_or(SearchError::NotStarted)?;
        if self.status.is_complete() {
            return Ok(self.status);
        }

        if req.start_index == req.end_index {
            self.path.push(req.start);
            return Ok(self.complete(req, SearchStatus::Found));
        }

        let mut steps = 0u32;
        while step_budget == 0 || steps < step_budget {
            let Some(current) = self.pop_open() else {
                break;
            };
            steps += 1;
            self.expanded += 1;
            if let Some(goal) = self.expand(req, current) {
                self.path = self.arena.trace(goal);
                return Ok(self.complete(req, SearchStatus::Found));
            }
        }

        if self.open_len == 0 {
            return Ok(self.complete(req, SearchStatus::NoPath));
        }
        log::trace!(
            "path search {} -> {}: {steps} expansions this slice, {} open",
            req.start.pos(),
            req.end.pos(),
            self.open_len
        );
        Ok(self.status)
    }

    /// Whether the search has finished, with or without a path.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Current progress.
    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Number of nodes on the found path, both ends included.
    ///
    /// 0 until the search completes, and 0 if no path exists.
    #[inline]
    pub fn path_len(&self) -> usize {
        if self.is_complete() { self.path.len() } else { 0 }
    }

    /// The `index`-th node of the found path; index 0 is the start node.
    pub fn path_node(&self, index: usize) -> Result<&'g Node, SearchError> {
        let path = self.path()?;
        path.get(index).copied().ok_or(SearchError::OutOfRange {
            index,
            len: path.len(),
        })
    }

    /// The whole found path from start to end; empty if no path exists.
    pub fn path(&self) -> Result<&[&'g Node], SearchError> {
        if self.is_complete() {
            Ok(&self.path)
        } else {
            Err(SearchError::NotComplete)
        }
    }

    /// The grid being searched, once started.
    pub fn grid(&self) -> Option<&'g Grid> {
        self.request.map(|r| r.grid)
    }

    /// Start node of the current search.
    pub fn start(&self) -> Option<&'g Node> {
        self.request.map(|r| r.start)
    }

    /// End node of the current search.
    pub fn end(&self) -> Option<&'g Node> {
        self.request.map(|r| r.end)
    }

    /// Nodes expanded since the search started.
    #[inline]
    pub fn expanded(&self) -> u64 {
        self.expanded
    }

    /// Nodes currently queued for expansion.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open_len
    }

    /// Nodes already expanded and never reconsidered.
    #[inline]
    pub fn closed_len(&self) -> usize {
        self.closed_len
    }

    /// Distinct grid nodes touched so far (open, closed or goal).
    #[inline]
    pub fn discovered(&self) -> usize {
        self.arena.len()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    #[inline]
    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Pop the best live entry and close it.
    fn pop_open(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let node = self.arena.get_mut(entry.id);
            // Superseded by a cheaper re-queue.
            if node.state != (NodeState::Open { seq: entry.seq }) {
                continue;
            }
            node.state = NodeState::Closed;
            self.open_len -= 1;
            self.closed_len += 1;
            return Some(entry.id);
        }
        None
    }

    /// Relax every neighbour of `current`. Returns the arena id of the end
    /// node as soon as it is reached.
    fn expand(&mut self, req: Request<'g>, current: usize) -> Option<usize> {
        let subject = self.arena.get(current);
        let (target, travel) = (subject.target, subject.travel_cost);

        for next in Neighbors::of(req.grid, target) {
            if !next.is_passable() {
                continue;
            }
            let Some(ni) = req.grid.index(next.x(), next.y()) else {
                continue;
            };
            let tentative = travel + step_cost(next);

            let id = match self.arena.find(ni) {
                Some(id) => {
                    let known = self.arena.get(id);
                    match known.state {
                        NodeState::Open { .. } if known.travel_cost > tentative => {
                            self.open_len -= 1;
                            id
                        }
                        _ => continue,
                    }
                }
                None => self.arena.insert(ni, SearchNode::new(next, NodeState::Unqueued)),
            };

            let node = self.arena.get_mut(id);
            node.travel_cost = tentative;
            node.heuristic_cost = octile(next.pos(), req.end.pos());
            node.parent = Some(current);

            if ni == req.end_index {
                node.state = NodeState::Unqueued;
                return Some(id);
            }

            let total = node.total_cost();
            let seq = self.next_seq();
            self.arena.get_mut(id).state = NodeState::Open { seq };
            self.open.push(OpenEntry { id, total, seq });
            self.open_len += 1;
        }
        None
    }

    fn complete(&mut self, req: Request<'g>, status: SearchStatus) -> SearchStatus {
        self.status = status;
        self.open.clear();
        self.open_len = 0;
        log::debug!(
            "path search {} -> {} complete: {status:?}, {} nodes, {} expansions",
            req.start.pos(),
            req.end.pos(),
            self.path.len(),
            self.expanded
        );
        status
    }
}
