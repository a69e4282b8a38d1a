//! One path request: an engine plus presentation bookkeeping.

use std::fmt;

use antpath_core::{Grid, Node};

use crate::error::SearchError;
use crate::search::{PathSearch, SearchStatus};
use crate::traits::PathFinder;

/// Identifies a [`SearchSession`] within a [`Scheduler`](crate::Scheduler).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the [`PathSearch`] for a single path request.
///
/// Besides forwarding to its engine, a session remembers how much of the
/// found path has already been handed to a renderer, so a renderer that is
/// fed every tick only ever receives new nodes. That bookkeeping never
/// reaches the engine.
pub struct SearchSession<'g> {
    id: SessionId,
    search: PathSearch<'g>,
    emitted: usize,
    step_budget: Option<u32>,
}

impl<'g> SearchSession<'g> {
    /// Create an idle session.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            search: PathSearch::new(),
            emitted: 0,
            step_budget: None,
        }
    }

    /// Use `budget` instead of the scheduler's step budget.
    pub fn with_step_budget(mut self, budget: u32) -> Self {
        self.step_budget = Some(budget);
        self
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Per-session budget override, if any.
    #[inline]
    pub fn step_budget(&self) -> Option<u32> {
        self.step_budget
    }

    pub fn set_step_budget(&mut self, budget: Option<u32>) {
        self.step_budget = budget;
    }

    /// The engine, for diagnostics.
    #[inline]
    pub fn search(&self) -> &PathSearch<'g> {
        &self.search
    }

    /// Start a new search and forget what was emitted for the old one.
    pub fn start_search(
        &mut self,
        grid: &'g Grid,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError> {
        self.search.start_search(grid, start, end)?;
        self.emitted = 0;
        Ok(())
    }

    #[inline]
    pub fn advance(&mut self, step_budget: u32) -> Result<SearchStatus, SearchError> {
        self.search.advance(step_budget)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.search.is_complete()
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.search.status()
    }

    #[inline]
    pub fn path_len(&self) -> usize {
        self.search.path_len()
    }

    #[inline]
    pub fn path_node(&self, index: usize) -> Result<&'g Node, SearchError> {
        self.search.path_node(index)
    }

    pub fn path(&self) -> Result<&[&'g Node], SearchError> {
        self.search.path()
    }

    /// Path nodes already handed out by
    /// [`take_new_path_nodes`](Self::take_new_path_nodes).
    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Path nodes not handed out yet; empty until the search completes.
    pub fn take_new_path_nodes(&mut self) -> &[&'g Node] {
        let from = self.emitted;
        let path = match self.search.path() {
            Ok(path) => path,
            Err(_) => return &[],
        };
        self.emitted = path.len();
        &path[from.min(path.len())..]
    }
}

impl<'g> PathFinder<'g> for SearchSession<'g> {
    fn start_search(
        &mut self,
        grid: &'g Grid,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError> {
        SearchSession::start_search(self, grid, start, end)
    }

    fn advance(&mut self, step_budget: u32) -> Result<SearchStatus, SearchError> {
        SearchSession::advance(self, step_budget)
    }

    fn is_complete(&self) -> bool {
        SearchSession::is_complete(self)
    }

    fn path_len(&self) -> usize {
        SearchSession::path_len(self)
    }

    fn path_node(&self, index: usize) -> Result<&'g Node, SearchError> {
        SearchSession::path_node(self, index)
    }
}

impl<'g> PathFinder<'g> for PathSearch<'g> {
    fn start_search(
        &mut self,
        grid: &'g Grid,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError> {
        PathSearch::start_search(self, grid, start, end)
    }

    fn advance(&mut self, step_budget: u32) -> Result<SearchStatus, SearchError> {
        PathSearch::advance(self, step_budget)
    }

    fn is_complete(&self) -> bool {
        PathSearch::is_complete(self)
    }

    fn path_len(&self) -> usize {
        PathSearch::path_len(self)
    }

    fn path_node(&self, index: usize) -> Result<&'g Node, SearchError> {
        PathSearch::path_node(self, index)
    }
}
