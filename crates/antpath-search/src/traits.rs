use antpath_core::{Grid, Node};

use crate::error::SearchError;
use crate::search::SearchStatus;
use crate::session::SessionId;

/// The start/advance/query surface shared by [`PathSearch`](crate::PathSearch)
/// and [`SearchSession`](crate::SearchSession).
pub trait PathFinder<'g> {
    /// Begin a new search, discarding any previous one.
    fn start_search(
        &mut self,
        grid: &'g Grid,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError>;

    /// Expand up to `step_budget` nodes; 0 means run to completion.
    fn advance(&mut self, step_budget: u32) -> Result<SearchStatus, SearchError>;

    /// Whether the search finished, with or without a path.
    fn is_complete(&self) -> bool;

    /// Node count of the found path; 0 until complete or if unreachable.
    fn path_len(&self) -> usize;

    /// The `index`-th path node, start first.
    fn path_node(&self, index: usize) -> Result<&'g Node, SearchError>;
}

/// Receives path nodes for drawing.
///
/// Implemented by presentation layers; the search never reads anything
/// back from a sink.
pub trait PathSink {
    /// `nodes` continue the path of session `id` from where the previous
    /// call for that session left off.
    fn path_nodes(&mut self, id: SessionId, nodes: &[&Node]);
}

impl<S: PathSink + ?Sized> PathSink for &mut S {
    fn path_nodes(&mut self, id: SessionId, nodes: &[&Node]) {
        (**self).path_nodes(id, nodes)
    }
}
