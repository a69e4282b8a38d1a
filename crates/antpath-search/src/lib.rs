//! Time-sliced A* path search over an [`antpath_core::Grid`].
//!
//! A search is started once and then advanced a bounded number of node
//! expansions at a time, so callers can spread an expensive query over
//! several frames:
//!
//! - [`PathSearch`] is the resumable A* engine.
//! - [`SearchSession`] wraps one engine together with the bookkeeping a
//!   renderer needs to receive each path node once.
//! - [`Scheduler`] drives many sessions over one shared grid, one
//!   [`tick`](Scheduler::tick) per frame.
//!
//! Movement is 8-connected. A diagonal step is only allowed when both
//! orthogonal cells around its corner are passable, see [`Neighbors`].
//! Each step costs the travel cost modifier of the cell entered, and the
//! remaining distance is estimated with [`octile`].
//!
//! The grid is never mutated by a search; any number of searches on any
//! number of threads may share one `&Grid`.

mod arena;
mod distance;
mod error;
mod neighbors;
mod scheduler;
mod search;
mod session;
mod traits;

pub use distance::{octile, step_cost};
pub use error::SearchError;
pub use neighbors::Neighbors;
pub use scheduler::{DEFAULT_STEP_BUDGET, Scheduler, SchedulerConfig, TickReport};
pub use search::{PathSearch, SearchStatus};
pub use session::{SearchSession, SessionId};
pub use traits::{PathFinder, PathSink};
