//! Per-tick driver for many path searches over one grid.
//!
//! A [`Scheduler`] owns a set of [`SearchSession`]s keyed by [`SessionId`].
//! Each [`tick`](Scheduler::tick) advances every unfinished session by the
//! configured step budget, in ascending id order, so a frame never spends
//! more than `sessions * step_budget` node expansions on path finding.
//! Completed paths are handed to a [`PathSink`] by
//! [`drain_paths`](Scheduler::drain_paths).

use std::collections::BTreeMap;

use antpath_core::{Grid, Node, TilePos};

use crate::error::SearchError;
use crate::search::SearchStatus;
use crate::session::{SearchSession, SessionId};
use crate::traits::PathSink;

/// Default number of node expansions per session per tick.
pub const DEFAULT_STEP_BUDGET: u32 = 20;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Scheduler settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Expansions per session per tick; 0 runs each search to completion in
    /// a single tick.
    pub step_budget: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

/// What one [`Scheduler::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick counter, starting at 1.
    pub tick: u64,
    /// Sessions that were advanced.
    pub advanced: usize,
    /// Sessions that completed during this tick, in id order.
    pub completed: Vec<SessionId>,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives any number of [`SearchSession`]s over a shared grid.
pub struct Scheduler<'g> {
    grid: &'g Grid,
    config: SchedulerConfig,
    sessions: BTreeMap<SessionId, SearchSession<'g>>,
    next_id: u64,
    ticks: u64,
}

impl<'g> Scheduler<'g> {
    pub fn new(grid: &'g Grid, config: SchedulerConfig) -> Self {
        Self {
            grid,
            config,
            sessions: BTreeMap::new(),
            next_id: 0,
            ticks: 0,
        }
    }

    #[inline]
    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    #[inline]
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    /// Ticks run so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start a search from `start` to `end` in a new session.
    pub fn spawn(&mut self, start: &'g Node, end: &'g Node) -> Result<SessionId, SearchError> {
        let id = SessionId(self.next_id);
        let mut session = SearchSession::new(id);
        session.start_search(self.grid, start, end)?;
        self.next_id += 1;
        self.sessions.insert(id, session);
        log::debug!("session {id} spawned: {} -> {}", start.pos(), end.pos());
        Ok(id)
    }

    /// Like [`spawn`](Self::spawn), with tile coordinates.
    pub fn spawn_at(&mut self, start: TilePos, end: TilePos) -> Result<SessionId, SearchError> {
        let start = self.resolve(start)?;
        let end = self.resolve(end)?;
        self.spawn(start, end)
    }

    /// Point an existing session at a new request.
    pub fn restart(
        &mut self,
        id: SessionId,
        start: &'g Node,
        end: &'g Node,
    ) -> Result<(), SearchError> {
        let grid = self.grid;
        self.sessions
            .get_mut(&id)
            .ok_or(SearchError::UnknownSession(id))?
            .start_search(grid, start, end)
    }

    fn resolve(&self, pos: TilePos) -> Result<&'g Node, SearchError> {
        self.grid.node_at_pos(pos).ok_or(SearchError::OffGrid {
            x: pos.x,
            y: pos.y,
        })
    }

    /// Advance every unfinished session once.
    pub fn tick(&mut self) -> Result<TickReport, SearchError> {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..TickReport::default()
        };
        for (&id, session) in self.sessions.iter_mut() {
            if session.is_complete() {
                continue;
            }
            let budget = session.step_budget().unwrap_or(self.config.step_budget);
            let status = session.advance(budget)?;
            report.advanced += 1;
            if status.is_complete() {
                log::debug!(
                    "session {id} finished on tick {}: {} nodes",
                    self.ticks,
                    session.path_len()
                );
                report.completed.push(id);
            }
        }
        Ok(report)
    }

    /// Tick until every session is complete or `max_ticks` ticks have run.
    ///
    /// Returns the number of ticks run by this call.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Result<u64, SearchError> {
        let mut ran = 0;
        while ran < max_ticks && !self.is_idle() {
            self.tick()?;
            ran += 1;
        }
        if !self.is_idle() {
            log::warn!(
                "{} sessions still searching after {ran} ticks",
                self.sessions.values().filter(|s| !s.is_complete()).count()
            );
        }
        Ok(ran)
    }

    pub fn session(&self, id: SessionId) -> Option<&SearchSession<'g>> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut SearchSession<'g>> {
        self.sessions.get_mut(&id)
    }

    /// Sessions in id order.
    pub fn sessions(&self) -> impl Iterator<Item = &SearchSession<'g>> {
        self.sessions.values()
    }

    /// Status of session `id`.
    pub fn status(&self, id: SessionId) -> Result<SearchStatus, SearchError> {
        self.session(id)
            .map(SearchSession::status)
            .ok_or(SearchError::UnknownSession(id))
    }

    /// Cancel session `id`, dropping all of its search state.
    pub fn remove(&mut self, id: SessionId) -> Option<SearchSession<'g>> {
        let removed = self.sessions.remove(&id);
        if removed.is_some() {
            log::debug!("session {id} removed");
        }
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whether no session is still searching.
    pub fn is_idle(&self) -> bool {
        self.sessions.values().all(SearchSession::is_complete)
    }

    /// Hand every session's not yet emitted path nodes to `sink`.
    ///
    /// Returns the number of nodes handed out.
    pub fn drain_paths(&mut self, sink: &mut impl PathSink) -> usize {
        let mut total = 0;
        for (&id, session) in self.sessions.iter_mut() {
            let nodes = session.take_new_path_nodes();
            if !nodes.is_empty() {
                total += nodes.len();
                sink.path_nodes(id, nodes);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathSearch;
    use antpath_core::NodeInit;

    fn grid(rows: &[&str]) -> Grid {
        let dim_y = rows.len() as u32;
        let dim_x = rows[0].len() as u32;
        Grid::from_fn(dim_x, dim_y, 1, |x, y| {
            match rows[y as usize].as_bytes()[x as usize] {
                b'#' => NodeInit::blocked(),
                _ => NodeInit::default(),
            }
        })
        .unwrap()
    }

    const MAZE: [&str; 9] = [
        "..........",
        ".########.",
        ".#......#.",
        ".#.####.#.",
        ".#.#..#.#.",
        ".#.#.##.#.",
        ".#.#....#.",
        ".#.######.",
        "..........",
    ];

    #[derive(Default)]
    struct Collect(Vec<(SessionId, Vec<(u32, u32)>)>);

    impl PathSink for Collect {
        fn path_nodes(&mut self, id: SessionId, nodes: &[&Node]) {
            self.0
                .push((id, nodes.iter().map(|n| (n.x(), n.y())).collect()));
        }
    }

    #[test]
    fn default_budget() {
        assert_eq!(SchedulerConfig::default().step_budget, 20);
    }

    #[test]
    fn tick_advances_each_session_by_budget() {
        let g = grid(&MAZE);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 3 });
        let a = sched.spawn_at(TilePos::new(0, 0), TilePos::new(4, 4)).unwrap();
        let b = sched.spawn_at(TilePos::new(9, 8), TilePos::new(4, 4)).unwrap();
        assert_eq!((a, b), (SessionId(0), SessionId(1)));

        let report = sched.tick().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.advanced, 2);
        assert!(report.completed.is_empty());
        for s in sched.sessions() {
            assert_eq!(s.search().expanded(), 3);
        }
    }

    #[test]
    fn run_until_idle_completes_all() {
        let g = grid(&MAZE);
        let mut sched = Scheduler::new(&g, SchedulerConfig::default());
        let origins = [(0, 0), (9, 0), (0, 8), (9, 8)];
        for (x, y) in origins {
            sched.spawn_at(TilePos::new(x, y), TilePos::new(4, 4)).unwrap();
        }
        let ticks = sched.run_until_idle(1_000).unwrap();
        assert!(ticks > 1);
        assert!(sched.is_idle());
        assert_eq!(sched.ticks(), ticks);
        for s in sched.sessions() {
            assert_eq!(s.status(), SearchStatus::Found);
            let path = s.path().unwrap();
            assert_eq!(path.last().unwrap().pos(), TilePos::new(4, 4));
        }
        // Nothing left to do.
        assert_eq!(sched.run_until_idle(10).unwrap(), 0);
    }

    #[test]
    fn results_match_unsliced_search() {
        let g = grid(&MAZE);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 1 });
        let id = sched.spawn_at(TilePos::new(9, 8), TilePos::new(4, 4)).unwrap();
        sched.run_until_idle(10_000).unwrap();

        let mut engine = PathSearch::new();
        engine
            .start_search(&g, g.node_at(9, 8).unwrap(), g.node_at(4, 4).unwrap())
            .unwrap();
        engine.advance(0).unwrap();

        let session = sched.session(id).unwrap();
        assert_eq!(session.path().unwrap(), engine.path().unwrap());
        assert_eq!(session.search().expanded(), engine.expanded());
    }

    #[test]
    fn completion_is_reported_once() {
        let g = grid(&["....", "....", "....", "...."]);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 2 });
        let id = sched.spawn_at(TilePos::new(0, 0), TilePos::new(3, 3)).unwrap();
        // 3 expansions are needed: 2 in the first tick, 1 in the second.
        assert!(sched.tick().unwrap().completed.is_empty());
        assert_eq!(sched.tick().unwrap().completed, vec![id]);
        let third = sched.tick().unwrap();
        assert_eq!(third.advanced, 0);
        assert!(third.completed.is_empty());
    }

    #[test]
    fn per_session_budget_override() {
        let g = grid(&MAZE);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 1 });
        let fast = sched.spawn_at(TilePos::new(0, 0), TilePos::new(4, 4)).unwrap();
        sched.session_mut(fast).unwrap().set_step_budget(Some(0));
        let slow = sched.spawn_at(TilePos::new(9, 8), TilePos::new(4, 4)).unwrap();
        let report = sched.tick().unwrap();
        assert_eq!(report.completed, vec![fast]);
        assert_eq!(sched.status(slow).unwrap(), SearchStatus::InProgress);
    }

    #[test]
    fn drain_emits_each_path_once() {
        let g = grid(&["....", "....", "....", "...."]);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 1 });
        let a = sched.spawn_at(TilePos::new(0, 0), TilePos::new(3, 3)).unwrap();
        let b = sched.spawn_at(TilePos::new(3, 0), TilePos::new(3, 1)).unwrap();

        let mut sink = Collect::default();
        sched.tick().unwrap();
        // Session b is adjacent to its target and done after one expansion.
        assert_eq!(sched.drain_paths(&mut sink), 2);
        assert_eq!(sink.0, vec![(b, vec![(3, 0), (3, 1)])]);

        sched.run_until_idle(100).unwrap();
        assert_eq!(sched.drain_paths(&mut sink), 4);
        assert_eq!(sink.0[1], (a, vec![(0, 0), (1, 1), (2, 2), (3, 3)]));
        assert_eq!(sched.drain_paths(&mut sink), 0);
        assert_eq!(sink.0.len(), 2);
    }

    #[test]
    fn remove_cancels_session() {
        let g = grid(&MAZE);
        let mut sched = Scheduler::new(&g, SchedulerConfig { step_budget: 1 });
        let id = sched.spawn_at(TilePos::new(0, 0), TilePos::new(4, 4)).unwrap();
        sched.tick().unwrap();
        assert!(sched.remove(id).is_some());
        assert!(sched.is_empty());
        assert!(sched.is_idle());
        assert!(sched.remove(id).is_none());
        assert_eq!(sched.status(id), Err(SearchError::UnknownSession(id)));
        // Ids are not reused.
        let next = sched.spawn_at(TilePos::new(0, 0), TilePos::new(1, 0)).unwrap();
        assert_eq!(next, SessionId(1));
    }

    #[test]
    fn restart_reuses_session() {
        let g = grid(&["....", "....", "....", "...."]);
        let mut sched = Scheduler::new(&g, SchedulerConfig::default());
        let id = sched.spawn_at(TilePos::new(0, 0), TilePos::new(3, 3)).unwrap();
        sched.run_until_idle(10).unwrap();
        sched
            .restart(id, g.node_at(3, 3).unwrap(), g.node_at(3, 0).unwrap())
            .unwrap();
        assert!(!sched.is_idle());
        sched.run_until_idle(10).unwrap();
        assert_eq!(sched.session(id).unwrap().path_len(), 4);

        let missing = SessionId(42);
        assert_eq!(
            sched.restart(missing, g.node_at(0, 0).unwrap(), g.node_at(1, 1).unwrap()),
            Err(SearchError::UnknownSession(missing))
        );
    }

    #[test]
    fn off_grid_coordinates_are_rejected() {
        let g = grid(&["...", "..."]);
        let mut sched = Scheduler::new(&g, SchedulerConfig::default());
        assert_eq!(
            sched.spawn_at(TilePos::new(0, 0), TilePos::new(3, 1)),
            Err(SearchError::OffGrid { x: 3, y: 1 })
        );
        assert!(sched.is_empty());
    }

    #[test]
    fn foreign_nodes_do_not_create_sessions() {
        let g = grid(&["...", "..."]);
        let other = grid(&["...", "..."]);
        let mut sched = Scheduler::new(&g, SchedulerConfig::default());
        let err = sched
            .spawn(g.node_at(0, 0).unwrap(), other.node_at(2, 1).unwrap())
            .unwrap_err();
        assert_eq!(err, SearchError::ForeignNode { x: 2, y: 1 });
        assert!(sched.is_empty());
        assert_eq!(
            sched.spawn_at(TilePos::new(0, 0), TilePos::new(2, 1)).unwrap(),
            SessionId(0)
        );
    }

    #[test]
    fn schedulers_share_grid_across_threads() {
        let g = grid(&MAZE);
        let targets = [TilePos::new(4, 4), TilePos::new(9, 8), TilePos::new(0, 8)];

        let sequential: Vec<Vec<TilePos>> = targets
            .iter()
            .map(|&t| {
                let mut sched = Scheduler::new(&g, SchedulerConfig::default());
                let id = sched.spawn_at(TilePos::new(0, 0), t).unwrap();
                sched.run_until_idle(1_000).unwrap();
                let s = sched.session(id).unwrap();
                s.path().unwrap().iter().map(|n| n.pos()).collect()
            })
            .collect();

        let threaded: Vec<Vec<TilePos>> = std::thread::scope(|scope| {
            let handles: Vec<_> = targets
                .iter()
                .map(|&t| {
                    let g = &g;
                    scope.spawn(move || {
                        let mut sched =
                            Scheduler::new(g, SchedulerConfig { step_budget: 2 });
                        let id = sched.spawn_at(TilePos::new(0, 0), t).unwrap();
                        sched.run_until_idle(10_000).unwrap();
                        let s = sched.session(id).unwrap();
                        s.path().unwrap().iter().map(|n| n.pos()).collect()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, threaded);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json() {
        let cfg: SchedulerConfig = serde_json::from_str(r#"{"step_budget":5}"#).unwrap();
        assert_eq!(cfg.step_budget, 5);
        let cfg: SchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SchedulerConfig::default());
    }
}
