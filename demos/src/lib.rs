//! Shared model for the `pathing` terminal demo.
//!
//! Builds a random terrain grid, sends several time-sliced searches from
//! scattered origins toward one target and draws the resulting paths.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use antpath_core::{Grid, GridError, Node, NodeInit, TilePos, tile_center};
use antpath_search::{
    DEFAULT_STEP_BUDGET, PathSink, Scheduler, SchedulerConfig, SearchError, SessionId,
};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use rand::{RngExt, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything the demo can be told from a JSON file. Missing fields take
/// their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub dim_x: u32,
    pub dim_y: u32,
    pub tile_dim: u32,
    /// Chance that a cell is a wall.
    pub wall_chance: f64,
    /// Chance that a non-wall cell is swamp.
    pub swamp_chance: f64,
    /// Travel cost modifier of swamp cells.
    pub swamp_cost: f32,
    pub seed: u64,
    /// Number of searches, each from its own origin.
    pub origins: usize,
    pub scheduler: SchedulerConfig,
    /// Give up after this many ticks.
    pub max_ticks: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            dim_x: 60,
            dim_y: 20,
            tile_dim: 16,
            wall_chance: 0.25,
            swamp_chance: 0.1,
            swamp_cost: 4.0,
            seed: 42,
            origins: 4,
            scheduler: SchedulerConfig {
                step_budget: DEFAULT_STEP_BUDGET,
            },
            max_ticks: 10_000,
        }
    }
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("grid has {found} open cells, need {needed}")]
    TooFewOpenCells { needed: usize, found: usize },
}

impl DemoConfig {
    /// Read a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Build a random terrain grid. World positions are tile centres.
pub fn build_grid(config: &DemoConfig, rng: &mut StdRng) -> Result<Grid, DemoError> {
    let (dx, dy, td) = (config.dim_x, config.dim_y, config.tile_dim);
    let wall = config.wall_chance.clamp(0.0, 1.0);
    let swamp = config.swamp_chance.clamp(0.0, 1.0);
    let grid = Grid::from_fn(dx, dy, td, |x, y| {
        let init = if rng.random_bool(wall) {
            NodeInit::blocked()
        } else if rng.random_bool(swamp) {
            NodeInit::open(config.swamp_cost)
        } else {
            NodeInit::default()
        };
        init.at_world(tile_center(dx, dy, td, TilePos::new(x, y)))
    })?;
    Ok(grid)
}

/// Pick `count` distinct passable cells at random.
pub fn pick_open<'g>(
    grid: &'g Grid,
    rng: &mut StdRng,
    count: usize,
) -> Result<Vec<&'g Node>, DemoError> {
    let mut open: Vec<&Node> = grid.iter().filter(|n| n.is_passable()).collect();
    if open.len() < count {
        return Err(DemoError::TooFewOpenCells {
            needed: count,
            found: open.len(),
        });
    }
    // Partial Fisher-Yates: the first `count` slots end up shuffled.
    for i in 0..count {
        let j = rng.random_range(i..open.len());
        open.swap(i, j);
    }
    open.truncate(count);
    Ok(open)
}

/// The demo scene: a grid plus the chosen target and origins.
pub struct Scene {
    pub grid: Grid,
    pub target: TilePos,
    pub origins: Vec<TilePos>,
}

impl Scene {
    /// Generate a scene from `config`. Deterministic for a given seed.
    pub fn generate(config: &DemoConfig) -> Result<Self, DemoError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let grid = build_grid(config, &mut rng)?;
        let picked: Vec<TilePos> = pick_open(&grid, &mut rng, config.origins + 1)?
            .into_iter()
            .map(Node::pos)
            .collect();
        let (target, origins) = match picked.split_first() {
            Some((target, origins)) => (*target, origins.to_vec()),
            None => {
                return Err(DemoError::TooFewOpenCells {
                    needed: 1,
                    found: 0,
                });
            }
        };
        Ok(Self {
            grid,
            target,
            origins,
        })
    }

    /// A scheduler with one session per origin, all heading for the target.
    pub fn scheduler(&self, config: SchedulerConfig) -> Result<Scheduler<'_>, DemoError> {
        let mut sched = Scheduler::new(&self.grid, config);
        for &origin in &self.origins {
            sched.spawn_at(origin, self.target)?;
        }
        Ok(sched)
    }
}

// ---------------------------------------------------------------------------
// Path overlay
// ---------------------------------------------------------------------------

/// Collects path nodes as the scheduler hands them out, in arrival order.
#[derive(Debug, Default)]
pub struct PathOverlay {
    paths: BTreeMap<SessionId, Vec<TilePos>>,
}

impl PathOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The path received so far for `id`.
    pub fn path(&self, id: SessionId) -> &[TilePos] {
        self.paths.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The session owning the first path that crosses `pos`, if any.
    pub fn owner(&self, pos: TilePos) -> Option<SessionId> {
        self.paths
            .iter()
            .find(|(_, path)| path.contains(&pos))
            .map(|(&id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl PathSink for PathOverlay {
    fn path_nodes(&mut self, id: SessionId, nodes: &[&Node]) {
        for n in nodes {
            log::trace!("session {id}: node {} at {}", n.pos(), n.world());
        }
        self.paths
            .entry(id)
            .or_default()
            .extend(nodes.iter().map(|n| n.pos()));
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const PATH_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Green,
    Color::Red,
];

fn glyph(scene: &Scene, overlay: &PathOverlay, node: &Node) -> (char, Color) {
    let pos = node.pos();
    if pos == scene.target {
        return ('X', Color::White);
    }
    if let Some(i) = scene.origins.iter().position(|&o| o == pos) {
        let color = PATH_COLORS[i % PATH_COLORS.len()];
        return ('@', color);
    }
    if let Some(id) = overlay.owner(pos) {
        let color = PATH_COLORS[id.0 as usize % PATH_COLORS.len()];
        return ('*', color);
    }
    if !node.is_passable() {
        ('#', Color::DarkGrey)
    } else if node.travel_cost_modifier() > 1.0 {
        ('~', Color::DarkGreen)
    } else {
        ('.', Color::Grey)
    }
}

/// Draw the grid with paths on top, one text row per grid row.
pub fn render<W: Write>(out: &mut W, scene: &Scene, overlay: &PathOverlay) -> io::Result<()> {
    for y in 0..scene.grid.dim_y() {
        for x in 0..scene.grid.dim_x() {
            let Some(node) = scene.grid.node_at(x, y) else {
                continue;
            };
            let (ch, color) = glyph(scene, overlay, node);
            queue!(out, SetForegroundColor(color), Print(ch))?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    out.flush()
}
