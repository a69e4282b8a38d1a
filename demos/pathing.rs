//! Several searches from scattered origins converge on one target, a few
//! node expansions per session per tick, and the map is printed with the
//! paths drawn on top.
//!
//! Run: cargo run --bin pathing [-- config.json]
//!
//! Set `RUST_LOG=debug` to follow each session.

use std::io;

use antpath_demos::{DemoConfig, PathOverlay, Scene, render};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path)?,
        None => DemoConfig::default(),
    };
    log::info!(
        "{}x{} grid, seed {}, {} origins, step budget {}",
        config.dim_x,
        config.dim_y,
        config.seed,
        config.origins,
        config.scheduler.step_budget
    );

    let scene = Scene::generate(&config)?;
    let mut sched = scene.scheduler(config.scheduler)?;
    let mut overlay = PathOverlay::new();

    while !sched.is_idle() && sched.ticks() < config.max_ticks {
        let report = sched.tick()?;
        for id in &report.completed {
            let session = sched.session(*id);
            let len = session.map_or(0, |s| s.path_len());
            let expanded = session.map_or(0, |s| s.search().expanded());
            if len == 0 {
                log::info!(
                    "tick {}: session {id} found no path ({expanded} expansions)",
                    report.tick
                );
            } else {
                log::info!(
                    "tick {}: session {id} found a {len}-node path ({expanded} expansions)",
                    report.tick
                );
            }
        }
        sched.drain_paths(&mut overlay);
    }
    if !sched.is_idle() {
        log::warn!("stopped after {} ticks with searches still running", sched.ticks());
    }

    render(&mut io::stdout(), &scene, &overlay)?;
    Ok(())
}
