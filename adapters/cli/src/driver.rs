use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use long_snake_core::{Command, Config, Event};
use long_snake_rendering::{requires_redraw, RenderingBackend, Scene};
use long_snake_system_autopilot::Autopilot;
use long_snake_system_best_score::{BestScore, BestScoreStore};
use long_snake_world::{self as world, query, World};

use crate::script::TurnScript;

/// Frames handed to the rendering backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum RenderMode {
    /// Present every frame whose events changed the scene.
    Every,
    /// Present only the final frame.
    #[default]
    Final,
    /// Never present.
    None,
}

/// Parameters of a headless session run.
#[derive(Clone, Debug)]
pub(crate) struct DriverOptions {
    pub(crate) frames: u32,
    pub(crate) frame_length: Duration,
    pub(crate) turns: TurnScript,
    pub(crate) autopilot: bool,
    pub(crate) render: RenderMode,
}

/// Outcome of a headless session run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) frames: u32,
    pub(crate) elapsed: Duration,
    pub(crate) score: u32,
    pub(crate) best_score: u32,
    pub(crate) length: usize,
    pub(crate) tick_interval: Duration,
    pub(crate) moves: u64,
    pub(crate) rejected_turns: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "frames {} ({} ms simulated), moves {}",
            self.frames,
            self.elapsed.as_millis(),
            self.moves
        )?;
        writeln!(
            f,
            "score {}, best {}, length {}",
            self.score, self.best_score, self.length
        )?;
        write!(
            f,
            "tick interval {} ms, rejected turns {}",
            self.tick_interval.as_millis(),
            self.rejected_turns
        )
    }
}

/// Runs one session for a fixed number of frames.
///
/// Each frame applies the scripted turns for that frame, then one tick at the
/// frame's clock value, then any autopilot steering. Events of the frame are
/// handed to the best-score system and, when requested, to the backend.
pub(crate) fn run<S>(
    config: Config,
    store: &mut S,
    options: &DriverOptions,
    backend: &mut dyn RenderingBackend,
) -> Result<Summary>
where
    S: BestScoreStore + ?Sized,
{
    let mut best = BestScore::load(store);
    let mut world = World::new(config, best.recorded()).context("invalid configuration")?;
    let mut autopilot = options.autopilot.then(Autopilot::new);
    let mut events = Vec::new();
    let mut commands = Vec::new();
    let mut summary = Summary {
        frames: options.frames,
        elapsed: Duration::ZERO,
        score: 0,
        best_score: 0,
        length: 0,
        tick_interval: query::tick_interval(&world),
        moves: 0,
        rejected_turns: 0,
    };

    info!(
        "running {} frames of {} ms with {} scripted turns, autopilot {}",
        options.frames,
        options.frame_length.as_millis(),
        options.turns.len(),
        if options.autopilot { "on" } else { "off" }
    );

    world::apply(&mut world, Command::Start, &mut events);
    let mut clock = Duration::ZERO;

    for frame in 0..options.frames {
        for direction in options.turns.turns_at(frame) {
            world::apply(
                &mut world,
                Command::RequestDirectionChange { direction },
                &mut events,
            );
        }
        world::apply(&mut world, Command::Tick { now: clock }, &mut events);

        if let Some(autopilot) = autopilot.as_mut() {
            let snapshot = query::snake_snapshot(&world);
            autopilot.handle(
                &events,
                snapshot.as_ref(),
                query::grid(&world),
                &mut commands,
            );
            for command in commands.drain(..) {
                world::apply(&mut world, command, &mut events);
            }
        }

        best.handle(&events, store);
        tally(&events, &mut summary);

        if options.render == RenderMode::Every && requires_redraw(&events) {
            backend
                .present(&scene(&world))
                .with_context(|| format!("failed to present frame {frame}"))?;
        }
        if !events.is_empty() {
            debug!("frame {frame}: {} events", events.len());
        }

        events.clear();
        clock = clock.saturating_add(options.frame_length);
        summary.elapsed = clock;
    }

    if options.render == RenderMode::Final {
        backend
            .present(&scene(&world))
            .context("failed to present final frame")?;
    }

    summary.score = query::score(&world);
    summary.best_score = best.recorded().max(query::best_score(&world));
    summary.length = query::body(&world).len();
    summary.tick_interval = query::tick_interval(&world);
    info!(
        "session finished with score {} and best score {}",
        summary.score, summary.best_score
    );
    Ok(summary)
}

fn tally(events: &[Event], summary: &mut Summary) {
    for event in events {
        match event {
            Event::SnakeAdvanced { .. } => summary.moves += 1,
            Event::DirectionChangeRejected { .. } => summary.rejected_turns += 1,
            _ => {}
        }
    }
}

fn scene(world: &World) -> Scene {
    Scene::new(
        query::grid(world),
        query::body(world).to_vec(),
        query::direction(world),
        query::food(world),
        query::score(world),
        query::best_score(world),
    )
}
