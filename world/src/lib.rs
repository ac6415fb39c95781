#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Long Snake.
//!
//! The [`World`] owns the snake body, heading, food, score, and movement
//! cadence of a single session. It is mutated exclusively through [`apply`]
//! and observed through the [`query`] module; it never reaches back into
//! rendering, input, or persistence.

mod occupancy;

use std::time::Duration;

use log::{debug, info, warn};
use long_snake_core::{
    AdvanceTrigger, Cell, Command, Config, ConfigError, Direction, DirectionRejection, Event,
    FoodPlacementError, Phase,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use self::occupancy::OccupancyGrid;

/// Represents the authoritative state of one Long Snake session.
#[derive(Debug)]
pub struct World {
    config: Config,
    phase: Phase,
    body: Vec<Cell>,
    occupancy: OccupancyGrid,
    direction: Direction,
    food: Option<Cell>,
    score: u32,
    best_score: u32,
    tick_interval: Duration,
    next_deadline: Option<Duration>,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world awaiting [`Command::Start`].
    ///
    /// `best_score` is the value previously recorded by the persistence
    /// store, or zero when none exists.
    pub fn new(config: Config, best_score: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, best_score))
    }

    /// Creates a world using [`Config::classic`].
    #[must_use]
    pub fn classic(best_score: u32) -> Self {
        Self::assemble(Config::classic(), best_score)
    }

    fn assemble(config: Config, best_score: u32) -> Self {
        Self {
            phase: Phase::NotStarted,
            body: Vec::new(),
            occupancy: OccupancyGrid::new(config.grid()),
            direction: config.initial_direction(),
            food: None,
            score: 0,
            best_score,
            tick_interval: config.tick_interval(),
            next_deadline: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            config,
        }
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == Phase::Running {
            debug!("start ignored: session already running");
            out_events.push(Event::SessionAlreadyRunning);
            return;
        }

        self.body = self.config.start_body().to_vec();
        self.occupancy.fill_with(&self.body);
        self.direction = self.config.initial_direction();
        self.score = 0;
        self.tick_interval = self.config.tick_interval();
        self.next_deadline = None;
        self.food = None;
        self.phase = Phase::Running;

        info!(
            "session started with {} segments heading {:?}, best score {}",
            self.body.len(),
            self.direction,
            self.best_score
        );
        out_events.push(Event::SessionStarted {
            body: self.body.clone(),
            direction: self.direction,
            best_score: self.best_score,
        });
        self.place_food(out_events);
    }

    fn tick(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            return;
        }

        if let Some(deadline) = self.next_deadline {
            if now < deadline {
                return;
            }
        } else {
            self.arm_deadline(now, out_events);
            return;
        }

        self.arm_deadline(now, out_events);
        self.advance(AdvanceTrigger::Tick, out_events);
        self.consume_food(out_events);
    }

    fn arm_deadline(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let deadline = now.saturating_add(self.tick_interval);
        self.next_deadline = Some(deadline);
        out_events.push(Event::DeadlineArmed { deadline });
    }

    fn request_direction_change(&mut self, requested: Direction, out_events: &mut Vec<Event>) {
        let current = self.direction;
        let rejection = if self.phase != Phase::Running {
            Some(DirectionRejection::NotRunning)
        } else if requested == current {
            Some(DirectionRejection::Redundant)
        } else if requested == current.opposite() {
            Some(DirectionRejection::Reversal)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!("direction change to {requested:?} ignored while heading {current:?}: {reason:?}");
            out_events.push(Event::DirectionChangeRejected {
                requested,
                current,
                reason,
            });
            return;
        }

        self.direction = requested;
        out_events.push(Event::DirectionChanged {
            from: current,
            to: requested,
        });
        self.advance(AdvanceTrigger::Turn, out_events);
    }

    fn advance(&mut self, trigger: AdvanceTrigger, out_events: &mut Vec<Event>) {
        let (Some(&head), Some(&tail)) = (self.body.first(), self.body.last()) else {
            return;
        };

        self.occupancy.vacate(tail);
        for index in (1..self.body.len()).rev() {
            self.body[index] = self.body[index - 1];
        }
        let head = self.config.grid().wrap(head.offset(self.direction));
        self.body[0] = head;
        self.occupancy.occupy(head);

        let vacated = self.occupancy.is_free(tail).then_some(tail);
        out_events.push(Event::SnakeAdvanced {
            head,
            vacated,
            trigger,
        });
    }

    fn consume_food(&mut self, out_events: &mut Vec<Event>) {
        let (Some(food), Some(&head)) = (self.food, self.body.first()) else {
            return;
        };
        if food != head {
            return;
        }

        self.score = self.score.saturating_add(1);
        out_events.push(Event::FoodConsumed { cell: food });
        out_events.push(Event::ScoreChanged { score: self.score });
        if self.score > self.best_score {
            self.best_score = self.score;
            out_events.push(Event::BestScoreRaised { score: self.score });
        }

        self.place_food(out_events);

        if let Some(&tail) = self.body.last() {
            self.body.push(tail);
            self.occupancy.occupy(tail);
            out_events.push(Event::SnakeGrew {
                length: self.body.len(),
            });
        }

        let interval = self.config.speed_scaling().next_interval(
            self.tick_interval,
            self.score,
            self.config.max_score(),
            self.config.min_tick_interval(),
        );
        if interval != self.tick_interval {
            self.tick_interval = interval;
            out_events.push(Event::TickIntervalChanged { interval });
        }
    }

    fn place_food(&mut self, out_events: &mut Vec<Event>) {
        let grid = self.config.grid();
        for _ in 0..self.config.food_placement_attempts() {
            let cell = Cell::new(
                self.rng.gen_range(0..=grid.max_row()),
                self.rng.gen_range(0..=grid.max_column()),
            );
            if self.occupancy.is_free(cell) {
                self.set_food(cell, out_events);
                return;
            }
        }

        let free: Vec<Cell> = self.occupancy.view().free_cells().collect();
        match free.choose(&mut self.rng).copied() {
            Some(cell) => {
                warn!(
                    "random food placement exhausted {} attempts; chose among {} free cells",
                    self.config.food_placement_attempts(),
                    free.len()
                );
                self.set_food(cell, out_events);
            }
            None => {
                warn!("no free cell left for food");
                self.food = None;
                out_events.push(Event::FoodUnavailable);
            }
        }
    }

    fn set_food(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        debug!("food placed at ({}, {})", cell.row(), cell.column());
        self.food = Some(cell);
        out_events.push(Event::FoodPlaced { cell });
    }

    fn place_food_at(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        let rejection = if self.phase != Phase::Running {
            Some(FoodPlacementError::NotRunning)
        } else if !self.config.grid().contains(cell) {
            Some(FoodPlacementError::OutOfBounds)
        } else if !self.occupancy.is_free(cell) {
            Some(FoodPlacementError::Occupied)
        } else {
            None
        };

        match rejection {
            Some(reason) => out_events.push(Event::FoodPlacementRejected { cell, reason }),
            None => self.set_food(cell, out_events),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::classic(0)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => world.start(out_events),
        Command::Tick { now } => world.tick(now, out_events),
        Command::RequestDirectionChange { direction } => {
            world.request_direction_change(direction, out_events);
        }
        Command::PlaceFood { cell } => world.place_food_at(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use long_snake_core::{
        Cell, Direction, GridBounds, OccupancyView, Phase, SnakeSnapshot,
    };

    use super::World;

    /// Lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Occupied cells in movement order, head first. Empty before start.
    #[must_use]
    pub fn body(world: &World) -> &[Cell] {
        &world.body
    }

    /// Cell occupied by the head, if the session started.
    #[must_use]
    pub fn head(world: &World) -> Option<Cell> {
        world.body.first().copied()
    }

    /// Current heading.
    #[must_use]
    pub fn direction(world: &World) -> Direction {
        world.direction
    }

    /// Cell holding the food, if any.
    #[must_use]
    pub fn food(world: &World) -> Option<Cell> {
        world.food
    }

    /// Score accumulated during the session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Highest score known to the session, including the stored best.
    #[must_use]
    pub fn best_score(world: &World) -> u32 {
        world.best_score
    }

    /// Current interval between tick-driven moves.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.tick_interval
    }

    /// Clock value at or after which the next tick moves the snake.
    #[must_use]
    pub fn next_deadline(world: &World) -> Option<Duration> {
        world.next_deadline
    }

    /// Bounds of the playing field.
    #[must_use]
    pub fn grid(world: &World) -> GridBounds {
        world.config.grid()
    }

    /// Exposes a read-only view of the dense body occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.occupancy.view()
    }

    /// Captures the snake's head, heading, food, and score.
    #[must_use]
    pub fn snake_snapshot(world: &World) -> Option<SnakeSnapshot> {
        let head = head(world)?;
        Some(SnakeSnapshot {
            head,
            direction: world.direction,
            food: world.food,
            length: world.body.len(),
            score: world.score,
        })
    }
}
