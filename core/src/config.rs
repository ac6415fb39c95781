//! Session configuration and the speed-scaling rule.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Direction, GridBounds};

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);
const DEFAULT_MIN_TICK_INTERVAL: Duration = Duration::from_millis(150);
const DEFAULT_MAX_SCORE: u32 = 50;
const DEFAULT_FOOD_PLACEMENT_ATTEMPTS: u32 = 4_096;
const DEFAULT_RNG_SEED: u64 = 0x5eed_10c6_51a4_e000;
const CLASSIC_START_BODY: [Cell; 3] = [Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)];

const NANOS_PER_TENTH_SECOND: u64 = 100_000_000;

/// Largest grid accepted by [`Config::validate`], in cells.
pub const MAX_GRID_CELLS: usize = 1 << 16;

/// How the tick interval shrinks after each consumption.
///
/// Both modes compute `fraction = score / max_score` and, while the fraction
/// is below one, shorten the interval by `fraction` tenths of a second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedScaling {
    /// Integer division. The fraction is zero below `max_score`, so the
    /// interval never changes.
    #[default]
    Literal,
    /// Real division. Every consumption below `max_score` shortens the
    /// interval, never past the configured minimum.
    Continuous,
}

impl SpeedScaling {
    /// Computes the interval that follows a consumption at `score`.
    #[must_use]
    pub fn next_interval(
        self,
        current: Duration,
        score: u32,
        max_score: u32,
        minimum: Duration,
    ) -> Duration {
        if max_score == 0 || score >= max_score {
            return current;
        }

        let reduction_nanos = match self {
            Self::Literal => u64::from(score / max_score) * NANOS_PER_TENTH_SECOND,
            Self::Continuous => u64::from(score) * NANOS_PER_TENTH_SECOND / u64::from(max_score),
        };

        current
            .saturating_sub(Duration::from_nanos(reduction_nanos))
            .max(minimum)
    }
}

/// Configuration parameters required to construct a simulation session.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    grid: GridBounds,
    start_body: Vec<Cell>,
    initial_direction: Direction,
    tick_interval: Duration,
    min_tick_interval: Duration,
    max_score: u32,
    speed_scaling: SpeedScaling,
    food_placement_attempts: u32,
    rng_seed: u64,
}

impl Config {
    /// Configuration reproducing the classic game: a 39 × 21 grid, a three
    /// cell snake heading down from `(10, 10)`, and a 300 ms cadence.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            grid: GridBounds::CLASSIC,
            start_body: CLASSIC_START_BODY.to_vec(),
            initial_direction: Direction::Down,
            tick_interval: DEFAULT_TICK_INTERVAL,
            min_tick_interval: DEFAULT_MIN_TICK_INTERVAL,
            max_score: DEFAULT_MAX_SCORE,
            speed_scaling: SpeedScaling::Literal,
            food_placement_attempts: DEFAULT_FOOD_PLACEMENT_ATTEMPTS,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }

    /// Replaces the grid bounds.
    #[must_use]
    pub fn with_grid(mut self, grid: GridBounds) -> Self {
        self.grid = grid;
        self
    }

    /// Replaces the start body, head first.
    #[must_use]
    pub fn with_start_body(mut self, start_body: Vec<Cell>) -> Self {
        self.start_body = start_body;
        self
    }

    /// Replaces the heading the snake starts with.
    #[must_use]
    pub fn with_initial_direction(mut self, direction: Direction) -> Self {
        self.initial_direction = direction;
        self
    }

    /// Replaces the starting tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Replaces the floor applied when the interval shrinks.
    #[must_use]
    pub fn with_min_tick_interval(mut self, min_tick_interval: Duration) -> Self {
        self.min_tick_interval = min_tick_interval;
        self
    }

    /// Replaces the score used as the speed-scaling denominator.
    #[must_use]
    pub fn with_max_score(mut self, max_score: u32) -> Self {
        self.max_score = max_score;
        self
    }

    /// Replaces the speed-scaling mode.
    #[must_use]
    pub fn with_speed_scaling(mut self, speed_scaling: SpeedScaling) -> Self {
        self.speed_scaling = speed_scaling;
        self
    }

    /// Replaces the number of random samples tried before falling back to
    /// the explicit free-cell set.
    #[must_use]
    pub fn with_food_placement_attempts(mut self, attempts: u32) -> Self {
        self.food_placement_attempts = attempts;
        self
    }

    /// Replaces the seed of the food placement random source.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Grid bounds of the playing field.
    #[must_use]
    pub const fn grid(&self) -> GridBounds {
        self.grid
    }

    /// Cells occupied when a session starts, head first.
    #[must_use]
    pub fn start_body(&self) -> &[Cell] {
        &self.start_body
    }

    /// Heading the snake starts with.
    #[must_use]
    pub const fn initial_direction(&self) -> Direction {
        self.initial_direction
    }

    /// Interval between tick-driven moves when a session starts.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Shortest interval speed scaling may produce.
    #[must_use]
    pub const fn min_tick_interval(&self) -> Duration {
        self.min_tick_interval
    }

    /// Score used as the speed-scaling denominator.
    #[must_use]
    pub const fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Active speed-scaling mode.
    #[must_use]
    pub const fn speed_scaling(&self) -> SpeedScaling {
        self.speed_scaling
    }

    /// Random samples tried before falling back to the free-cell set.
    #[must_use]
    pub const fn food_placement_attempts(&self) -> u32 {
        self.food_placement_attempts
    }

    /// Seed of the food placement random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Checks that a session can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = self.grid.cell_count();
        if cells > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                cells,
                limit: MAX_GRID_CELLS,
            });
        }
        if self.start_body.is_empty() {
            return Err(ConfigError::EmptyStartBody);
        }
        if let Some(cell) = self
            .start_body
            .iter()
            .copied()
            .find(|cell| !self.grid.contains(*cell))
        {
            return Err(ConfigError::StartBodyOutOfBounds { cell });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.min_tick_interval.is_zero() || self.min_tick_interval > self.tick_interval {
            return Err(ConfigError::InvalidMinTickInterval {
                minimum: self.min_tick_interval,
                interval: self.tick_interval,
            });
        }
        if self.max_score == 0 {
            return Err(ConfigError::ZeroMaxScore);
        }
        if self.food_placement_attempts == 0 {
            return Err(ConfigError::ZeroFoodPlacementAttempts);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::classic()
    }
}

/// Reasons a configuration cannot produce a session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The snake needs at least one segment.
    #[error("start body must contain at least one cell")]
    EmptyStartBody,
    /// A start body cell lies outside the grid.
    #[error("start body cell ({}, {}) lies outside the grid", .cell.row(), .cell.column())]
    StartBodyOutOfBounds {
        /// Offending cell.
        cell: Cell,
    },
    /// The snake would never wait between moves.
    #[error("tick interval must be positive")]
    ZeroTickInterval,
    /// The interval floor is zero or above the starting interval.
    #[error("minimum tick interval {minimum:?} must be positive and at most {interval:?}")]
    InvalidMinTickInterval {
        /// Configured floor.
        minimum: Duration,
        /// Configured starting interval.
        interval: Duration,
    },
    /// The speed-scaling denominator is zero.
    #[error("max score must be positive")]
    ZeroMaxScore,
    /// Food placement would never sample a cell.
    #[error("food placement attempts must be positive")]
    ZeroFoodPlacementAttempts,
    /// The grid holds more cells than a session may allocate for.
    #[error("grid of {cells} cells exceeds the limit of {limit}")]
    GridTooLarge {
        /// Cells in the configured grid.
        cells: usize,
        /// Largest accepted cell count.
        limit: usize,
    },
}
