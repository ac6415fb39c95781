#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Long Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that renderers,
//! score displays, and persistence systems react to. Grid geometry lives in
//! [`GridBounds`], which is pure and freely copied between collaborators.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{Config, ConfigError, SpeedScaling, MAX_GRID_CELLS};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Long Snake.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a new session using the world's configuration.
    Start,
    /// Delivers the driving clock's current time.
    Tick {
        /// Time elapsed since the clock driver's origin. Never decreases.
        now: Duration,
    },
    /// Requests that the snake change heading.
    RequestDirectionChange {
        /// Heading requested by the input source.
        direction: Direction,
    },
    /// Places the food on an explicit cell, replacing any current food.
    PlaceFood {
        /// Cell that should hold the food.
        cell: Cell,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a session started and the snake occupies its start body.
    SessionStarted {
        /// Occupied cells, head first.
        body: Vec<Cell>,
        /// Heading the snake starts with.
        direction: Direction,
        /// Best score known when the session started.
        best_score: u32,
    },
    /// Reports that a start request arrived while a session was running.
    SessionAlreadyRunning,
    /// Confirms that the next movement deadline was armed.
    DeadlineArmed {
        /// Clock value at or after which the next tick moves the snake.
        deadline: Duration,
    },
    /// Confirms that the snake moved by one cell.
    SnakeAdvanced {
        /// Cell now occupied by the head.
        head: Cell,
        /// Former tail cell when it is no longer occupied by any segment.
        vacated: Option<Cell>,
        /// Reason the snake moved.
        trigger: AdvanceTrigger,
    },
    /// Confirms that the snake's heading changed.
    DirectionChanged {
        /// Heading before the change.
        from: Direction,
        /// Heading after the change.
        to: Direction,
    },
    /// Reports that a direction change request was ignored.
    DirectionChangeRejected {
        /// Heading requested by the input source.
        requested: Direction,
        /// Heading that remains active.
        current: Direction,
        /// Specific reason the request was ignored.
        reason: DirectionRejection,
    },
    /// Confirms that food was placed on the grid.
    FoodPlaced {
        /// Cell holding the food.
        cell: Cell,
    },
    /// Reports that every cell is occupied, leaving no room for food.
    FoodUnavailable,
    /// Reports that an explicit food placement was ignored.
    FoodPlacementRejected {
        /// Cell provided in the placement request.
        cell: Cell,
        /// Specific reason the placement failed.
        reason: FoodPlacementError,
    },
    /// Confirms that the head consumed the food.
    FoodConsumed {
        /// Cell where the food was consumed.
        cell: Cell,
    },
    /// Announces the updated score after a consumption.
    ScoreChanged {
        /// Score accumulated during the session.
        score: u32,
    },
    /// Announces that the session score surpassed the best score.
    BestScoreRaised {
        /// Candidate value the persistence store should record.
        score: u32,
    },
    /// Confirms that the snake grew by one segment.
    SnakeGrew {
        /// Number of segments after growing.
        length: usize,
    },
    /// Announces that the movement cadence changed.
    TickIntervalChanged {
        /// Duration between successive tick-driven moves.
        interval: Duration,
    },
}

/// Lifecycle phase of a simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The world was constructed but no session has started yet.
    NotStarted,
    /// A session is running. No transition leaves this phase.
    Running,
}

/// Reason the snake advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvanceTrigger {
    /// The driving clock reached the movement deadline.
    Tick,
    /// An accepted direction change moved the snake immediately.
    Turn,
}

/// Reasons a direction change request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionRejection {
    /// No session is running yet.
    NotRunning,
    /// The requested heading equals the current heading.
    Redundant,
    /// The requested heading reverses the snake onto itself.
    Reversal,
}

/// Reasons an explicit food placement may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodPlacementError {
    /// No session is running yet.
    NotRunning,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is occupied by the snake.
    Occupied,
}

/// Cardinal headings available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every heading in declaration order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step applied to `(row, column)` when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Heading pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Cells produced by [`Cell::offset`] may lie one step outside the grid until
/// [`GridBounds::wrap`] is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: i32,
    column: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Neighbouring cell one step away in the provided direction, unwrapped.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (rows, columns) = direction.delta();
        Self {
            row: self.row.saturating_add(rows),
            column: self.column.saturating_add(columns),
        }
    }
}

/// Inclusive bounds of the playing field.
///
/// Rows span `0..=max_row` and columns span `0..=max_column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
    max_row: i32,
    max_column: i32,
}

impl GridBounds {
    /// The classic 39 × 21 playing field.
    pub const CLASSIC: GridBounds = GridBounds::new(38, 20);

    /// Creates bounds from the largest valid row and column indices.
    #[must_use]
    pub const fn new(max_row: u16, max_column: u16) -> Self {
        Self {
            max_row: max_row as i32,
            max_column: max_column as i32,
        }
    }

    /// Largest valid row index.
    #[must_use]
    pub const fn max_row(&self) -> i32 {
        self.max_row
    }

    /// Largest valid column index.
    #[must_use]
    pub const fn max_column(&self) -> i32 {
        self.max_column
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.max_row as u32 + 1
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.max_column as u32 + 1
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows() as usize * self.columns() as usize
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.row <= self.max_row
            && cell.column >= 0
            && cell.column <= self.max_column
    }

    /// Brings a cell that stepped off the grid back onto the opposite edge.
    ///
    /// Only the first out-of-range coordinate is corrected, checking the row
    /// before the column. Movement changes a single axis per step, so heads
    /// produced by [`Cell::offset`] always land inside the grid.
    #[must_use]
    pub const fn wrap(&self, cell: Cell) -> Cell {
        let Cell { row, column } = cell;
        if row > self.max_row {
            Cell::new(0, column)
        } else if row < 0 {
            Cell::new(self.max_row, column)
        } else if column > self.max_column {
            Cell::new(row, 0)
        } else if column < 0 {
            Cell::new(row, self.max_column)
        } else {
            cell
        }
    }

    /// Dense row-major index of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let width = usize::try_from(self.columns()).ok()?;
        Some(row * width + column)
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let max_row = self.max_row;
        let max_column = self.max_column;
        (0..=max_row)
            .flat_map(move |row| (0..=max_column).map(move |column| Cell::new(row, column)))
    }
}

/// Immutable representation of the snake used by systems and adapters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSnapshot {
    /// Cell occupied by the head.
    pub head: Cell,
    /// Current heading.
    pub direction: Direction,
    /// Cell holding the food, if any.
    pub food: Option<Cell>,
    /// Number of body segments.
    pub length: usize,
    /// Score accumulated during the session.
    pub score: u32,
}

/// Read-only view into the dense body occupancy grid.
///
/// Each entry counts the body segments stacked on a cell; growth briefly
/// duplicates the tail and the body may cross itself.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    counts: &'a [u16],
    bounds: GridBounds,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided count slice.
    #[must_use]
    pub fn new(counts: &'a [u16], bounds: GridBounds) -> Self {
        Self { counts, bounds }
    }

    /// Number of body segments occupying the cell.
    #[must_use]
    pub fn segments_at(&self, cell: Cell) -> u16 {
        self.bounds
            .index(cell)
            .and_then(|index| self.counts.get(index).copied())
            .unwrap_or(0)
    }

    /// Reports whether no body segment occupies the cell.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.segments_at(cell) == 0
    }

    /// Iterator over every unoccupied cell in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + 'a {
        let counts = self.counts;
        self.bounds
            .cells()
            .zip(counts.iter())
            .filter(|(_, count)| **count == 0)
            .map(|(cell, _)| cell)
    }
}
