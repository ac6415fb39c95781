#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Long Snake adapters.

use anyhow::Result as AnyResult;
use long_snake_core::{Cell, Direction, Event, GridBounds};
use std::{error::Error, fmt};

/// Glyphs used by text backends to draw each kind of cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    empty: char,
    body: char,
    head: char,
    food: char,
}

impl Palette {
    /// Default glyph set used by the command-line adapter.
    pub const CLASSIC: Self = Self {
        empty: '.',
        body: 'o',
        head: '@',
        food: '*',
    };

    /// Creates a palette, rejecting glyph sets that would make two kinds of
    /// cell indistinguishable.
    pub fn new(empty: char, body: char, head: char, food: char) -> Result<Self, RenderingError> {
        let glyphs = [empty, body, head, food];
        for (index, glyph) in glyphs.iter().enumerate() {
            if glyphs[index + 1..].contains(glyph) {
                return Err(RenderingError::DuplicateGlyph { glyph: *glyph });
            }
        }
        Ok(Self {
            empty,
            body,
            head,
            food,
        })
    }

    /// Glyph drawn for the provided kind of cell.
    #[must_use]
    pub const fn glyph(&self, kind: CellKind) -> char {
        match kind {
            CellKind::Empty => self.empty,
            CellKind::Body => self.body,
            CellKind::Head => self.head,
            CellKind::Food => self.food,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Classification of a single grid cell for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Nothing occupies the cell.
    Empty,
    /// A non-head body segment occupies the cell.
    Body,
    /// The head occupies the cell.
    Head,
    /// Food lies on the cell and no segment covers it.
    Food,
}

/// Scene description of a single session frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Bounds of the playing field.
    pub grid: GridBounds,
    /// Occupied cells in movement order, head first.
    pub body: Vec<Cell>,
    /// Current heading of the snake.
    pub direction: Direction,
    /// Food position, if any.
    pub food: Option<Cell>,
    /// Score of the running session.
    pub score: u32,
    /// Highest score known to the session.
    pub best_score: u32,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        grid: GridBounds,
        body: Vec<Cell>,
        direction: Direction,
        food: Option<Cell>,
        score: u32,
        best_score: u32,
    ) -> Self {
        Self {
            grid,
            body,
            direction,
            food,
            score,
            best_score,
        }
    }

    /// Classifies the provided cell. Segments take precedence over food.
    #[must_use]
    pub fn cell_kind(&self, cell: Cell) -> CellKind {
        if self.body.first() == Some(&cell) {
            CellKind::Head
        } else if self.body.contains(&cell) {
            CellKind::Body
        } else if self.food == Some(cell) {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }

    /// Draws the scene as one string per grid row.
    #[must_use]
    pub fn text_rows(&self, palette: &Palette) -> Vec<String> {
        (0..=self.grid.max_row())
            .map(|row| {
                (0..=self.grid.max_column())
                    .map(|column| palette.glyph(self.cell_kind(Cell::new(row, column))))
                    .collect()
            })
            .collect()
    }
}

/// Reports whether a batch of world events changed anything a backend draws.
#[must_use]
pub fn requires_redraw(events: &[Event]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            Event::SessionStarted { .. }
                | Event::SnakeAdvanced { .. }
                | Event::FoodPlaced { .. }
                | Event::FoodUnavailable
                | Event::ScoreChanged { .. }
                | Event::BestScoreRaised { .. }
                | Event::SnakeGrew { .. }
        )
    })
}

/// Rendering backend capable of presenting Long Snake scenes.
pub trait RenderingBackend {
    /// Presents the provided scene. Backends decide how much of it to redraw.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Two cell kinds would share a glyph.
    DuplicateGlyph {
        /// Glyph used more than once.
        glyph: char,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGlyph { glyph } => {
                write!(f, "glyph {glyph:?} is assigned to more than one cell kind")
            }
        }
    }
}

impl Error for RenderingError {}
