#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic steering system that drives the snake toward the food.
//!
//! An accepted turn moves the snake immediately and the following tick moves it
//! again, while food is only eaten by tick-driven moves. The planner therefore
//! searches over tick positions: keeping the heading costs one step, turning
//! costs two steps along the new heading.

use std::collections::VecDeque;

use long_snake_core::{
    AdvanceTrigger, Cell, Command, Direction, Event, GridBounds, SnakeSnapshot,
};

/// Pure system that requests direction changes along a shortest path to food.
#[derive(Debug, Default)]
pub struct Autopilot {
    scratch_frontier: VecDeque<usize>,
    scratch_first_heading: Vec<Option<Direction>>,
}

impl Autopilot {
    /// Creates an autopilot with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits steering commands for the snake.
    ///
    /// Planning only happens after events that leave the head on a tick
    /// position: session start, food placement, or a tick-driven advance.
    /// At most one command is emitted per call.
    pub fn handle(
        &mut self,
        events: &[Event],
        snapshot: Option<&SnakeSnapshot>,
        grid: GridBounds,
        out: &mut Vec<Command>,
    ) {
        let replan = events.iter().any(|event| {
            matches!(
                event,
                Event::SessionStarted { .. }
                    | Event::FoodPlaced { .. }
                    | Event::SnakeAdvanced {
                        trigger: AdvanceTrigger::Tick,
                        ..
                    }
            )
        });
        if !replan {
            return;
        }

        let Some(snapshot) = snapshot else {
            return;
        };
        let Some(food) = snapshot.food else {
            return;
        };

        if let Some(heading) = self.first_heading(snapshot.head, snapshot.direction, food, grid) {
            if heading != snapshot.direction {
                out.push(Command::RequestDirectionChange { direction: heading });
            }
        }
    }

    fn first_heading(
        &mut self,
        head: Cell,
        direction: Direction,
        food: Cell,
        grid: GridBounds,
    ) -> Option<Direction> {
        if head == food {
            return None;
        }
        let root = state_index(grid, head, direction)?;

        self.scratch_frontier.clear();
        self.scratch_first_heading.clear();
        self.scratch_first_heading
            .resize(grid.cell_count() * Direction::ALL.len(), None);
        self.scratch_first_heading[root] = Some(direction);
        self.scratch_frontier.push_back(root);

        while let Some(state) = self.scratch_frontier.pop_front() {
            let (cell, heading) = decode_state(grid, state)?;
            let inherited = self.scratch_first_heading[state];

            for next_heading in successors(heading) {
                let mut next = grid.wrap(cell.offset(next_heading));
                if next_heading != heading {
                    next = grid.wrap(next.offset(next_heading));
                }
                let first = if state == root {
                    Some(next_heading)
                } else {
                    inherited
                };

                if next == food {
                    return first;
                }

                let Some(index) = state_index(grid, next, next_heading) else {
                    continue;
                };
                if self.scratch_first_heading[index].is_none() {
                    self.scratch_first_heading[index] = first;
                    self.scratch_frontier.push_back(index);
                }
            }
        }

        None
    }
}

fn successors(heading: Direction) -> impl Iterator<Item = Direction> {
    std::iter::once(heading).chain(
        Direction::ALL
            .into_iter()
            .filter(move |candidate| *candidate != heading && *candidate != heading.opposite()),
    )
}

fn heading_slot(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

fn state_index(grid: GridBounds, cell: Cell, direction: Direction) -> Option<usize> {
    grid.index(cell)
        .map(|index| index * Direction::ALL.len() + heading_slot(direction))
}

fn decode_state(grid: GridBounds, state: usize) -> Option<(Cell, Direction)> {
    let headings = Direction::ALL.len();
    let direction = Direction::ALL
        .into_iter()
        .find(|direction| heading_slot(*direction) == state % headings)?;
    let index = state / headings;
    let columns = usize::try_from(grid.columns()).ok()?;
    let row = i32::try_from(index / columns).ok()?;
    let column = i32::try_from(index % columns).ok()?;
    Some((Cell::new(row, column), direction))
}
