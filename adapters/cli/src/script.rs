use std::str::FromStr;

use long_snake_core::Direction;
use thiserror::Error;

const ENTRY_DELIMITER: char = ',';
const FIELD_DELIMITER: char = ':';

/// Direction changes requested at fixed frame numbers, e.g. `12:L,40:U`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TurnScript {
    turns: Vec<(u32, Direction)>,
}

impl TurnScript {
    /// Directions requested on the provided frame, in script order.
    pub(crate) fn turns_at(&self, frame: u32) -> impl Iterator<Item = Direction> + '_ {
        self.turns
            .iter()
            .filter(move |(at, _)| *at == frame)
            .map(|(_, direction)| *direction)
    }

    /// Number of scripted direction changes.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.turns.len()
    }
}

impl FromStr for TurnScript {
    type Err = TurnScriptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut turns = trimmed
            .split(ENTRY_DELIMITER)
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?;
        turns.sort_by_key(|(frame, _)| *frame);
        Ok(Self { turns })
    }
}

fn parse_entry(entry: &str) -> Result<(u32, Direction), TurnScriptError> {
    let entry = entry.trim();
    let (frame, direction) = entry
        .split_once(FIELD_DELIMITER)
        .ok_or_else(|| TurnScriptError::MissingDelimiter(entry.to_owned()))?;
    let frame = frame
        .trim()
        .parse::<u32>()
        .map_err(|_| TurnScriptError::InvalidFrame(frame.trim().to_owned()))?;
    Ok((frame, parse_direction(direction.trim())?))
}

fn parse_direction(value: &str) -> Result<Direction, TurnScriptError> {
    match value.to_ascii_lowercase().as_str() {
        "u" | "up" => Ok(Direction::Up),
        "d" | "down" => Ok(Direction::Down),
        "l" | "left" => Ok(Direction::Left),
        "r" | "right" => Ok(Direction::Right),
        _ => Err(TurnScriptError::UnknownDirection(value.to_owned())),
    }
}

/// Errors raised while parsing a turn script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TurnScriptError {
    /// An entry lacks the `frame:direction` separator.
    #[error("turn `{0}` must look like FRAME:DIRECTION")]
    MissingDelimiter(String),
    /// The frame part is not a non-negative integer.
    #[error("`{0}` is not a frame number")]
    InvalidFrame(String),
    /// The direction part is not one of U, D, L, R.
    #[error("`{0}` is not a direction (expected U, D, L or R)")]
    UnknownDirection(String),
}
