//! Coordinate input parsing.
//!
//! Accepts plain coordinate moves (`d2d4`, `d2-d4`, `d2 d4`) and the two
//! castling phrases (`castling short`, `castling long`). No algebraic notation.

use crate::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing coordinate input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid position: '{0}'")]
    InvalidPosition(String),

    #[error("invalid move: '{0}'")]
    InvalidMove(String),

    #[error("unrecognised input: '{0}'")]
    UnrecognisedInput(String),
}

/// Which side of the board a castling goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CastlingSide {
    /// King side (O-O).
    Short,
    /// Queen side (O-O-O).
    Long,
}

impl std::fmt::Display for CastlingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastlingSide::Short => write!(f, "short"),
            CastlingSide::Long => write!(f, "long"),
        }
    }
}

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move { from: Position, to: Position },
    Castling(CastlingSide),
}

/// Parses a single position such as `e4`.
pub fn parse_position(s: &str) -> Result<Position, NotationError> {
    Position::from_coordinate(s.trim()).ok_or_else(|| NotationError::InvalidPosition(s.to_string()))
}

/// Parses a coordinate move: `d2d4`, `d2-d4` or `d2 d4`.
pub fn parse_move(s: &str) -> Result<(Position, Position), NotationError> {
    let trimmed = s.trim();
    if !trimmed.is_ascii() {
        return Err(NotationError::InvalidMove(s.to_string()));
    }
    let (from, to) = match trimmed.len() {
        4 => (&trimmed[0..2], &trimmed[2..4]),
        5 if matches!(trimmed.as_bytes()[2], b'-' | b' ') => (&trimmed[0..2], &trimmed[3..5]),
        _ => return Err(NotationError::InvalidMove(s.to_string())),
    };
    Ok((parse_position(from)?, parse_position(to)?))
}

/// Parses either a castling phrase or a coordinate move.
pub fn parse_input(s: &str) -> Result<Input, NotationError> {
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.as_str() {
        "castlingshort" => return Ok(Input::Castling(CastlingSide::Short)),
        "castlinglong" => return Ok(Input::Castling(CastlingSide::Long)),
        _ => {}
    }

    match parse_move(s) {
        Ok((from, to)) => Ok(Input::Move { from, to }),
        Err(_) => Err(NotationError::UnrecognisedInput(s.trim().to_string())),
    }
}
