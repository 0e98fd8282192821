//! Move representation.

use crate::{Piece, Position, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece going from one position to another.
///
/// `captured` is the square whose occupant was taken. It equals the target
/// square for ordinary captures, and the passed pawn's square for en passant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Square>,
}

impl Move {
    /// Creates a quiet move.
    #[inline]
    pub const fn new(piece: Piece, from: Position, to: Position) -> Self {
        Move {
            piece,
            from,
            to,
            captured: None,
        }
    }

    /// Creates a capturing move.
    #[inline]
    pub const fn capture(piece: Piece, from: Position, to: Position, captured: Square) -> Self {
        Move {
            piece,
            from,
            to,
            captured: Some(captured),
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// The captured piece, if any.
    #[inline]
    pub fn captured_piece(&self) -> Option<Piece> {
        self.captured.and_then(|square| square.piece)
    }

    /// True if this is a pawn advancing two ranks.
    #[inline]
    pub fn is_double_step(&self) -> bool {
        self.piece.kind == crate::PieceType::Pawn
            && self.from.rank().index() == self.piece.color.pawn_rank()
            && self.from.rank_distance(self.to) == 2
    }

    /// Coordinate notation, e.g. "D2D4".
    pub fn to_coordinate(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured_piece() {
            Some(taken) => write!(f, "Move({} {}x{})", self.piece, self.to_coordinate(), taken),
            None => write!(f, "Move({} {})", self.piece, self.to_coordinate()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}
