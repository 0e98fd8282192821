//! A single cell of the board.

use crate::{Color, Piece, Position};
use serde::{Deserialize, Serialize};

/// A position together with the piece standing on it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub position: Position,
    pub piece: Option<Piece>,
}

impl Square {
    #[inline]
    pub const fn new(position: Position, piece: Option<Piece>) -> Self {
        Square { position, piece }
    }

    #[inline]
    pub const fn empty(position: Position) -> Self {
        Square::new(position, None)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    /// True if the square holds a piece of the given color.
    #[inline]
    pub fn holds(&self, color: Color) -> bool {
        self.piece.is_some_and(|p| p.color == color)
    }

    /// True if the square holds a piece hostile to `piece`.
    #[inline]
    pub fn holds_opponent_of(&self, piece: Piece) -> bool {
        self.piece.is_some_and(|p| p.is_opponent_of(piece))
    }

    /// The same square with its piece removed.
    #[inline]
    pub const fn vacated(self) -> Self {
        Square::empty(self.position)
    }

    /// The same square with `piece` placed on it, replacing any occupant.
    #[inline]
    pub const fn occupied_by(self, piece: Piece) -> Self {
        Square::new(self.position, Some(piece))
    }
}
