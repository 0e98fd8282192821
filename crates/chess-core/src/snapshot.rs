//! Board snapshot parsing and serialization.
//!
//! A snapshot is 64 comma-separated tokens, one per position in index order
//! (A1, B1, ..., H1, A2, ..., H8). An occupied square is written as its piece
//! token (`WHITE_ROOK`), an empty one as [`Snapshot::EMPTY_TOKEN`].

use crate::{Piece, Position};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing snapshots.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("invalid snapshot: expected 64 tokens, got {0}")]
    InvalidTokenCount(usize),

    #[error("invalid snapshot token '{token}' at {position}")]
    UnknownToken { position: Position, token: String },
}

/// A parsed piece placement, indexed by [`Position::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    placement: [Option<Piece>; 64],
}

impl Snapshot {
    /// Token marking an unoccupied square.
    pub const EMPTY_TOKEN: &'static str = "X";

    pub const fn new(placement: [Option<Piece>; 64]) -> Self {
        Snapshot { placement }
    }

    /// Parses a snapshot string.
    ///
    /// Whitespace around tokens is ignored, so snapshots may be wrapped one
    /// rank per line.
    pub fn parse(s: &str) -> Result<Self, SnapshotError> {
        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
        if tokens.len() != 64 {
            return Err(SnapshotError::InvalidTokenCount(tokens.len()));
        }

        let mut placement = [None; 64];
        for (position, token) in Position::all().zip(tokens) {
            placement[position.index() as usize] = match token {
                Self::EMPTY_TOKEN => None,
                other => Some(Piece::from_token(other).ok_or_else(|| {
                    SnapshotError::UnknownToken {
                        position,
                        token: other.to_string(),
                    }
                })?),
            };
        }

        Ok(Snapshot { placement })
    }

    /// The piece on `position`, if any.
    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        self.placement[position.index() as usize]
    }

    pub fn placement(&self) -> &[Option<Piece>; 64] {
        &self.placement
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, piece) in self.placement.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match piece {
                Some(piece) => write!(f, "{}", piece.token())?,
                None => f.write_str(Self::EMPTY_TOKEN)?,
            }
        }
        Ok(())
    }
}
