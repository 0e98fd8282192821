//! Chess piece representation.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PieceType {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Pawn,
    ];

    /// Upper-case name used in snapshot tokens.
    pub const fn token(self) -> &'static str {
        match self {
            PieceType::King => "KING",
            PieceType::Queen => "QUEEN",
            PieceType::Rook => "ROOK",
            PieceType::Bishop => "BISHOP",
            PieceType::Knight => "KNIGHT",
            PieceType::Pawn => "PAWN",
        }
    }

    /// Parses the upper-case token name.
    pub fn from_token(s: &str) -> Option<Self> {
        PieceType::ALL.into_iter().find(|kind| kind.token() == s)
    }

    const fn letter(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::King => "King",
            PieceType::Queen => "Queen",
            PieceType::Rook => "Rook",
            PieceType::Bishop => "Bishop",
            PieceType::Knight => "Knight",
            PieceType::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}

/// A piece of a given type and color.
///
/// Pieces carry no identity: two white pawns are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Snapshot token, e.g. `WHITE_PAWN`.
    pub fn token(self) -> String {
        format!("{}_{}", self.color.token(), self.kind.token())
    }

    /// Parses a snapshot token such as `BLACK_KNIGHT`.
    pub fn from_token(s: &str) -> Option<Self> {
        let (color, kind) = s.split_once('_')?;
        Some(Piece::new(
            PieceType::from_token(kind)?,
            Color::from_token(color)?,
        ))
    }

    /// Diagram letter: upper case for White, lower case for Black.
    pub const fn symbol(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    #[inline]
    pub fn is_opponent_of(self, other: Piece) -> bool {
        self.color != other.color
    }

    pub const WHITE_KING: Piece = Piece::new(PieceType::King, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceType::Queen, Color::White);
    pub const WHITE_ROOK: Piece = Piece::new(PieceType::Rook, Color::White);
    pub const WHITE_BISHOP: Piece = Piece::new(PieceType::Bishop, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceType::Knight, Color::White);
    pub const WHITE_PAWN: Piece = Piece::new(PieceType::Pawn, Color::White);
    pub const BLACK_KING: Piece = Piece::new(PieceType::King, Color::Black);
    pub const BLACK_QUEEN: Piece = Piece::new(PieceType::Queen, Color::Black);
    pub const BLACK_ROOK: Piece = Piece::new(PieceType::Rook, Color::Black);
    pub const BLACK_BISHOP: Piece = Piece::new(PieceType::Bishop, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceType::Knight, Color::Black);
    pub const BLACK_PAWN: Piece = Piece::new(PieceType::Pawn, Color::Black);
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.token()
    }
}

impl TryFrom<String> for Piece {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Piece::from_token(&s).ok_or_else(|| format!("unknown piece token '{}'", s))
    }
}
