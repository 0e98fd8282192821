//! Board coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A file (column) on the chess board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(File::A),
            1 => Some(File::B),
            2 => Some(File::C),
            3 => Some(File::D),
            4 => Some(File::E),
            5 => Some(File::F),
            6 => Some(File::G),
            7 => Some(File::H),
            _ => None,
        }
    }

    /// Creates a file from a character ('a'-'h' or 'A'-'H').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(File::A),
            'B' => Some(File::B),
            'C' => Some(File::C),
            'D' => Some(File::D),
            'E' => Some(File::E),
            'F' => Some(File::F),
            'G' => Some(File::G),
            'H' => Some(File::H),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the upper-case letter.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the chess board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rank::R1),
            1 => Some(Rank::R2),
            2 => Some(Rank::R3),
            3 => Some(Rank::R4),
            4 => Some(Rank::R5),
            5 => Some(Rank::R6),
            6 => Some(Rank::R7),
            7 => Some(Rank::R8),
            _ => None,
        }
    }

    /// Creates a rank from a character ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Rank::R1),
            '2' => Some(Rank::R2),
            '3' => Some(Rank::R3),
            '4' => Some(Rank::R4),
            '5' => Some(Rank::R5),
            '6' => Some(Rank::R6),
            '7' => Some(Rank::R7),
            '8' => Some(Rank::R8),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A coordinate on the board, indexed 0-63.
///
/// Positions are indexed rank-major from White's side:
/// - A1 = 0, B1 = 1, ..., H1 = 7
/// - A2 = 8, ..., H8 = 63
///
/// This is also the order of the board snapshot tokens.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Position(u8);

macro_rules! positions {
    ($($name:ident = $file:ident $rank:ident),* $(,)?) => {
        $(pub const $name: Position = Position::new(File::$file, Rank::$rank);)*
    };
}

impl Position {
    /// Creates a position from file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Position(rank.index() * 8 + file.index())
    }

    /// Creates a position from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Position(index))
        } else {
            None
        }
    }

    /// Creates a position from signed file and rank indices, if on the board.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(Position((rank * 8 + file) as u8))
        }
    }

    /// Parses a position from coordinate notation (e.g., "e4" or "E4").
    pub const fn from_coordinate(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match File::from_char(bytes[0] as char) {
            Some(f) => f,
            None => return None,
        };
        let rank = match Rank::from_char(bytes[1] as char) {
            Some(r) => r,
            None => return None,
        };
        Some(Position::new(file, rank))
    }

    /// Iterates over all 64 positions in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64u8).map(Position)
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the file of this position.
    #[inline]
    pub const fn file(self) -> File {
        match File::from_index(self.0 % 8) {
            Some(f) => f,
            None => unreachable!(),
        }
    }

    /// Returns the rank of this position.
    #[inline]
    pub const fn rank(self) -> Rank {
        match Rank::from_index(self.0 / 8) {
            Some(r) => r,
            None => unreachable!(),
        }
    }

    /// Steps by the given file and rank deltas, returning `None` off the board.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Self::from_coords(
            self.file().index() as i8 + file_delta,
            self.rank().index() as i8 + rank_delta,
        )
    }

    #[inline]
    pub const fn same_rank(self, other: Position) -> bool {
        self.0 / 8 == other.0 / 8
    }

    #[inline]
    pub const fn same_file(self, other: Position) -> bool {
        self.0 % 8 == other.0 % 8
    }

    /// True if both positions lie on a common diagonal (and differ).
    #[inline]
    pub const fn same_diagonal(self, other: Position) -> bool {
        self.0 != other.0 && self.file_distance(other) == self.rank_distance(other)
    }

    #[inline]
    pub const fn file_distance(self, other: Position) -> u8 {
        (self.file().index() as i8 - other.file().index() as i8).unsigned_abs()
    }

    #[inline]
    pub const fn rank_distance(self, other: Position) -> u8 {
        (self.rank().index() as i8 - other.rank().index() as i8).unsigned_abs()
    }

    /// King-step distance: the larger of the file and rank distances.
    #[inline]
    pub const fn distance(self, other: Position) -> u8 {
        let files = self.file_distance(other);
        let ranks = self.rank_distance(other);
        if files > ranks {
            files
        } else {
            ranks
        }
    }

    /// True if `other` is one king step away.
    #[inline]
    pub const fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    #[inline]
    pub const fn is_knight_jump(self, other: Position) -> bool {
        let files = self.file_distance(other);
        let ranks = self.rank_distance(other);
        (files == 1 && ranks == 2) || (files == 2 && ranks == 1)
    }

    /// Returns the coordinate notation for this position, e.g. "D2".
    pub fn to_coordinate(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    positions! {
        A1 = A R1, B1 = B R1, C1 = C R1, D1 = D R1, E1 = E R1, F1 = F R1, G1 = G R1, H1 = H R1,
        A2 = A R2, B2 = B R2, C2 = C R2, D2 = D R2, E2 = E R2, F2 = F R2, G2 = G R2, H2 = H R2,
        A3 = A R3, B3 = B R3, C3 = C R3, D3 = D R3, E3 = E R3, F3 = F R3, G3 = G R3, H3 = H R3,
        A4 = A R4, B4 = B R4, C4 = C R4, D4 = D R4, E4 = E R4, F4 = F R4, G4 = G R4, H4 = H R4,
        A5 = A R5, B5 = B R5, C5 = C R5, D5 = D R5, E5 = E R5, F5 = F R5, G5 = G R5, H5 = H R5,
        A6 = A R6, B6 = B R6, C6 = C R6, D6 = D R6, E6 = E R6, F6 = F R6, G6 = G R6, H6 = H R6,
        A7 = A R7, B7 = B R7, C7 = C R7, D7 = D R7, E7 = E R7, F7 = F R7, G7 = G R7, H7 = H R7,
        A8 = A R8, B8 = B R8, C8 = C R8, D8 = D R8, E8 = E R8, F8 = F R8, G8 = G R8, H8 = H R8,
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_coordinate())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_coordinate()
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Position::from_coordinate(&s).ok_or_else(|| format!("invalid position '{}'", s))
    }
}
