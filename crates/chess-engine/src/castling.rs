//! Castling geometry and rights.

use chess_core::{CastlingSide, Color, File, Move, Piece, PieceType, Position, Rank};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Board;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CastlingError {
    #[error("{color} cannot castle {side}: king or rook missing, or path blocked")]
    WrongSetup { color: Color, side: CastlingSide },
}

/// A castling of one color to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castling {
    pub side: CastlingSide,
    pub color: Color,
}

impl Castling {
    pub const fn new(side: CastlingSide, color: Color) -> Self {
        Castling { side, color }
    }

    fn on_back_rank(&self, file: File) -> Position {
        Position::new(file, Rank::ALL[self.color.back_rank() as usize])
    }

    /// E to G for a short castling, E to C for a long one.
    pub fn king_move(&self) -> Move {
        let to = match self.side {
            CastlingSide::Short => File::G,
            CastlingSide::Long => File::C,
        };
        Move::new(
            Piece::new(PieceType::King, self.color),
            self.on_back_rank(File::E),
            self.on_back_rank(to),
        )
    }

    /// H to F for a short castling, A to D for a long one.
    pub fn rook_move(&self) -> Move {
        let (from, to) = match self.side {
            CastlingSide::Short => (File::H, File::F),
            CastlingSide::Long => (File::A, File::D),
        };
        Move::new(
            Piece::new(PieceType::Rook, self.color),
            self.on_back_rank(from),
            self.on_back_rank(to),
        )
    }

    /// Squares between king and rook that must be empty.
    pub fn between(&self) -> impl Iterator<Item = Position> + '_ {
        let files: &[File] = match self.side {
            CastlingSide::Short => &[File::F, File::G],
            CastlingSide::Long => &[File::B, File::C, File::D],
        };
        files.iter().map(move |&file| self.on_back_rank(file))
    }
}

/// Relocates king and rook for `castling`.
///
/// Requires the king on its home square, the rook on its corner, and every
/// square between them empty. Whether the king passes through an attacked
/// square is not considered. The resulting board records the king move as
/// its last move.
pub(crate) fn resolve(board: &Board, castling: Castling) -> Result<Board, CastlingError> {
    let king = castling.king_move();
    let rook = castling.rook_move();

    let in_place = board.piece_at(king.from) == Some(king.piece)
        && board.piece_at(rook.from) == Some(rook.piece);
    let path_clear = castling.between().all(|p| board.square(p).is_empty());
    if !(in_place && path_clear) {
        return Err(CastlingError::WrongSetup {
            color: castling.color,
            side: castling.side,
        });
    }

    Ok(board.relocated(king).relocated(rook).with_last_move(king))
}

/// Which castlings each color may still perform.
///
/// Rights only ever go from held to lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_short: bool,
    pub white_long: bool,
    pub black_short: bool,
    pub black_long: bool,
}

impl CastlingRights {
    pub const ALL: Self = CastlingRights {
        white_short: true,
        white_long: true,
        black_short: true,
        black_long: true,
    };

    pub const NONE: Self = CastlingRights {
        white_short: false,
        white_long: false,
        black_short: false,
        black_long: false,
    };

    pub const fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        match (color, side) {
            (Color::White, CastlingSide::Short) => self.white_short,
            (Color::White, CastlingSide::Long) => self.white_long,
            (Color::Black, CastlingSide::Short) => self.black_short,
            (Color::Black, CastlingSide::Long) => self.black_long,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastlingSide) {
        let right = match (color, side) {
            (Color::White, CastlingSide::Short) => &mut self.white_short,
            (Color::White, CastlingSide::Long) => &mut self.white_long,
            (Color::Black, CastlingSide::Short) => &mut self.black_short,
            (Color::Black, CastlingSide::Long) => &mut self.black_long,
        };
        *right = false;
    }

    /// Sides `color` may still castle to.
    pub fn held(&self, color: Color) -> impl Iterator<Item = CastlingSide> + '_ {
        [CastlingSide::Short, CastlingSide::Long]
            .into_iter()
            .filter(move |&side| self.can_castle(color, side))
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// The right tied to a rook's home corner: A1 is white long, H8 black short.
pub fn rook_home(position: Position) -> Option<(Color, CastlingSide)> {
    match position {
        Position::A1 => Some((Color::White, CastlingSide::Long)),
        Position::H1 => Some((Color::White, CastlingSide::Short)),
        Position::A8 => Some((Color::Black, CastlingSide::Long)),
        Position::H8 => Some((Color::Black, CastlingSide::Short)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn back_ranks_only() -> Board {
        Board::with_pieces(&[
            (Position::A1, Piece::WHITE_ROOK),
            (Position::E1, Piece::WHITE_KING),
            (Position::H1, Piece::WHITE_ROOK),
            (Position::A8, Piece::BLACK_ROOK),
            (Position::E8, Piece::BLACK_KING),
            (Position::H8, Piece::BLACK_ROOK),
        ])
    }

    #[test]
    fn geometry() {
        let short = Castling::new(CastlingSide::Short, Color::White);
        assert_eq!((short.king_move().from, short.king_move().to), (Position::E1, Position::G1));
        assert_eq!((short.rook_move().from, short.rook_move().to), (Position::H1, Position::F1));
        assert_eq!(short.between().collect::<Vec<_>>(), vec![Position::F1, Position::G1]);

        let long = Castling::new(CastlingSide::Long, Color::Black);
        assert_eq!((long.king_move().from, long.king_move().to), (Position::E8, Position::C8));
        assert_eq!((long.rook_move().from, long.rook_move().to), (Position::A8, Position::D8));
        assert_eq!(
            long.between().collect::<Vec<_>>(),
            vec![Position::B8, Position::C8, Position::D8]
        );
    }

    #[test]
    fn short_castling() {
        let castling = Castling::new(CastlingSide::Short, Color::White);
        let board = resolve(&back_ranks_only(), castling).unwrap();
        assert_eq!(board.piece_at(Position::G1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Position::F1), Some(Piece::WHITE_ROOK));
        assert_eq!(board.piece_at(Position::E1), None);
        assert_eq!(board.piece_at(Position::H1), None);
        assert_eq!(board.piece_at(Position::A1), Some(Piece::WHITE_ROOK));
        assert_eq!(
            board.last_move(),
            Some(&Move::new(Piece::WHITE_KING, Position::E1, Position::G1))
        );
    }

    #[test]
    fn long_castling() {
        let castling = Castling::new(CastlingSide::Long, Color::Black);
        let board = resolve(&back_ranks_only(), castling).unwrap();
        assert_eq!(board.piece_at(Position::C8), Some(Piece::BLACK_KING));
        assert_eq!(board.piece_at(Position::D8), Some(Piece::BLACK_ROOK));
        assert_eq!(board.piece_at(Position::A8), None);
        assert_eq!(board.piece_at(Position::E8), None);
    }

    #[test]
    fn blocked_path() {
        let board = Board::opening();
        for color in Color::ALL {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                assert_eq!(
                    resolve(&board, Castling::new(side, color)),
                    Err(CastlingError::WrongSetup { color, side })
                );
            }
        }
    }

    #[test]
    fn missing_rook() {
        let board = Board::with_pieces(&[(Position::E1, Piece::WHITE_KING)]);
        assert!(resolve(&board, Castling::new(CastlingSide::Short, Color::White)).is_err());
    }

    #[test]
    fn king_first_and_rook_first_agree() {
        let board = back_ranks_only();
        for color in Color::ALL {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                let castling = Castling::new(side, color);
                let king_first = board
                    .relocated(castling.king_move())
                    .relocated(castling.rook_move());
                let rook_first = board
                    .relocated(castling.rook_move())
                    .relocated(castling.king_move());
                assert_eq!(king_first.squares(), rook_first.squares());
                assert_eq!(
                    resolve(&board, castling).unwrap().squares(),
                    king_first.squares()
                );
            }
        }
    }

    #[test]
    fn rights() {
        let mut rights = CastlingRights::ALL;
        assert_eq!(rights.held(Color::White).count(), 2);

        rights.revoke(Color::White, CastlingSide::Short);
        assert!(!rights.can_castle(Color::White, CastlingSide::Short));
        assert!(rights.can_castle(Color::White, CastlingSide::Long));
        assert!(rights.can_castle(Color::Black, CastlingSide::Short));
        assert_eq!(rights.held(Color::White).collect::<Vec<_>>(), vec![CastlingSide::Long]);

        rights.revoke(Color::White, CastlingSide::Short);
        rights.revoke(Color::White, CastlingSide::Long);
        rights.revoke(Color::Black, CastlingSide::Short);
        rights.revoke(Color::Black, CastlingSide::Long);
        assert_eq!(rights, CastlingRights::NONE);
    }

    #[test]
    fn rook_homes() {
        assert_eq!(rook_home(Position::A1), Some((Color::White, CastlingSide::Long)));
        assert_eq!(rook_home(Position::H8), Some((Color::Black, CastlingSide::Short)));
        assert_eq!(rook_home(Position::E1), None);
    }
}
