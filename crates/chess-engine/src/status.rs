//! Check and checkmate detection.

use chess_core::Color;
use serde::{Deserialize, Serialize};

use crate::movegen::legal_moves;
use crate::Board;

/// Status of a board after a move, seen from the side that did not move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStatus {
    pub check: bool,
    pub checkmate: bool,
    pub winner: Option<Color>,
}

/// True if any piece of the other color has a generated move onto the king
/// of `color`. A board without that king is never in check.
pub fn is_check(color: Color, board: &Board) -> bool {
    let Some(king) = board.king_position(color) else {
        return false;
    };
    let last_move = board.last_move();
    board
        .occupied_by(color.opposite())
        .any(|square| legal_moves(square, board, last_move).iter().any(|m| m.to == king))
}

/// True if `color` is in check and no move of its own lifts the check.
pub fn is_checkmate(color: Color, board: &Board) -> bool {
    is_check(color, board) && !has_escape(color, board)
}

fn has_escape(color: Color, board: &Board) -> bool {
    let last_move = board.last_move();
    board
        .occupied_by(color)
        .flat_map(|square| legal_moves(square, board, last_move))
        .any(|m| !is_check(color, &board.applied(m)))
}

/// Evaluates the board that `mover` just produced against the opponent.
pub fn evaluate(mover: Color, board: &Board) -> GameStatus {
    let opponent = mover.opposite();
    let checkmate = is_checkmate(opponent, board);
    GameStatus {
        check: checkmate || is_check(opponent, board),
        checkmate,
        winner: checkmate.then_some(mover),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Piece, Position};

    #[test]
    fn check_by_knight() {
        let board = Board::with_pieces(&[
            (Position::A1, Piece::WHITE_ROOK),
            (Position::D1, Piece::WHITE_KING),
            (Position::E2, Piece::WHITE_PAWN),
            (Position::C3, Piece::BLACK_KNIGHT),
            (Position::G4, Piece::BLACK_BISHOP),
            (Position::D8, Piece::BLACK_KING),
        ]);
        assert!(is_check(Color::White, &board));
        assert!(!is_check(Color::Black, &board));
    }

    #[test]
    fn pawn_shields_the_king() {
        let board = Board::with_pieces(&[
            (Position::A1, Piece::WHITE_ROOK),
            (Position::D1, Piece::WHITE_KING),
            (Position::E2, Piece::WHITE_PAWN),
            (Position::B3, Piece::BLACK_KNIGHT),
            (Position::G4, Piece::BLACK_BISHOP),
            (Position::D8, Piece::BLACK_KING),
        ]);
        assert!(!is_check(Color::White, &board));
    }

    #[test]
    fn no_king_no_check() {
        let board = Board::with_pieces(&[(Position::D5, Piece::BLACK_QUEEN)]);
        assert!(!is_check(Color::White, &board));
        assert!(!is_checkmate(Color::White, &board));
    }

    fn mating_net() -> Vec<(Position, Piece)> {
        vec![
            (Position::D1, Piece::WHITE_KING),
            (Position::E2, Piece::WHITE_PAWN),
            (Position::C2, Piece::WHITE_PAWN),
            (Position::D5, Piece::BLACK_QUEEN),
            (Position::B2, Piece::BLACK_PAWN),
            (Position::B3, Piece::BLACK_KNIGHT),
            (Position::G3, Piece::BLACK_BISHOP),
            (Position::D8, Piece::BLACK_KING),
        ]
    }

    #[test]
    fn checkmate() {
        let board = Board::with_pieces(&mating_net());
        assert!(is_check(Color::White, &board));
        assert!(is_checkmate(Color::White, &board));
        assert!(!is_checkmate(Color::Black, &board));
    }

    #[test]
    fn checkmate_broken_by_freeing_c1() {
        // Without the b2 pawn and the b3 knight nothing covers c1.
        let pieces: Vec<_> = mating_net()
            .into_iter()
            .filter(|(p, _)| *p != Position::B2 && *p != Position::B3)
            .collect();
        let board = Board::with_pieces(&pieces);
        assert!(is_check(Color::White, &board));
        assert!(!is_checkmate(Color::White, &board));
    }

    #[test]
    fn checkmate_false_when_king_can_step_aside() {
        let board = Board::with_pieces(&[
            (Position::A1, Piece::WHITE_ROOK),
            (Position::D1, Piece::WHITE_KING),
            (Position::E2, Piece::WHITE_PAWN),
            (Position::D5, Piece::BLACK_QUEEN),
            (Position::B3, Piece::BLACK_KNIGHT),
            (Position::G4, Piece::BLACK_BISHOP),
            (Position::D8, Piece::BLACK_KING),
        ]);
        assert!(is_check(Color::White, &board));
        assert!(!is_checkmate(Color::White, &board));
    }

    #[test]
    fn blocking_the_check_is_an_escape() {
        let board = Board::with_pieces(&[
            (Position::E1, Piece::WHITE_KING),
            (Position::H1, Piece::WHITE_ROOK),
            (Position::H2, Piece::WHITE_PAWN),
            (Position::G2, Piece::WHITE_PAWN),
            (Position::F2, Piece::WHITE_PAWN),
            (Position::D2, Piece::WHITE_PAWN),
            (Position::D1, Piece::WHITE_QUEEN),
            (Position::E4, Piece::BLACK_ROOK),
            (Position::E8, Piece::BLACK_KING),
        ]);
        // Rook e4 checks down the e-file; the queen can block on e2 and the
        // king can step to f1.
        assert!(is_check(Color::White, &board));
        assert!(!is_checkmate(Color::White, &board));
    }

    #[test]
    fn evaluate_reports_mate_for_the_mover() {
        let board = Board::with_pieces(&mating_net());
        assert_eq!(
            evaluate(Color::Black, &board),
            GameStatus {
                check: true,
                checkmate: true,
                winner: Some(Color::Black),
            }
        );
        assert_eq!(evaluate(Color::White, &board), GameStatus::default());
    }
}
