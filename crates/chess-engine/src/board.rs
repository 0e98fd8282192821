//! Board representation.

use chess_core::{
    CastlingSide, Color, File, Move, Piece, PieceType, Position, Rank, Snapshot, SnapshotError,
    Square,
};
use std::fmt;
use thiserror::Error;

use crate::castling::{self, Castling, CastlingError};
use crate::movegen::legal_moves;
use crate::status::{self, GameStatus};

/// Errors that can occur when moving a piece on the board.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece to move at {0}")]
    NoPieceAtSource(Position),

    #[error("{piece} cannot move from {from} to {to}")]
    IllegalTarget {
        piece: Piece,
        from: Position,
        to: Position,
    },
}

/// Piece order along each back rank, from file A to file H.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An immutable 8×8 board.
///
/// Holds one [`Square`] per [`Position`], indexed by [`Position::index`], plus
/// the move that produced it and the status evaluated after that move. Every
/// operation returns a new `Board`; the receiver is left untouched.
///
/// The board knows nothing about turns or castling rights. Those live in
/// [`GameState`](crate::GameState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Square; 64],
    last_move: Option<Move>,
    status: Option<GameStatus>,
}

impl Board {
    /// Creates a board without any pieces.
    pub fn empty() -> Self {
        let mut squares = [Square::empty(Position::A1); 64];
        for position in Position::all() {
            squares[position.index() as usize] = Square::empty(position);
        }
        Board {
            squares,
            last_move: None,
            status: None,
        }
    }

    /// Creates the standard opening layout.
    pub fn opening() -> Self {
        let mut pieces = Vec::with_capacity(32);
        for color in Color::ALL {
            let back_rank = Rank::ALL[color.back_rank() as usize];
            let pawn_rank = Rank::ALL[color.pawn_rank() as usize];
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                pieces.push((Position::new(file, back_rank), Piece::new(kind, color)));
                pieces.push((
                    Position::new(file, pawn_rank),
                    Piece::new(PieceType::Pawn, color),
                ));
            }
        }
        Self::with_pieces(&pieces)
    }

    /// Creates a board holding exactly the given pieces.
    ///
    /// A later entry for the same position replaces an earlier one.
    pub fn with_pieces(pieces: &[(Position, Piece)]) -> Self {
        let mut board = Self::empty();
        for &(position, piece) in pieces {
            board.squares[position.index() as usize] = Square::new(position, Some(piece));
        }
        board
    }

    /// Restores a board from its snapshot.
    ///
    /// The snapshot carries placement only: the restored board has no last
    /// move and no status.
    pub fn from_snapshot(s: &str) -> Result<Self, SnapshotError> {
        let snapshot = Snapshot::parse(s)?;
        let mut board = Self::empty();
        for position in Position::all() {
            board.squares[position.index() as usize] =
                Square::new(position, snapshot.piece_at(position));
        }
        Ok(board)
    }

    /// Serializes the placement as 64 comma-joined tokens.
    pub fn snapshot(&self) -> String {
        let mut placement = [None; 64];
        for square in &self.squares {
            placement[square.position.index() as usize] = square.piece;
        }
        Snapshot::new(placement).to_string()
    }

    /// All 64 squares in index order.
    pub fn squares(&self) -> &[Square; 64] {
        &self.squares
    }

    #[inline]
    pub fn square(&self, position: Position) -> Square {
        self.squares[position.index() as usize]
    }

    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        self.square(position).piece
    }

    /// The move that produced this board, if any.
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn status(&self) -> Option<GameStatus> {
        self.status
    }

    /// Squares holding a piece of `color`.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = &Square> + '_ {
        self.squares.iter().filter(move |square| square.holds(color))
    }

    /// Where the king of `color` stands, if it is on the board.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        let king = Piece::new(PieceType::King, color);
        self.squares
            .iter()
            .find(|square| square.piece == Some(king))
            .map(|square| square.position)
    }

    /// Legal moves for whatever stands on `position`, given this board's last move.
    pub fn legal_moves_from(&self, position: Position) -> Vec<Move> {
        legal_moves(&self.square(position), self, self.last_move.as_ref())
    }

    /// Moves `piece` from `from` to `to`, failing unless `from` holds exactly
    /// that piece and `to` is one of its legal targets.
    ///
    /// The status of the returned board is not evaluated.
    pub fn move_piece(
        &self,
        piece: Piece,
        from: Position,
        to: Position,
    ) -> Result<Board, MoveError> {
        self.legal_move(piece, from, to).map(|m| self.applied(m))
    }

    /// Moves whatever stands on `from` to `to`, and evaluates check and
    /// checkmate against the mover's opponent on the resulting board.
    pub fn result_of_move(&self, from: Position, to: Position) -> Result<Board, MoveError> {
        self.play(from, to).map(|(next, _)| next)
    }

    /// [`Board::result_of_move`] together with the move it applied.
    pub(crate) fn play(&self, from: Position, to: Position) -> Result<(Board, Move), MoveError> {
        let piece = self
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;
        let m = self.legal_move(piece, from, to)?;
        let next = self.applied(m);
        let status = status::evaluate(piece.color, &next);
        Ok((next.with_status(status), m))
    }

    fn legal_move(&self, piece: Piece, from: Position, to: Position) -> Result<Move, MoveError> {
        if self.piece_at(from) != Some(piece) {
            return Err(MoveError::NoPieceAtSource(from));
        }
        self.legal_moves_from(from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(MoveError::IllegalTarget { piece, from, to })
    }

    /// Castles `color` to `side`, relocating king and rook together.
    pub fn castle(&self, side: CastlingSide, color: Color) -> Result<Board, CastlingError> {
        let next = castling::resolve(self, Castling::new(side, color))?;
        let status = status::evaluate(color, &next);
        Ok(next.with_status(status))
    }

    pub fn castle_short(&self, color: Color) -> Result<Board, CastlingError> {
        self.castle(CastlingSide::Short, color)
    }

    pub fn castle_long(&self, color: Color) -> Result<Board, CastlingError> {
        self.castle(CastlingSide::Long, color)
    }

    /// The same board with `status` attached.
    pub fn with_status(&self, status: GameStatus) -> Board {
        Board {
            status: Some(status),
            ..self.clone()
        }
    }

    /// The same board flagged as check.
    pub fn with_check(&self) -> Board {
        let status = self.status.unwrap_or_default();
        self.with_status(GameStatus {
            check: true,
            ..status
        })
    }

    /// The same board flagged as checkmate won by `winner`.
    pub fn with_checkmate(&self, winner: Color) -> Board {
        self.with_status(GameStatus {
            check: true,
            checkmate: true,
            winner: Some(winner),
        })
    }

    pub(crate) fn with_last_move(&self, m: Move) -> Board {
        Board {
            last_move: Some(m),
            ..self.clone()
        }
    }

    /// Applies a generated move: clears the captured square (which differs
    /// from `to` for en passant), then relocates the piece.
    pub(crate) fn applied(&self, m: Move) -> Board {
        let mut squares = self.squares;
        if let Some(captured) = m.captured {
            let index = captured.position.index() as usize;
            squares[index] = squares[index].vacated();
        }
        squares[m.from.index() as usize] = squares[m.from.index() as usize].vacated();
        squares[m.to.index() as usize] = squares[m.to.index() as usize].occupied_by(m.piece);
        Board {
            squares,
            last_move: Some(m),
            status: None,
        }
    }

    /// Lifts `m.piece` off `m.from` and sets it on `m.to` without any rules
    /// check. The last move is kept; the status is cleared.
    pub(crate) fn relocated(&self, m: Move) -> Board {
        let mut squares = self.squares;
        squares[m.from.index() as usize] = squares[m.from.index() as usize].vacated();
        squares[m.to.index() as usize] = squares[m.to.index() as usize].occupied_by(m.piece);
        Board {
            squares,
            last_move: self.last_move,
            status: None,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::opening()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let symbol = self
                    .piece_at(Position::new(file, *rank))
                    .map_or('.', Piece::symbol);
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for file in File::ALL {
            write!(f, " {}", file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn opening_layout() {
        let board = Board::opening();
        assert_eq!(board.squares().len(), 64);
        assert_eq!(board.piece_at(Position::E1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Position::D8), Some(Piece::BLACK_QUEEN));
        assert_eq!(board.piece_at(Position::H2), Some(Piece::WHITE_PAWN));
        assert_eq!(board.piece_at(Position::B8), Some(Piece::BLACK_KNIGHT));
        assert_eq!(board.piece_at(Position::E4), None);
        assert_eq!(board.occupied_by(Color::White).count(), 16);
        assert_eq!(board.occupied_by(Color::Black).count(), 16);
        assert_eq!(board.last_move(), None);
        assert_eq!(board.status(), None);
    }

    #[test]
    fn squares_follow_index_order() {
        let board = Board::opening();
        for (i, square) in board.squares().iter().enumerate() {
            assert_eq!(square.position.index() as usize, i);
        }
    }

    #[test]
    fn opening_snapshot() {
        let expected = "\
            WHITE_ROOK,WHITE_KNIGHT,WHITE_BISHOP,WHITE_QUEEN,WHITE_KING,WHITE_BISHOP,WHITE_KNIGHT,WHITE_ROOK,\
            WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,WHITE_PAWN,\
            X,X,X,X,X,X,X,X,\
            X,X,X,X,X,X,X,X,\
            X,X,X,X,X,X,X,X,\
            X,X,X,X,X,X,X,X,\
            BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,BLACK_PAWN,\
            BLACK_ROOK,BLACK_KNIGHT,BLACK_BISHOP,BLACK_QUEEN,BLACK_KING,BLACK_BISHOP,BLACK_KNIGHT,BLACK_ROOK";
        assert_eq!(Board::opening().snapshot(), expected);
        assert_eq!(Board::from_snapshot(expected), Ok(Board::opening()));
    }

    #[test]
    fn malformed_snapshot() {
        assert_eq!(
            Board::from_snapshot("X,X"),
            Err(SnapshotError::InvalidTokenCount(2))
        );
    }

    #[test]
    fn correct_move_changes_the_board() {
        let board = Board::with_pieces(&[
            (Position::D1, Piece::WHITE_KING),
            (Position::D2, Piece::WHITE_PAWN),
            (Position::F2, Piece::WHITE_BISHOP),
            (Position::D8, Piece::BLACK_KING),
            (Position::D7, Piece::BLACK_PAWN),
        ]);
        let moved = board
            .move_piece(Piece::WHITE_PAWN, Position::D2, Position::D4)
            .unwrap();

        let expected = Board::with_pieces(&[
            (Position::D1, Piece::WHITE_KING),
            (Position::D4, Piece::WHITE_PAWN),
            (Position::F2, Piece::WHITE_BISHOP),
            (Position::D8, Piece::BLACK_KING),
            (Position::D7, Piece::BLACK_PAWN),
        ])
        .with_last_move(Move::new(Piece::WHITE_PAWN, Position::D2, Position::D4));

        assert_eq!(moved, expected);
        // The source board is untouched.
        assert_eq!(board.piece_at(Position::D2), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn result_of_move_attaches_status() {
        let board = Board::opening()
            .result_of_move(Position::E2, Position::E4)
            .unwrap();
        assert_eq!(board.status(), Some(GameStatus::default()));
        assert_eq!(
            board.last_move(),
            Some(&Move::new(Piece::WHITE_PAWN, Position::E2, Position::E4))
        );
    }

    #[test]
    fn result_of_move_rejects_empty_source() {
        assert_eq!(
            Board::opening().result_of_move(Position::E4, Position::E5),
            Err(MoveError::NoPieceAtSource(Position::E4))
        );
    }

    #[test]
    fn result_of_move_rejects_illegal_target() {
        assert_eq!(
            Board::opening().result_of_move(Position::E2, Position::E5),
            Err(MoveError::IllegalTarget {
                piece: Piece::WHITE_PAWN,
                from: Position::E2,
                to: Position::E5,
            })
        );
    }

    #[test]
    fn move_piece_rejects_wrong_color() {
        assert_eq!(
            Board::opening().move_piece(Piece::BLACK_PAWN, Position::E2, Position::E4),
            Err(MoveError::NoPieceAtSource(Position::E2))
        );
    }

    #[test]
    fn capture_replaces_the_occupant() {
        let board = Board::with_pieces(&[
            (Position::E2, Piece::WHITE_ROOK),
            (Position::E6, Piece::BLACK_ROOK),
        ]);
        let next = board.result_of_move(Position::E2, Position::E6).unwrap();
        assert_eq!(next.piece_at(Position::E6), Some(Piece::WHITE_ROOK));
        assert_eq!(next.piece_at(Position::E2), None);
        assert_eq!(
            next.last_move().and_then(Move::captured_piece),
            Some(Piece::BLACK_ROOK)
        );
    }

    #[test]
    fn play_returns_the_applied_move() {
        let board = Board::with_pieces(&[
            (Position::E2, Piece::WHITE_ROOK),
            (Position::E6, Piece::BLACK_ROOK),
        ]);
        let (next, played) = board.play(Position::E2, Position::E6).unwrap();
        assert_eq!(next.last_move(), Some(&played));
        assert_eq!(played.piece, Piece::WHITE_ROOK);
        assert_eq!(played.captured_piece(), Some(Piece::BLACK_ROOK));
        assert_eq!(next.status(), Some(GameStatus::default()));
        assert_eq!(
            board.play(Position::E3, Position::E4),
            Err(MoveError::NoPieceAtSource(Position::E3))
        );
    }

    #[test]
    fn king_position() {
        let board = Board::opening();
        assert_eq!(board.king_position(Color::White), Some(Position::E1));
        assert_eq!(board.king_position(Color::Black), Some(Position::E8));
        assert_eq!(Board::empty().king_position(Color::White), None);
    }

    #[test]
    fn status_flags() {
        let board = Board::opening().with_check();
        assert_eq!(
            board.status(),
            Some(GameStatus {
                check: true,
                checkmate: false,
                winner: None
            })
        );
        let board = board.with_checkmate(Color::Black);
        assert_eq!(board.status().and_then(|s| s.winner), Some(Color::Black));
    }

    #[test]
    fn display_diagram() {
        let text = Board::opening().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   A B C D E F G H");
    }

    /// Boards reached by playing `steps` pseudo-random legal moves from the
    /// opening, alternating colors, stopping early if a side has no move.
    fn reachable(choices: &[usize]) -> Board {
        let mut board = Board::opening();
        let mut color = Color::White;
        for &choice in choices {
            let moves: Vec<Move> = board
                .occupied_by(color)
                .flat_map(|square| board.legal_moves_from(square.position))
                .collect();
            if moves.is_empty() {
                break;
            }
            board = board.applied(moves[choice % moves.len()]);
            color = color.opposite();
        }
        board
    }

    proptest! {
        #[test]
        fn snapshot_roundtrip(choices in prop::collection::vec(any::<usize>(), 0..40)) {
            let board = reachable(&choices);
            let restored = Board::from_snapshot(&board.snapshot()).unwrap();
            prop_assert_eq!(restored.squares(), board.squares());
            prop_assert_eq!(restored.snapshot(), board.snapshot());
        }
    }
}
