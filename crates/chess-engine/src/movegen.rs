//! Move generation.
//!
//! Targets are generated per square from piece geometry and occupancy only.
//! A move that leaves the mover's own king attacked is still generated here;
//! king safety is judged in [`status`](crate::status) when testing for mate.

use chess_core::{Move, Piece, PieceType, Position, Square};

use crate::Board;

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Generates the moves available to the occupant of `square`.
///
/// An empty square yields no moves. `last_move` is consulted only for en
/// passant, which is offered when it was an opposing pawn's double step that
/// landed beside this pawn.
pub fn legal_moves(square: &Square, board: &Board, last_move: Option<&Move>) -> Vec<Move> {
    let Some(piece) = square.piece else {
        return Vec::new();
    };
    let from = square.position;
    let mut moves = Vec::new();

    match piece.kind {
        PieceType::King => {
            steps(board, piece, from, &ORTHOGONAL, &mut moves);
            steps(board, piece, from, &DIAGONAL, &mut moves);
        }
        PieceType::Queen => {
            rays(board, piece, from, &ORTHOGONAL, &mut moves);
            rays(board, piece, from, &DIAGONAL, &mut moves);
        }
        PieceType::Rook => rays(board, piece, from, &ORTHOGONAL, &mut moves),
        PieceType::Bishop => rays(board, piece, from, &DIAGONAL, &mut moves),
        PieceType::Knight => steps(board, piece, from, &KNIGHT_JUMPS, &mut moves),
        PieceType::Pawn => pawn_moves(board, piece, from, last_move, &mut moves),
    }

    moves
}

/// A move to `to` unless a friendly piece stands there.
fn landing(board: &Board, piece: Piece, from: Position, to: Position) -> Option<Move> {
    let target = board.square(to);
    match target.piece {
        None => Some(Move::new(piece, from, to)),
        Some(other) if other.is_opponent_of(piece) => Some(Move::capture(piece, from, to, target)),
        Some(_) => None,
    }
}

/// Single-step movers: king and knight.
fn steps(
    board: &Board,
    piece: Piece,
    from: Position,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    moves.extend(
        offsets
            .iter()
            .filter_map(|&(df, dr)| from.offset(df, dr))
            .filter_map(|to| landing(board, piece, from, to)),
    );
}

/// Sliders walk each direction until the edge or the first occupied square,
/// which is included only when it holds an opponent.
fn rays(
    board: &Board,
    piece: Piece,
    from: Position,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut next = from.offset(df, dr);
        while let Some(to) = next {
            let target = board.square(to);
            match target.piece {
                None => moves.push(Move::new(piece, from, to)),
                Some(other) => {
                    if other.is_opponent_of(piece) {
                        moves.push(Move::capture(piece, from, to, target));
                    }
                    break;
                }
            }
            next = to.offset(df, dr);
        }
    }
}

fn pawn_moves(
    board: &Board,
    pawn: Piece,
    from: Position,
    last_move: Option<&Move>,
    moves: &mut Vec<Move>,
) {
    let forward = pawn.color.pawn_direction();

    if let Some(one) = from.offset(0, forward) {
        if board.square(one).is_empty() {
            moves.push(Move::new(pawn, from, one));
            if from.rank().index() == pawn.color.pawn_rank() {
                if let Some(two) = one.offset(0, forward) {
                    if board.square(two).is_empty() {
                        moves.push(Move::new(pawn, from, two));
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        let Some(to) = from.offset(side, forward) else {
            continue;
        };
        let target = board.square(to);
        if target.holds_opponent_of(pawn) {
            moves.push(Move::capture(pawn, from, to, target));
        } else if target.is_empty() {
            if let Some(passed) = en_passant_victim(board, pawn, from, to, last_move) {
                moves.push(Move::capture(pawn, from, to, passed));
            }
        }
    }
}

/// The square of the pawn that can be taken en passant by moving `pawn`
/// diagonally from `from` to `to`.
fn en_passant_victim(
    board: &Board,
    pawn: Piece,
    from: Position,
    to: Position,
    last_move: Option<&Move>,
) -> Option<Square> {
    let last = last_move?;
    let passed = last.to;
    let eligible = last.piece.kind == PieceType::Pawn
        && last.piece.is_opponent_of(pawn)
        && last.is_double_step()
        && passed.same_rank(from)
        && passed.file_distance(from) == 1
        && passed.same_file(to)
        && board.piece_at(passed) == Some(last.piece);
    eligible.then(|| board.square(passed))
}
