//! Per-game state machine.
//!
//! A game is driven by [`Command`]s and recorded as [`Fact`]s:
//! - [`GameState::decide`] validates a command and returns the facts it
//!   produces, leaving the state alone
//! - [`GameState::evolve`] folds one fact into the state
//! - [`GameState::apply`] does both
//! - [`GameState::replay`] rebuilds a game from its facts
//!
//! Rules violations (wrong player, illegal target, lost castling right) are
//! facts, not errors. [`GameError`] is reserved for commands that cannot be
//! addressed to this game at all, and for histories that do not replay.

use chess_core::{CastlingSide, Color, Move, Piece, PieceType, Position, SnapshotError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::MoveError;
use crate::castling::{rook_home, CastlingRights};
use crate::status::GameStatus;
use crate::Board;

/// Identifier of a game.
pub type GameId = String;

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game {0} has not been started")]
    NotStarted(GameId),

    #[error("game {0} has already been started")]
    AlreadyStarted(GameId),

    #[error("addressed to game {actual}, but this is game {expected}")]
    WrongGame { expected: GameId, actual: GameId },

    #[error("unknown game {0}")]
    UnknownGame(GameId),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("history of game {game_id} does not replay: {reason}")]
    Replay { game_id: GameId, reason: String },
}

/// A request to change a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    StartGame {
        game_id: GameId,
        at: DateTime<Utc>,
        white_player: String,
        black_player: String,
    },
    MoveChessPiece {
        game_id: GameId,
        at: DateTime<Utc>,
        from: Position,
        to: Position,
    },
    CastleShort {
        game_id: GameId,
        at: DateTime<Utc>,
    },
    CastleLong {
        game_id: GameId,
        at: DateTime<Utc>,
    },
}

impl Command {
    pub fn game_id(&self) -> &str {
        match self {
            Command::StartGame { game_id, .. }
            | Command::MoveChessPiece { game_id, .. }
            | Command::CastleShort { game_id, .. }
            | Command::CastleLong { game_id, .. } => game_id,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Command::StartGame { at, .. }
            | Command::MoveChessPiece { at, .. }
            | Command::CastleShort { at, .. }
            | Command::CastleLong { at, .. } => *at,
        }
    }
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveRejection {
    MissingPiece,
    IllegalTarget,
}

/// Why a castling was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CastlingRejection {
    RightsAlreadyLost,
    WrongBoardSetup,
}

/// Something that happened in a game.
///
/// Board-changing facts carry the resulting snapshot, so a consumer can
/// follow the game without running any rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Fact {
    GameStarted {
        game_id: GameId,
        at: DateTime<Utc>,
        white_player: String,
        black_player: String,
        board: String,
    },
    ChessPieceMoved {
        game_id: GameId,
        at: DateTime<Utc>,
        piece: Piece,
        from: Position,
        to: Position,
        board: String,
    },
    ShortCastlingApplied {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        board: String,
    },
    LongCastlingApplied {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        board: String,
    },
    CastlingRightRevoked {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        side: CastlingSide,
    },
    /// `color` is the side in check.
    Check {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        board: String,
    },
    GameEndedByCheckMate {
        game_id: GameId,
        at: DateTime<Utc>,
        winner: Color,
        board: String,
    },
    /// `color` owns the piece that was moved out of turn.
    MoveAttemptByWrongPlayer {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        from: Position,
        to: Position,
    },
    MoveRejected {
        game_id: GameId,
        at: DateTime<Utc>,
        reason: MoveRejection,
        from: Position,
        to: Position,
    },
    CastlingRejected {
        game_id: GameId,
        at: DateTime<Utc>,
        color: Color,
        side: CastlingSide,
        reason: CastlingRejection,
    },
}

impl Fact {
    pub fn game_id(&self) -> &str {
        match self {
            Fact::GameStarted { game_id, .. }
            | Fact::ChessPieceMoved { game_id, .. }
            | Fact::ShortCastlingApplied { game_id, .. }
            | Fact::LongCastlingApplied { game_id, .. }
            | Fact::CastlingRightRevoked { game_id, .. }
            | Fact::Check { game_id, .. }
            | Fact::GameEndedByCheckMate { game_id, .. }
            | Fact::MoveAttemptByWrongPlayer { game_id, .. }
            | Fact::MoveRejected { game_id, .. }
            | Fact::CastlingRejected { game_id, .. } => game_id,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Fact::GameStarted { at, .. }
            | Fact::ChessPieceMoved { at, .. }
            | Fact::ShortCastlingApplied { at, .. }
            | Fact::LongCastlingApplied { at, .. }
            | Fact::CastlingRightRevoked { at, .. }
            | Fact::Check { at, .. }
            | Fact::GameEndedByCheckMate { at, .. }
            | Fact::MoveAttemptByWrongPlayer { at, .. }
            | Fact::MoveRejected { at, .. }
            | Fact::CastlingRejected { at, .. } => *at,
        }
    }

    /// True for facts that record a refused command.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Fact::MoveAttemptByWrongPlayer { .. }
                | Fact::MoveRejected { .. }
                | Fact::CastlingRejected { .. }
        )
    }

    /// The snapshot carried by board-changing facts.
    pub fn board(&self) -> Option<&str> {
        match self {
            Fact::GameStarted { board, .. }
            | Fact::ChessPieceMoved { board, .. }
            | Fact::ShortCastlingApplied { board, .. }
            | Fact::LongCastlingApplied { board, .. }
            | Fact::Check { board, .. }
            | Fact::GameEndedByCheckMate { board, .. } => Some(board),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    Created,
    Started,
    Ended,
}

/// New state plus the facts that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub facts: Vec<Fact>,
}

/// The authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    game_id: GameId,
    white_player: String,
    black_player: String,
    lifecycle: Lifecycle,
    turn: Color,
    turn_number: u32,
    rights: CastlingRights,
    board: Board,
    winner: Option<Color>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A game that has not been started.
    pub fn new() -> Self {
        GameState {
            game_id: GameId::new(),
            white_player: String::new(),
            black_player: String::new(),
            lifecycle: Lifecycle::Created,
            turn: Color::White,
            turn_number: 0,
            rights: CastlingRights::ALL,
            board: Board::empty(),
            winner: None,
        }
    }

    /// Rebuilds a game by folding `facts` into a fresh state.
    pub fn replay<'a, I>(facts: I) -> Result<GameState, GameError>
    where
        I: IntoIterator<Item = &'a Fact>,
    {
        facts
            .into_iter()
            .try_fold(GameState::new(), |state, fact| state.evolve(fact))
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn white_player(&self) -> &str {
        &self.white_player
    }

    pub fn black_player(&self) -> &str {
        &self.black_player
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The color on move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// 1 for the first move of the game; 0 before the start.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.rights
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snapshot(&self) -> String {
        self.board.snapshot()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.lifecycle == Lifecycle::Ended
    }

    /// Runs `command` and folds the facts it produces.
    pub fn apply(&self, command: &Command) -> Result<Transition, GameError> {
        let facts = self.decide(command)?;
        let state = facts
            .iter()
            .try_fold(self.clone(), |state, fact| state.evolve(fact))?;
        Ok(Transition { state, facts })
    }

    /// Returns the facts `command` produces against this state.
    pub fn decide(&self, command: &Command) -> Result<Vec<Fact>, GameError> {
        let facts = match command {
            Command::StartGame {
                game_id,
                at,
                white_player,
                black_player,
            } => {
                if self.lifecycle != Lifecycle::Created {
                    return Err(GameError::AlreadyStarted(game_id.clone()));
                }
                info!(
                    game_id = %game_id,
                    white = %white_player,
                    black = %black_player,
                    "game started"
                );
                vec![Fact::GameStarted {
                    game_id: game_id.clone(),
                    at: *at,
                    white_player: white_player.clone(),
                    black_player: black_player.clone(),
                    board: Board::opening().snapshot(),
                }]
            }
            Command::MoveChessPiece {
                game_id,
                at,
                from,
                to,
            } => {
                if !self.accepts_play(game_id)? {
                    return Ok(Vec::new());
                }
                self.decide_move(*at, *from, *to)
            }
            Command::CastleShort { game_id, at } => {
                if !self.accepts_play(game_id)? {
                    return Ok(Vec::new());
                }
                self.decide_castling(*at, CastlingSide::Short)
            }
            Command::CastleLong { game_id, at } => {
                if !self.accepts_play(game_id)? {
                    return Ok(Vec::new());
                }
                self.decide_castling(*at, CastlingSide::Long)
            }
        };
        debug!(game_id = %command.game_id(), ?command, facts = facts.len(), "decided");
        Ok(facts)
    }

    /// Whether play commands for `game_id` are accepted. Errors on a game
    /// that is not started or not this one; `false` once the game is over.
    fn accepts_play(&self, game_id: &str) -> Result<bool, GameError> {
        self.ensure_addressed(game_id)?;
        if self.is_over() {
            debug!(game_id = %game_id, "game is over, command ignored");
            return Ok(false);
        }
        Ok(true)
    }

    fn ensure_addressed(&self, game_id: &str) -> Result<(), GameError> {
        if self.lifecycle == Lifecycle::Created {
            return Err(GameError::NotStarted(game_id.to_string()));
        }
        if self.game_id != game_id {
            return Err(GameError::WrongGame {
                expected: self.game_id.clone(),
                actual: game_id.to_string(),
            });
        }
        Ok(())
    }

    fn decide_move(&self, at: DateTime<Utc>, from: Position, to: Position) -> Vec<Fact> {
        let game_id = self.game_id.clone();

        if let Some(piece) = self.board.piece_at(from) {
            if piece.color != self.turn {
                warn!(game_id = %game_id, color = %piece.color, %from, %to, "move out of turn");
                return vec![Fact::MoveAttemptByWrongPlayer {
                    game_id,
                    at,
                    color: piece.color,
                    from,
                    to,
                }];
            }
        }

        let (next, played) = match self.board.play(from, to) {
            Ok(played) => played,
            Err(err) => {
                warn!(game_id = %game_id, %err, "move rejected");
                let reason = match err {
                    MoveError::NoPieceAtSource(_) => MoveRejection::MissingPiece,
                    MoveError::IllegalTarget { .. } => MoveRejection::IllegalTarget,
                };
                return vec![Fact::MoveRejected {
                    game_id,
                    at,
                    reason,
                    from,
                    to,
                }];
            }
        };
        info!(game_id = %game_id, piece = %played.piece, %from, %to, "piece moved");

        let mut facts = vec![Fact::ChessPieceMoved {
            game_id: game_id.clone(),
            at,
            piece: played.piece,
            from,
            to,
            board: next.snapshot(),
        }];
        facts.extend(
            self.rights_lost_by(&played)
                .into_iter()
                .map(|(color, side)| Fact::CastlingRightRevoked {
                    game_id: game_id.clone(),
                    at,
                    color,
                    side,
                }),
        );
        facts.extend(self.status_facts(at, &next));
        facts
    }

    fn decide_castling(&self, at: DateTime<Utc>, side: CastlingSide) -> Vec<Fact> {
        let game_id = self.game_id.clone();
        let color = self.turn;
        let rejected = |reason| Fact::CastlingRejected {
            game_id: game_id.clone(),
            at,
            color,
            side,
            reason,
        };

        if !self.rights.can_castle(color, side) {
            warn!(game_id = %game_id, %color, %side, "castling right already lost");
            return vec![rejected(CastlingRejection::RightsAlreadyLost)];
        }
        let next = match self.board.castle(side, color) {
            Ok(next) => next,
            Err(err) => {
                warn!(game_id = %game_id, %err, "castling rejected");
                return vec![rejected(CastlingRejection::WrongBoardSetup)];
            }
        };
        info!(game_id = %game_id, %color, %side, "castled");

        let board = next.snapshot();
        let mut facts = vec![match side {
            CastlingSide::Short => Fact::ShortCastlingApplied {
                game_id: game_id.clone(),
                at,
                color,
                board,
            },
            CastlingSide::Long => Fact::LongCastlingApplied {
                game_id: game_id.clone(),
                at,
                color,
                board,
            },
        }];
        facts.extend(
            self.rights
                .held(color)
                .map(|side| Fact::CastlingRightRevoked {
                    game_id: game_id.clone(),
                    at,
                    color,
                    side,
                }),
        );
        facts.extend(self.status_facts(at, &next));
        facts
    }

    /// Rights still held that `played` takes away: both of the mover's after a
    /// king move, one side after a rook leaves its corner, and the
    /// opponent's side when its corner rook is captured there.
    fn rights_lost_by(&self, played: &Move) -> Vec<(Color, CastlingSide)> {
        let mut lost = Vec::new();
        match played.piece.kind {
            PieceType::King => {
                let color = played.piece.color;
                lost.extend(self.rights.held(color).map(|side| (color, side)));
            }
            PieceType::Rook => lost.extend(
                rook_home(played.from).filter(|&(color, _)| color == played.piece.color),
            ),
            _ => {}
        }
        if let Some(taken) = played.captured {
            let corner_rook = taken
                .piece
                .filter(|piece| piece.kind == PieceType::Rook)
                .and_then(|piece| {
                    rook_home(taken.position).filter(|&(color, _)| color == piece.color)
                });
            lost.extend(corner_rook);
        }
        lost.retain(|&(color, side)| self.rights.can_castle(color, side));
        lost
    }

    /// `Check` and `GameEndedByCheckMate` for the status attached to `next`.
    fn status_facts(&self, at: DateTime<Utc>, next: &Board) -> Vec<Fact> {
        let status = next.status().unwrap_or_default();
        let mut facts = Vec::new();
        if status.check {
            facts.push(Fact::Check {
                game_id: self.game_id.clone(),
                at,
                color: self.turn.opposite(),
                board: next.snapshot(),
            });
        }
        if status.checkmate {
            info!(game_id = %self.game_id, winner = %self.turn, "checkmate");
            facts.push(Fact::GameEndedByCheckMate {
                game_id: self.game_id.clone(),
                at,
                winner: self.turn,
                board: next.snapshot(),
            });
        }
        facts
    }

    /// Folds one fact into the state.
    ///
    /// Board-changing facts are re-applied through the board rules and their
    /// snapshot is checked against the result, so a corrupt history fails
    /// here instead of producing a diverging game.
    pub fn evolve(mut self, fact: &Fact) -> Result<GameState, GameError> {
        debug!(game_id = %fact.game_id(), ?fact, "evolve");

        if let Fact::GameStarted {
            game_id,
            white_player,
            black_player,
            board,
            ..
        } = fact
        {
            if self.lifecycle != Lifecycle::Created {
                return Err(GameError::AlreadyStarted(game_id.clone()));
            }
            return Ok(GameState {
                game_id: game_id.clone(),
                white_player: white_player.clone(),
                black_player: black_player.clone(),
                lifecycle: Lifecycle::Started,
                turn: Color::White,
                turn_number: 1,
                rights: CastlingRights::ALL,
                board: Board::from_snapshot(board)?,
                winner: None,
            });
        }

        self.ensure_addressed(fact.game_id())?;
        match fact {
            Fact::ChessPieceMoved {
                piece,
                from,
                to,
                board,
                ..
            } => {
                self.ensure_turn(piece.color)?;
                let next = self
                    .board
                    .move_piece(*piece, *from, *to)
                    .map_err(|err| self.replay_error(err.to_string()))?
                    .with_status(GameStatus::default());
                self.advance(next, board)?;
            }
            Fact::ShortCastlingApplied { color, board, .. } => {
                self.ensure_turn(*color)?;
                let next = self.castled(CastlingSide::Short, *color)?;
                self.advance(next, board)?;
            }
            Fact::LongCastlingApplied { color, board, .. } => {
                self.ensure_turn(*color)?;
                let next = self.castled(CastlingSide::Long, *color)?;
                self.advance(next, board)?;
            }
            Fact::CastlingRightRevoked { color, side, .. } => self.rights.revoke(*color, *side),
            Fact::Check { board, .. } => {
                self.verify(board)?;
                self.board = self.board.with_check();
            }
            Fact::GameEndedByCheckMate { winner, board, .. } => {
                self.verify(board)?;
                self.board = self.board.with_checkmate(*winner);
                self.winner = Some(*winner);
                self.lifecycle = Lifecycle::Ended;
            }
            Fact::MoveAttemptByWrongPlayer { .. }
            | Fact::MoveRejected { .. }
            | Fact::CastlingRejected { .. } => {}
            Fact::GameStarted { .. } => {}
        }
        Ok(self)
    }

    /// Board-changing facts must come from the side to move of a game still
    /// in play.
    fn ensure_turn(&self, color: Color) -> Result<(), GameError> {
        if self.is_over() {
            return Err(self.replay_error("board changed after the game ended".to_string()));
        }
        if color != self.turn {
            return Err(self.replay_error(format!(
                "{} played on turn {}, but it was {}'s turn",
                color, self.turn_number, self.turn
            )));
        }
        Ok(())
    }

    fn castled(&self, side: CastlingSide, color: Color) -> Result<Board, GameError> {
        self.board
            .castle(side, color)
            .map(|next| next.with_status(GameStatus::default()))
            .map_err(|err| self.replay_error(err.to_string()))
    }

    /// Makes `next` current after checking it against `snapshot`, and passes
    /// the turn.
    fn advance(&mut self, next: Board, snapshot: &str) -> Result<(), GameError> {
        if next.snapshot() != snapshot {
            return Err(self.replay_error(format!(
                "board after turn {} differs from the recorded one",
                self.turn_number
            )));
        }
        self.board = next;
        self.turn = self.turn.opposite();
        self.turn_number += 1;
        Ok(())
    }

    fn verify(&self, snapshot: &str) -> Result<(), GameError> {
        if self.board.snapshot() != snapshot {
            return Err(self.replay_error("status recorded for a different board".to_string()));
        }
        Ok(())
    }

    fn replay_error(&self, reason: String) -> GameError {
        GameError::Replay {
            game_id: self.game_id.clone(),
            reason,
        }
    }
}
