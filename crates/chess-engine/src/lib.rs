//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - immutable 64-square board with move application and snapshots
//! - [`legal_moves`] - per-square move generation, including en passant
//! - [`is_check`], [`is_checkmate`] and [`evaluate`] - game status evaluation
//! - [`Castling`] and [`CastlingRights`] - castling geometry and rights
//! - [`GameState`] - per-game state machine turning [`Command`]s into [`Fact`]s
//! - [`GameRegistry`] - many games with per-game exclusive access
//!
//! # Architecture
//!
//! The board is pure: it knows nothing about turns or castling rights, so a
//! move can be legal on the board yet refused by the game. [`GameState`]
//! enforces turn order and rights, and records every outcome as a [`Fact`].
//! Replaying a game's facts reproduces its state.
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Position};
//! use chess_engine::{Command, Fact, GameState};
//! use chrono::Utc;
//!
//! let start = Command::StartGame {
//!     game_id: "demo".to_string(),
//!     at: Utc::now(),
//!     white_player: "alice".to_string(),
//!     black_player: "bob".to_string(),
//! };
//! let game = GameState::new().apply(&start).unwrap().state;
//!
//! let push = Command::MoveChessPiece {
//!     game_id: "demo".to_string(),
//!     at: Utc::now(),
//!     from: Position::E2,
//!     to: Position::E4,
//! };
//! let transition = game.apply(&push).unwrap();
//! assert!(matches!(transition.facts[0], Fact::ChessPieceMoved { .. }));
//! assert_eq!(transition.state.turn(), Color::Black);
//! ```

mod board;
mod castling;
mod game;
pub mod movegen;
mod registry;
pub mod status;

pub use board::{Board, MoveError};
pub use castling::{rook_home, Castling, CastlingError, CastlingRights};
pub use chess_core::CastlingSide;
pub use game::{
    CastlingRejection, Command, Fact, GameError, GameId, GameState, Lifecycle, MoveRejection,
    Transition,
};
pub use movegen::legal_moves;
pub use registry::GameRegistry;
pub use status::{evaluate, is_check, is_checkmate, GameStatus};
