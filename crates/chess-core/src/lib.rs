//! Core types for chess.
//!
//! This crate provides the fundamental value types used by the rules engine:
//! - [`Piece`], [`PieceType`] and [`Color`] for piece representation
//! - [`Position`], [`File`], and [`Rank`] for board coordinates
//! - [`Square`] for a position with its optional occupant
//! - [`Move`] for move representation
//! - [`Snapshot`], the 64-token board serialization
//! - coordinate input parsing in [`notation`]

mod color;
mod mov;
pub mod notation;
mod piece;
mod position;
mod snapshot;
mod square;

pub use color::Color;
pub use mov::Move;
pub use notation::{CastlingSide, NotationError};
pub use piece::{Piece, PieceType};
pub use position::{File, Position, Rank};
pub use snapshot::{Snapshot, SnapshotError};
pub use square::Square;
