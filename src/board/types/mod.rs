//! Core chess types.
//!
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square (index 0-63)
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod castling;
mod moves;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use moves::{Move, MoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::ScoredMoveList;
pub(crate) use piece::PROMOTION_PIECES;
