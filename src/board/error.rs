//! Error types for board and position operations.

use thiserror::Error;

use super::types::{Color, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    #[error("FEN must have at least 4 parts, found {found}")]
    TooFewParts { found: usize },
    /// FEN string has more than the six standard fields
    #[error("FEN must have at most 6 parts, found {found}")]
    TooManyParts { found: usize },
    /// Invalid piece character in position string
    #[error("invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    /// Invalid castling character
    #[error("invalid castling character '{char}' in FEN")]
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    #[error("invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    #[error("invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    /// Placement field does not have exactly eight ranks
    #[error("placement must have 8 ranks, found {found}")]
    InvalidRankCount { found: usize },
    /// A rank does not cover exactly eight files
    #[error("rank {rank} covers {files} files, expected 8")]
    InvalidFileCount { rank: usize, files: usize },
    /// Halfmove clock or fullmove number is not a number
    #[error("invalid move counter '{found}'")]
    InvalidCounter { found: String },
    /// Each side needs exactly one king
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: usize },
    /// More than sixteen men of one colour
    #[error("{color} has {found} pieces, at most 16 allowed")]
    TooManyPieces { color: Color, found: usize },
    /// More than eight pawns of one colour
    #[error("{color} has {found} pawns, at most 8 allowed")]
    TooManyPawns { color: Color, found: usize },
    /// A pawn on the first or eighth rank
    #[error("pawn on back rank square {square}")]
    PawnOnBackRank { square: Square },
    /// The side that just moved is left in check
    #[error("side not to move ({color}) is in check")]
    OpponentInCheck { color: Color },
}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    #[error("move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    /// Invalid square notation in move
    #[error("invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    #[error("invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    #[error("rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: u8 },
    /// File out of bounds (must be 0-7)
    #[error("file {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: u8 },
    /// Invalid algebraic notation
    #[error("invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}
