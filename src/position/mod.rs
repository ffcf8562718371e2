//! Immutable chess positions.
//!
//! A [`Position`] is a [`Board`] plus side to move, castling rights, the
//! en passant target and the move counters, together with its Zobrist hash.
//! Positions are values: [`Position::apply`] returns a new position and
//! leaves the parent untouched.
//!
//! # Example
//! ```
//! use chess_opponent::position::Position;
//!
//! let start = Position::initial();
//! let after = start.apply_uci("e2e4").unwrap();
//! assert_eq!(start.legal_moves().len(), 20);
//! assert_eq!(
//!     after.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

mod apply;
mod fen;
mod legal;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::board::{Board, CastlingRights, Color, Piece, Square};
use crate::eval;
use crate::zobrist;

/// Board plus game state.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

impl Position {
    /// Standard starting position, White to move.
    #[must_use]
    pub fn initial() -> Self {
        Position::from_parts(
            Board::starting(),
            Color::White,
            CastlingRights::all(),
            None,
            0,
            1,
        )
    }

    fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let hash = zobrist::compute(&board, side_to_move, castling, en_passant);
        Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash,
        }
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist hash of placement, side to move, castling rights and en passant target.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Hash recomputed from scratch; always equal to [`Position::hash`].
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        zobrist::compute(
            &self.board,
            self.side_to_move,
            self.castling,
            self.en_passant,
        )
    }

    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.board.in_check(self.side_to_move)
    }

    /// No legal moves: checkmate or stalemate.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move()
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.is_terminal()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.is_terminal()
    }

    /// Fifty-move rule: a hundred halfmoves without a capture or pawn move.
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can possibly deliver mate.
    ///
    /// Covers bare kings, a single minor piece, and any number of bishops
    /// that all stand on squares of one colour.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishop_shades = [false; 2];
        for (sq, _, piece) in self.board.occupied() {
            match piece {
                Piece::King => {}
                Piece::Knight => {
                    minors += 1;
                    knights += 1;
                }
                Piece::Bishop => {
                    minors += 1;
                    bishop_shades[usize::from((sq.rank() + sq.file()) % 2)] = true;
                }
                Piece::Pawn | Piece::Rook | Piece::Queen => return false,
            }
        }
        minors <= 1 || (knights == 0 && !(bishop_shades[0] && bishop_shades[1]))
    }

    /// The same position seen from the other side of the board.
    ///
    /// The board is mirrored top to bottom with colours swapped, and castling
    /// rights and the en passant target follow the mirror. The side-to-move
    /// label is kept, so the result is a rendering view rather than a
    /// position reachable in the game; the evaluation of the flipped
    /// position is the negation of this one.
    #[must_use]
    pub fn flip_perspective(&self) -> Position {
        Position::from_parts(
            self.board.mirrored(),
            self.side_to_move,
            self.castling.swapped(),
            self.en_passant.map(Square::flip_vertical),
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    /// Static evaluation from the side to move's point of view.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        eval::evaluate(self)
    }

    /// Human-readable board diagram.
    #[must_use]
    pub fn diagram(&self) -> String {
        self.board.diagram()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

/// Diagram followed by the FEN line.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}FEN: {}", self.board.diagram(), self.to_fen())
    }
}
