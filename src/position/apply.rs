//! Functional move application with incremental hash updates.

use super::legal::corner_right;
use super::Position;
use crate::board::{Color, Move, MoveParseError, Piece, Square};
use crate::zobrist::ZOBRIST;

impl Position {
    /// Play a legal move, returning the resulting position.
    ///
    /// Fails with [`MoveParseError::IllegalMove`] if `mv` is not one of
    /// [`Position::legal_moves`]; `self` is never modified.
    pub fn apply(&self, mv: Move) -> Result<Position, MoveParseError> {
        if !self.legal_moves().contains(mv) {
            return Err(MoveParseError::IllegalMove {
                notation: mv.to_string(),
            });
        }
        Ok(self.play(mv))
    }

    /// Parse a coordinate move string and play it.
    pub fn apply_uci(&self, text: &str) -> Result<Position, MoveParseError> {
        let mv = self.parse_move(text)?;
        Ok(self.play(mv))
    }

    /// Play a move known to be pseudo-legal here, without validation.
    pub(crate) fn play(&self, mv: Move) -> Position {
        let keys = &*ZOBRIST;
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let mut next = *self;
        let mut hash = self.hash;

        let Some((_, piece)) = next.board.take(from) else {
            return next;
        };
        hash ^= keys.piece(us, piece, from);

        let captured_sq = if mv.is_en_passant() {
            Square::at(from.rank(), to.file())
        } else {
            to
        };
        if let Some((color, captured)) = next.board.take(captured_sq) {
            hash ^= keys.piece(color, captured, captured_sq);
        }

        let placed = mv.promotion_piece().unwrap_or(piece);
        next.board.set(to, Some((us, placed)));
        hash ^= keys.piece(us, placed, to);

        if mv.is_castling() {
            let back = us.back_rank();
            let (rook_from, rook_to) = if mv.is_castle_kingside() {
                (Square::at(back, 7), Square::at(back, 5))
            } else {
                (Square::at(back, 0), Square::at(back, 3))
            };
            next.board.set(rook_from, None);
            next.board.set(rook_to, Some((us, Piece::Rook)));
            hash ^= keys.piece(us, Piece::Rook, rook_from) ^ keys.piece(us, Piece::Rook, rook_to);
        }

        hash ^= keys.castling(self.castling);
        if piece == Piece::King {
            next.castling.remove(us, true);
            next.castling.remove(us, false);
        }
        for sq in [from, to] {
            if let Some((color, kingside)) = corner_right(sq) {
                next.castling.remove(color, kingside);
            }
        }
        hash ^= keys.castling(next.castling);

        hash ^= keys.en_passant(self.en_passant);
        next.en_passant = if mv.is_double_pawn_push() {
            Square::new((from.rank() + to.rank()) / 2, from.file())
        } else {
            None
        };
        hash ^= keys.en_passant(next.en_passant);

        next.halfmove_clock = if piece == Piece::Pawn || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            next.fullmove_number += 1;
        }

        next.side_to_move = us.opponent();
        hash ^= keys.side();
        next.hash = hash;
        next
    }
}
