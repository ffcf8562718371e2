//! Legal move generation and move-string parsing.

use super::Position;
use crate::board::{Color, Move, MoveList, MoveParseError, Piece, Square};

impl Position {
    /// All legal moves, ordered by origin square (a1 to h8) and then by
    /// generation order for that piece. Castling follows the king's steps.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut legal = MoveList::new();
        for (from, piece) in self.board.pieces_of(self.side_to_move) {
            for &mv in self.candidates(from, piece).iter() {
                if self.keeps_king_safe(mv) {
                    legal.push(mv);
                }
            }
        }
        legal
    }

    /// Whether at least one legal move exists; stops at the first one.
    pub(crate) fn has_legal_move(&self) -> bool {
        self.board.pieces_of(self.side_to_move).any(|(from, piece)| {
            self.candidates(from, piece)
                .iter()
                .any(|&mv| self.keeps_king_safe(mv))
        })
    }

    fn candidates(&self, from: Square, piece: Piece) -> MoveList {
        let mut moves = MoveList::new();
        self.board.push_pseudo_moves(from, self.en_passant, &mut moves);
        if piece == Piece::King {
            self.push_castling(from, &mut moves);
        }
        moves
    }

    fn keeps_king_safe(&self, mv: Move) -> bool {
        !self.play(mv).board.in_check(self.side_to_move)
    }

    /// Castling moves for the king on `king`: the right is held, the rook
    /// stands on its corner, the squares between are empty, and the king
    /// neither starts in, passes through, nor lands on an attacked square.
    fn push_castling(&self, king: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        let back = color.back_rank();
        if king != Square::at(back, 4) || self.board.in_check(color) {
            return;
        }
        let enemy = color.opponent();
        for kingside in [true, false] {
            if !self.castling.has(color, kingside) {
                continue;
            }
            let (rook_file, between, transit, dest): (u8, &[u8], u8, u8) = if kingside {
                (7, &[5, 6][..], 5, 6)
            } else {
                (0, &[1, 2, 3][..], 3, 2)
            };
            if !self.board.has(Square::at(back, rook_file), color, Piece::Rook) {
                continue;
            }
            if between.iter().any(|&f| !self.board.is_empty(Square::at(back, f))) {
                continue;
            }
            if [transit, dest]
                .iter()
                .any(|&f| self.board.is_square_attacked(Square::at(back, f), enemy))
            {
                continue;
            }
            let to = Square::at(back, dest);
            moves.push(if kingside {
                Move::castle_kingside(king, to)
            } else {
                Move::castle_queenside(king, to)
            });
        }
    }

    /// Resolve a coordinate move string (`e2e4`, `e7e8q`) to a legal move.
    ///
    /// The promotion letter must be lowercase, as in the move's `Display` form.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text
            .get(0..2)
            .ok_or_else(invalid_square)?
            .parse()
            .map_err(|_| invalid_square())?;
        let to: Square = text
            .get(2..4)
            .ok_or_else(invalid_square)?
            .parse()
            .map_err(|_| invalid_square())?;

        let promotion = match text.get(4..).and_then(|rest| rest.chars().next()) {
            None => None,
            Some('n') => Some(Piece::Knight),
            Some('b') => Some(Piece::Bishop),
            Some('r') => Some(Piece::Rook),
            Some('q') => Some(Piece::Queen),
            Some(c) => return Err(MoveParseError::InvalidPromotion { char: c }),
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Number of legal move paths of length `depth` (move generation check).
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves.iter().map(|&mv| self.play(mv).perft(depth - 1)).sum()
    }
}

/// Castling right lost when a piece leaves or lands on `sq`.
pub(super) fn corner_right(sq: Square) -> Option<(Color, bool)> {
    match (sq.rank(), sq.file()) {
        (0, 0) => Some((Color::White, false)),
        (0, 7) => Some((Color::White, true)),
        (7, 0) => Some((Color::Black, false)),
        (7, 7) => Some((Color::Black, true)),
        _ => None,
    }
}
