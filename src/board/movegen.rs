//! Pseudo-legal move primitives and attack detection on a bare board.
//!
//! Nothing here knows about check: filtering moves that expose the king,
//! and castling, belong to `Position`.

use super::attack_tables::{squares, DIAGONAL, KING_ATTACKS, KNIGHT_ATTACKS, ORTHOGONAL, PAWN_ATTACKS};
use super::state::Board;
use super::types::{Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};

impl Board {
    /// Candidate moves for the piece on `from`, per its movement rules.
    ///
    /// `en_passant` is the square a pawn may capture onto en passant, if any.
    /// An empty `from` yields an empty list.
    #[must_use]
    pub fn pseudo_moves(&self, from: Square, en_passant: Option<Square>) -> MoveList {
        let mut moves = MoveList::new();
        self.push_pseudo_moves(from, en_passant, &mut moves);
        moves
    }

    pub(crate) fn push_pseudo_moves(
        &self,
        from: Square,
        en_passant: Option<Square>,
        moves: &mut MoveList,
    ) {
        let Some((color, piece)) = self.piece_at(from) else {
            return;
        };
        match piece {
            Piece::Pawn => self.push_pawn_moves(from, color, en_passant, moves),
            Piece::Knight => self.push_leaper_moves(from, color, KNIGHT_ATTACKS[from.index()], moves),
            Piece::King => self.push_leaper_moves(from, color, KING_ATTACKS[from.index()], moves),
            Piece::Bishop => self.push_slider_moves(from, color, &DIAGONAL, moves),
            Piece::Rook => self.push_slider_moves(from, color, &ORTHOGONAL, moves),
            Piece::Queen => {
                self.push_slider_moves(from, color, &ORTHOGONAL, moves);
                self.push_slider_moves(from, color, &DIAGONAL, moves);
            }
        }
    }

    fn push_pawn_moves(
        &self,
        from: Square,
        color: Color,
        en_passant: Option<Square>,
        moves: &mut MoveList,
    ) {
        let dir = color.pawn_direction();
        let promotes = |to: Square| to.rank() == color.pawn_promotion_rank();

        if let Some(one) = from.offset(dir, 0) {
            if self.is_empty(one) {
                if promotes(one) {
                    for piece in PROMOTION_PIECES {
                        moves.push(Move::promotion(from, one, piece, false));
                    }
                } else {
                    moves.push(Move::quiet(from, one));
                    if from.rank() == color.pawn_start_rank() {
                        if let Some(two) = one.offset(dir, 0) {
                            if self.is_empty(two) {
                                moves.push(Move::double_pawn_push(from, two));
                            }
                        }
                    }
                }
            }
        }

        for to in squares(PAWN_ATTACKS[color.index()][from.index()]) {
            match self.color_at(to) {
                Some(c) if c != color => {
                    if promotes(to) {
                        for piece in PROMOTION_PIECES {
                            moves.push(Move::promotion(from, to, piece, true));
                        }
                    } else {
                        moves.push(Move::capture(from, to));
                    }
                }
                None if en_passant == Some(to) => moves.push(Move::en_passant(from, to)),
                _ => {}
            }
        }
    }

    fn push_leaper_moves(&self, from: Square, color: Color, targets: u64, moves: &mut MoveList) {
        for to in squares(targets) {
            match self.color_at(to) {
                None => moves.push(Move::quiet(from, to)),
                Some(c) if c != color => moves.push(Move::capture(from, to)),
                Some(_) => {}
            }
        }
    }

    fn push_slider_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(dr, df) in directions {
            let mut cursor = from.offset(dr, df);
            while let Some(to) = cursor {
                match self.color_at(to) {
                    None => moves.push(Move::quiet(from, to)),
                    Some(c) => {
                        if c != color {
                            moves.push(Move::capture(from, to));
                        }
                        break;
                    }
                }
                cursor = to.offset(dr, df);
            }
        }
    }

    /// Number of squares the piece on `from` reaches (empty or enemy-occupied).
    ///
    /// Pawns count only their capture squares. Used as a mobility measure.
    #[must_use]
    pub(crate) fn reach_count(&self, from: Square) -> u32 {
        let Some((color, piece)) = self.piece_at(from) else {
            return 0;
        };
        let not_own = |to: Square| self.color_at(to) != Some(color);
        let leaper = |mask: u64| squares(mask).filter(|&to| not_own(to)).count() as u32;
        let rays = |dirs: &[(i8, i8)]| {
            let mut n = 0;
            for &(dr, df) in dirs {
                let mut cursor = from.offset(dr, df);
                while let Some(to) = cursor {
                    match self.color_at(to) {
                        None => n += 1,
                        Some(c) => {
                            if c != color {
                                n += 1;
                            }
                            break;
                        }
                    }
                    cursor = to.offset(dr, df);
                }
            }
            n
        };
        match piece {
            Piece::Pawn => leaper(PAWN_ATTACKS[color.index()][from.index()]),
            Piece::Knight => leaper(KNIGHT_ATTACKS[from.index()]),
            Piece::King => leaper(KING_ATTACKS[from.index()]),
            Piece::Bishop => rays(&DIAGONAL),
            Piece::Rook => rays(&ORTHOGONAL),
            Piece::Queen => rays(&ORTHOGONAL) + rays(&DIAGONAL),
        }
    }

    /// Whether any piece of `by` attacks `sq`.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // A pawn of `by` attacks `sq` iff a pawn of the other colour on `sq`
        // would attack the pawn's square.
        let pawn_sources = PAWN_ATTACKS[by.opponent().index()][sq.index()];
        if squares(pawn_sources).any(|s| self.has(s, by, Piece::Pawn)) {
            return true;
        }
        if squares(KNIGHT_ATTACKS[sq.index()]).any(|s| self.has(s, by, Piece::Knight)) {
            return true;
        }
        if squares(KING_ATTACKS[sq.index()]).any(|s| self.has(s, by, Piece::King)) {
            return true;
        }
        self.ray_hits(sq, by, &ORTHOGONAL, Piece::Rook)
            || self.ray_hits(sq, by, &DIAGONAL, Piece::Bishop)
    }

    fn ray_hits(&self, sq: Square, by: Color, directions: &[(i8, i8)], slider: Piece) -> bool {
        for &(dr, df) in directions {
            let mut cursor = sq.offset(dr, df);
            while let Some(s) = cursor {
                if let Some((color, piece)) = self.piece_at(s) {
                    if color == by && (piece == slider || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                cursor = s.offset(dr, df);
            }
        }
        false
    }

    /// Whether the king of `color` is attacked. A board without that king is never in check.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|k| self.is_square_attacked(k, color.opponent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn starting_knight_has_two_moves() {
        let board = Board::starting();
        let moves = board.pseudo_moves(sq("g1"), None);
        let names: Vec<String> = moves.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["g1f3", "g1h3"]);
    }

    #[test]
    fn starting_pawn_has_single_and_double_push() {
        let board = Board::starting();
        let moves = board.pseudo_moves(sq("e2"), None);
        assert_eq!(moves.len(), 2);
        assert!(moves[1].is_double_pawn_push());
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(Board::starting().pseudo_moves(sq("e4"), None).is_empty());
    }

    #[test]
    fn pawn_promotes_on_last_rank() {
        let board = Board::from_fen_placement("1n2k3/P7/8/8/8/8/8/4K3").unwrap();
        let moves = board.pseudo_moves(sq("a7"), None);
        // four quiet promotions on a8, four capturing promotions on b8
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.is_promotion()));
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
    }

    #[test]
    fn en_passant_needs_target() {
        let board = Board::from_fen_placement("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
        assert_eq!(board.pseudo_moves(sq("e5"), None).len(), 1);
        let with_ep = board.pseudo_moves(sq("e5"), Some(sq("d6")));
        assert_eq!(with_ep.len(), 2);
        assert!(with_ep.iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn slider_attacks_stop_at_blockers() {
        let board = Board::from_fen_placement("4k3/8/8/8/8/8/4P3/R3K2r").unwrap();
        assert!(board.is_square_attacked(sq("e1"), Color::Black));
        assert!(board.is_square_attacked(sq("d1"), Color::White));
        // the white king on e1 shields d1 from the h1 rook
        assert!(!board.is_square_attacked(sq("d1"), Color::Black));
        assert!(!board.is_square_attacked(sq("e8"), Color::White));
    }

    #[test]
    fn pawn_attack_direction() {
        let board = Board::from_fen_placement("4k3/8/8/8/3p4/8/8/4K3").unwrap();
        assert!(board.is_square_attacked(sq("c3"), Color::Black));
        assert!(board.is_square_attacked(sq("e3"), Color::Black));
        assert!(!board.is_square_attacked(sq("c5"), Color::Black));
    }
}
