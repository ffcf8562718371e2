//! Move ordering utilities for search.

use crate::board::{Move, MoveList, Piece, ScoredMoveList};
use crate::position::Position;

/// Hash move (from transposition table) - highest priority
pub(crate) const TT_MOVE_SCORE: i32 = 1 << 20;

/// Base for captures, above any victim-minus-attacker swing
pub(crate) const CAPTURE_SCORE: i32 = 1 << 16;

/// Order `moves`: table move first, then captures by victim value minus
/// attacker value, then everything else in generation order.
pub(crate) fn order_moves(
    position: &Position,
    moves: &MoveList,
    tt_move: Option<Move>,
) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for &mv in moves.iter() {
        scored.push(mv, score_move(position, mv, tt_move));
    }
    scored.sort_by_score_desc();
    scored
}

fn score_move(position: &Position, mv: Move, tt_move: Option<Move>) -> i32 {
    if tt_move == Some(mv) {
        return TT_MOVE_SCORE;
    }
    if !mv.is_capture() {
        return 0;
    }
    let board = position.board();
    let attacker = board.piece_at(mv.from()).map_or(Piece::Pawn, |(_, p)| p);
    let victim = if mv.is_en_passant() {
        Piece::Pawn
    } else {
        board.piece_at(mv.to()).map_or(Piece::Pawn, |(_, p)| p)
    };
    CAPTURE_SCORE + victim.value() - attacker.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(fen: &str, tt_move: Option<&str>) -> Vec<String> {
        let pos = Position::from_fen(fen).unwrap();
        let tt_move = tt_move.map(|m| pos.parse_move(m).unwrap());
        order_moves(&pos, &pos.legal_moves(), tt_move)
            .iter()
            .map(|s| s.mv.to_string())
            .collect()
    }

    #[test]
    fn captures_rank_by_victim_minus_attacker() {
        // The pawn on e4 can take the queen on d5 or the knight on f5; the
        // rook on d1 can also take the queen.
        let order = ordered("4k3/8/8/3q1n2/4P3/8/8/3RK3 w - - 0 1", None);
        assert_eq!(&order[..3], &["e4d5", "d1d5", "e4f5"]);
    }

    #[test]
    fn table_move_comes_first() {
        let order = ordered("4k3/8/8/3q1n2/4P3/8/8/3RK3 w - - 0 1", Some("e1f2"));
        assert_eq!(order[0], "e1f2");
        assert_eq!(order[1], "e4d5");
    }

    #[test]
    fn quiet_moves_keep_generation_order() {
        let pos = Position::initial();
        let generated: Vec<String> = pos.legal_moves().iter().map(ToString::to_string).collect();
        assert_eq!(ordered(&pos.to_fen(), None), generated);
    }
}
