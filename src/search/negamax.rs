use std::time::{Duration, Instant};

use super::move_order::order_moves;
use super::{MATE_THRESHOLD, MATE_VALUE};
use crate::board::{Move, MoveList};
use crate::position::Position;
use crate::tt::{BoundType, TTEntry, TranspositionTable};

const INFINITY: i32 = MATE_VALUE + 1;

/// State for one `Searcher::search` call.
pub(super) struct SearchContext<'a> {
    tt: &'a mut TranspositionTable,
    nodes: u64,
    node_budget: u64,
    start: Instant,
    time_cap: Option<Duration>,
    check_interval: u64,
    aborted: bool,
    /// Hashes from the root to the current node.
    path: Vec<u64>,
}

impl<'a> SearchContext<'a> {
    pub(super) fn new(
        tt: &'a mut TranspositionTable,
        node_budget: u64,
        start: Instant,
        time_cap: Option<Duration>,
        check_interval: u64,
        root_hash: u64,
    ) -> Self {
        SearchContext {
            tt,
            nodes: 0,
            node_budget,
            start,
            time_cap,
            check_interval: check_interval.max(1),
            aborted: false,
            path: vec![root_hash],
        }
    }

    pub(super) fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Node budget spent, or the wall clock ran out at a check point.
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.nodes >= self.node_budget {
            self.aborted = true;
        } else if let Some(cap) = self.time_cap {
            if self.nodes > 0
                && self.nodes % self.check_interval == 0
                && self.start.elapsed() >= cap
            {
                self.aborted = true;
            }
        }
        self.aborted
    }

    /// One full-width pass at `depth`. `None` if the pass was cut short.
    pub(super) fn search_root(
        &mut self,
        root: &Position,
        moves: &MoveList,
        depth: u32,
    ) -> Option<(Move, i32)> {
        if self.should_stop() {
            return None;
        }
        self.nodes += 1;

        let hash = root.hash();
        let tt_move = self.tt.probe(hash).and_then(|e| e.best_move);
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for scored in order_moves(root, moves, tt_move).iter() {
            let child = root.play(scored.mv);
            let score = -self.visit(&child, depth - 1, -beta, -alpha, 1);
            if self.aborted {
                return None;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((scored.mv, score));
            }
            alpha = alpha.max(score);
        }

        let (mv, score) = best?;
        self.tt.store(
            hash,
            TTEntry::new(depth, score_to_tt(score, 0), BoundType::Exact, Some(mv)),
        );
        Some((mv, score))
    }

    fn visit(&mut self, pos: &Position, depth: u32, alpha: i32, beta: i32, ply: u32) -> i32 {
        self.path.push(pos.hash());
        let score = self.negamax(pos, depth, alpha, beta, ply);
        self.path.pop();
        score
    }

    fn negamax(&mut self, pos: &Position, depth: u32, mut alpha: i32, beta: i32, ply: u32) -> i32 {
        if self.should_stop() {
            return pos.evaluate();
        }
        self.nodes += 1;

        if pos.is_fifty_move_draw() || self.repeats_on_path(pos.hash()) {
            return 0;
        }

        if depth == 0 {
            if pos.is_terminal() {
                return terminal_score(pos, ply);
            }
            return pos.evaluate();
        }

        let hash = pos.hash();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(hash) {
            tt_move = entry.best_move;
            if entry.depth() >= depth {
                let score = score_from_tt(entry.score, ply);
                if entry.cuts_off(score, alpha, beta) {
                    return score;
                }
            }
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return terminal_score(pos, ply);
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for scored in order_moves(pos, &moves, tt_move).iter() {
            let child = pos.play(scored.mv);
            let score = -self.visit(&child, depth - 1, -beta, -alpha, ply + 1);
            if self.aborted {
                return best_score.max(score);
            }
            if score > best_score {
                best_score = score;
                best_move = Some(scored.mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > original_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.tt.store(
            hash,
            TTEntry::new(depth, score_to_tt(best_score, ply), bound, best_move),
        );
        best_score
    }

    /// The current node's hash occurs earlier on the path.
    fn repeats_on_path(&self, hash: u64) -> bool {
        // the last entry is the current node itself
        let ancestors = &self.path[..self.path.len().saturating_sub(1)];
        ancestors.iter().rev().any(|&h| h == hash)
    }
}

/// Mate or stalemate score for a node with no legal moves.
fn terminal_score(pos: &Position, ply: u32) -> i32 {
    if pos.is_in_check() {
        -(MATE_VALUE - ply as i32)
    } else {
        0
    }
}

/// Mate scores are stored relative to the node, not the root.
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_mate_scores_are_node_relative() {
        let at_ply_3 = MATE_VALUE - 5;
        let stored = score_to_tt(at_ply_3, 3);
        assert_eq!(stored, MATE_VALUE - 2);
        assert_eq!(score_from_tt(stored, 3), at_ply_3);
        assert_eq!(score_from_tt(stored, 1), MATE_VALUE - 3);
        assert_eq!(score_to_tt(-at_ply_3, 3), -(MATE_VALUE - 2));
        assert_eq!(score_to_tt(120, 7), 120);
    }

    #[test]
    fn budget_stops_search() {
        let mut tt = TranspositionTable::new(1);
        let root = Position::initial();
        let moves = root.legal_moves();
        let mut ctx = SearchContext::new(&mut tt, 10, Instant::now(), None, 2048, root.hash());
        assert!(ctx.search_root(&root, &moves, 1).is_none());
        assert_eq!(ctx.nodes(), 10);
    }

    #[test]
    fn repetition_on_path_is_a_draw() {
        let mut tt = TranspositionTable::new(1);
        let start = Position::initial();
        let back = ["g1f3", "g8f6", "f3g1", "f6g8"]
            .iter()
            .try_fold(start, |p, m| p.apply_uci(m))
            .unwrap();
        assert_eq!(back.hash(), start.hash());

        let mut ctx = SearchContext::new(&mut tt, 1_000, Instant::now(), None, 2048, start.hash());
        assert_eq!(ctx.visit(&back, 3, -INFINITY, INFINITY, 4), 0);
    }
}
