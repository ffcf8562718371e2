//! Iterative-deepening negamax search.
//!
//! [`Searcher`] owns a [`TranspositionTable`] and runs a node-budgeted
//! alpha-beta search over [`Position`]s. Scores are always from the point of
//! view of the side to move in the searched position.
//!
//! # Example
//! ```
//! use chess_opponent::position::Position;
//! use chess_opponent::search::Searcher;
//!
//! let mut searcher = Searcher::new();
//! let result = searcher.search(&Position::initial(), 2_000);
//! assert!(result.best_move.is_some());
//! ```

mod move_order;
mod negamax;

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::Move;
use crate::config::EngineConfig;
use crate::position::Position;
use crate::tt::TranspositionTable;

use negamax::SearchContext;

/// Score of delivering mate at the root; mate in `n` plies scores `MATE_VALUE - n`.
pub const MATE_VALUE: i32 = 30_000;

/// Deepest iteration the searcher will run.
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Scores with absolute value >= this are forced mates.
pub const MATE_THRESHOLD: i32 = MATE_VALUE - MAX_SEARCH_DEPTH as i32;

/// Signed distance to mate in plies for a mate score.
///
/// Positive when the side to move mates, negative when it is mated, `None`
/// for ordinary scores.
#[must_use]
pub fn mate_distance(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some(MATE_VALUE - score)
    } else if score <= -MATE_THRESHOLD {
        Some(-(MATE_VALUE + score))
    } else {
        None
    }
}

/// Outcome of one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// `None` only when the root has no legal move.
    pub best_move: Option<Move>,
    /// From the root side to move's point of view.
    pub score: i32,
    pub nodes: u64,
    /// Deepest completed iteration; 0 when only the fallback ran.
    pub depth: u32,
    pub elapsed: Duration,
}

impl SearchResult {
    #[must_use]
    pub fn is_mate(&self) -> bool {
        mate_distance(self.score).is_some()
    }

    #[must_use]
    pub fn mate_distance(&self) -> Option<i32> {
        mate_distance(self.score)
    }
}

/// A transposition-table-backed searcher.
pub struct Searcher {
    config: EngineConfig,
    tt: TranspositionTable,
}

impl Searcher {
    #[must_use]
    pub fn new() -> Self {
        Searcher::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let tt = TranspositionTable::new(config.tt_mb);
        Searcher { config, tt }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration, rebuilding the table if its size changed.
    pub fn set_config(&mut self, config: EngineConfig) {
        if config.tt_mb != self.config.tt_mb {
            self.tt = TranspositionTable::new(config.tt_mb);
        }
        self.config = config;
    }

    #[must_use]
    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned so far (between independent games).
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    /// Search `root` with at most `node_budget` nodes.
    ///
    /// Returns the deepest completed iteration. For a non-terminal root the
    /// result always carries a move: if not even depth 1 completes, every
    /// legal move is scored one ply deep instead.
    pub fn search(&mut self, root: &Position, node_budget: u64) -> SearchResult {
        self.search_to_depth(root, node_budget, self.config.max_depth)
    }

    /// As [`Searcher::search`], stopping after `max_depth` iterations.
    pub fn search_to_depth(
        &mut self,
        root: &Position,
        node_budget: u64,
        max_depth: u32,
    ) -> SearchResult {
        let start = Instant::now();
        self.tt.new_generation();

        let moves = root.legal_moves();
        if moves.is_empty() {
            let score = if root.is_in_check() { -MATE_VALUE } else { 0 };
            return SearchResult {
                best_move: None,
                score,
                nodes: 1,
                depth: 0,
                elapsed: start.elapsed(),
            };
        }

        let mut ctx = SearchContext::new(
            &mut self.tt,
            node_budget,
            start,
            self.config.time_cap,
            self.config.check_interval,
            root.hash(),
        );

        let mut completed: Option<(Move, i32, u32)> = None;
        for depth in 1..=max_depth.clamp(1, MAX_SEARCH_DEPTH) {
            let Some((mv, score)) = ctx.search_root(root, &moves, depth) else {
                break;
            };
            debug!(
                "depth {} score {} nodes {} best {} time {:?}",
                depth,
                score,
                ctx.nodes(),
                mv,
                start.elapsed()
            );
            completed = Some((mv, score, depth));
            if score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        let nodes = ctx.nodes();
        match completed {
            Some((mv, score, depth)) => SearchResult {
                best_move: Some(mv),
                score,
                nodes,
                depth,
                elapsed: start.elapsed(),
            },
            None => {
                let (mv, score) = fallback(root);
                SearchResult {
                    best_move: Some(mv),
                    score,
                    nodes: nodes + moves.len() as u64,
                    depth: 0,
                    elapsed: start.elapsed(),
                }
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

/// Score every legal move one ply deep and keep the first best.
/// The caller guarantees `root` has a legal move.
fn fallback(root: &Position) -> (Move, i32) {
    let mut best: Option<(Move, i32)> = None;
    for &mv in root.legal_moves().iter() {
        let child = root.play(mv);
        let score = if child.is_terminal() {
            if child.is_in_check() {
                MATE_VALUE - 1
            } else {
                0
            }
        } else {
            -child.evaluate()
        };
        trace!("fallback {} scores {}", mv, score);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((mv, score));
        }
    }
    best.unwrap_or((Move::null(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searcher() -> Searcher {
        Searcher::with_config(EngineConfig::default().with_tt_mb(1).with_time_cap(None))
    }

    #[test]
    fn mate_distance_signs() {
        assert_eq!(mate_distance(MATE_VALUE - 1), Some(1));
        assert_eq!(mate_distance(-(MATE_VALUE - 2)), Some(-2));
        assert_eq!(mate_distance(-MATE_VALUE), Some(0));
        assert_eq!(mate_distance(350), None);
        assert_eq!(mate_distance(MATE_THRESHOLD - 1), None);
    }

    #[test]
    fn zero_budget_still_returns_a_move() {
        let mut s = searcher();
        let result = s.search(&Position::initial(), 0);
        assert_eq!(result.depth, 0);
        let mv = result.best_move.unwrap();
        assert!(Position::initial().legal_moves().contains(mv));
    }

    #[test]
    fn fallback_finds_mate_in_one() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1").unwrap();
        let (mv, score) = fallback(&pos);
        assert_eq!(mv.to_string(), "e1e8");
        assert_eq!(score, MATE_VALUE - 1);
    }

    #[test]
    fn checkmated_root() {
        let pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let result = searcher().search(&pos, 1000);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE_VALUE);
    }

    #[test]
    fn stalemated_root() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let result = searcher().search(&pos, 1000);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn depth_limit_is_respected() {
        let mut s = searcher();
        let result = s.search_to_depth(&Position::initial(), 1_000_000, 2);
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn clear_resets_table() {
        let mut s = searcher();
        s.search(&Position::initial(), 2000);
        assert!(s.table().probe(Position::initial().hash()).is_some());
        s.clear();
        assert!(s.table().probe(Position::initial().hash()).is_none());
    }

    #[test]
    fn black_mate_in_one_scores_for_black() {
        let pos = Position::from_fen("4q1k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        let result = searcher().search(&pos, 10_000);
        assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("e8e1"));
        assert_eq!(result.score, MATE_VALUE - 1);
        assert_eq!(result.mate_distance(), Some(1));
    }
}
