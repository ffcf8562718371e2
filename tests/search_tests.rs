//! Search tests to verify the engine finds correct moves in various positions.

use chess_opponent::config::EngineConfig;
use chess_opponent::position::Position;
use chess_opponent::search::{SearchResult, Searcher, MATE_VALUE};

fn searcher() -> Searcher {
    Searcher::with_config(EngineConfig::default().with_time_cap(None))
}

fn search(fen: &str, budget: u64) -> SearchResult {
    let pos = Position::from_fen(fen).unwrap();
    searcher().search(&pos, budget)
}

fn best_uci(result: &SearchResult) -> String {
    result.best_move.expect("Should find a move").to_string()
}

/// The opening position is roughly balanced and every reply is one of the 20 legal moves
#[test]
fn opening_move_is_legal_and_balanced() {
    let start = Position::initial();
    let result = searcher().search(&start, 10_000);
    let mv = result.best_move.expect("Should find a move");
    assert!(start.legal_moves().contains(mv), "{mv} is not legal");
    assert!(result.score.abs() <= 100, "score {} out of range", result.score);
    assert!(result.depth >= 2, "only reached depth {}", result.depth);
}

/// Test that the engine finds a simple mate in 1
#[test]
fn finds_mate_in_one_back_rank() {
    // White to move, Qe8# is mate
    let result = search("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 10_000);
    assert_eq!(best_uci(&result), "e1e8", "Should find Qe8# (back rank mate)");
    assert_eq!(result.score, MATE_VALUE - 1);
}

/// Test that the engine finds a simple mate in 1 with queen
#[test]
fn finds_mate_in_one_queen() {
    // White to move, Qxf7# is mate
    let result = search(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        10_000,
    );
    assert_eq!(best_uci(&result), "h5f7", "Should find Qxf7# (scholar's mate)");
    assert_eq!(result.score, MATE_VALUE - 1);
}

/// Test that the engine captures an undefended queen
#[test]
fn captures_hanging_queen() {
    let result = search("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", 10_000);
    assert_eq!(best_uci(&result), "d1d5");
    assert!(result.score > 300);
}

/// Test that search handles single legal move positions
#[test]
fn single_legal_move() {
    // Ka2 and Kb1 are covered; the king must take the rook
    let result = search("k7/8/8/8/8/8/1r6/K6r w - - 0 1", 10_000);
    assert_eq!(best_uci(&result), "a1b2");
}

/// Test that search returns no move for a checkmated root
#[test]
fn no_move_in_checkmate() {
    let pos = Position::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    assert!(pos.is_checkmate(), "Position should be checkmate");

    let result = searcher().search(&pos, 10_000);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_VALUE);
}

/// Test that stalemate scores as a draw
#[test]
fn no_move_in_stalemate() {
    let result = search("k7/8/1QK5/8/8/8/8/8 b - - 0 1", 10_000);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

/// Same position, budget and table state give the same answer
#[test]
fn search_is_deterministic() {
    let pos = Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
        .unwrap();
    let a = searcher().search(&pos, 6_000);
    let b = searcher().search(&pos, 6_000);
    assert_eq!(
        (a.best_move, a.score, a.nodes, a.depth),
        (b.best_move, b.score, b.nodes, b.depth)
    );

    let mut reused = searcher();
    let first = reused.search(&pos, 6_000);
    reused.clear();
    let second = reused.search(&pos, 6_000);
    assert_eq!((first.best_move, first.score), (second.best_move, second.score));
}

/// More budget never completes a shallower iteration
#[test]
fn budget_monotonicity() {
    let pos = Position::initial();
    let mut last_depth = 0;
    for budget in [200, 1_000, 5_000, 20_000] {
        let result = searcher().search(&pos, budget);
        assert!(
            result.depth >= last_depth,
            "budget {budget} reached depth {} after {last_depth}",
            result.depth
        );
        last_depth = result.depth;
    }
}

/// A mate found with a small budget is still found with a larger one
#[test]
fn mate_survives_larger_budgets() {
    for budget in [100, 1_000, 10_000, 50_000] {
        let result = search("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", budget);
        assert_eq!(result.score, MATE_VALUE - 1, "budget {budget}");
    }
}

/// Black to move: scores are from the side to move's point of view
#[test]
fn mate_for_black_scores_positive() {
    let result = search("4k2q/8/8/8/8/8/8/4K3 b - - 0 1", 10_000);
    assert!(result.score > 0);

    let result = search("4q1k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", 10_000);
    assert_eq!(best_uci(&result), "e8e1");
    assert_eq!(result.mate_distance(), Some(1));
}

/// The searcher does not walk into a mate in one
#[test]
fn defends_against_back_rank_mate() {
    // White threatens Qe8#; Black must give the king air or cover e8
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 b - - 0 1").unwrap();
    let result = searcher().search(&pos, 20_000);
    let mv = result.best_move.expect("Should find a move");
    let after = pos.apply(mv).unwrap();
    let mated_next = after.legal_moves().iter().any(|&reply| {
        after.apply(reply).map(|p| p.is_checkmate()).unwrap_or(false)
    });
    assert!(!mated_next, "{mv} allows mate");
}

/// The wall-clock cap still yields a move
#[test]
fn time_cap_returns_a_move() {
    let mut s = Searcher::with_config(
        EngineConfig::default()
            .with_time_cap(Some(std::time::Duration::from_millis(1)))
            .with_check_interval(64),
    );
    let result = s.search(&Position::initial(), u64::MAX);
    assert!(result.best_move.is_some());
    assert!(result.depth < 64);
}
