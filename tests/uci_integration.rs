use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use chess_opponent::config::EngineConfig;
use chess_opponent::position::Position;
use chess_opponent::provider::{EngineError, MoveProvider, UciEngine};
use chess_opponent::search::MATE_VALUE;
use chess_opponent::session::{Opponent, SessionManager};
use chess_opponent::uci::parse_position;

const ENGINE: &str = env!("CARGO_BIN_EXE_chess_opponent");

fn spawn_engine() -> UciEngine {
    UciEngine::spawn(ENGINE, std::iter::empty::<&str>()).expect("failed to spawn engine binary")
}

#[test]
fn uci_smoke_test_returns_legal_move() {
    let mut child = Command::new(ENGINE)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .write_all(b"uci\nisready\nposition startpos moves e2e4\ngo nodes 3000\n")
        .unwrap();

    let mut output = String::new();
    let mut bestmove_line = None;
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            break;
        }
        output.push_str(&line);
        if line.starts_with("bestmove") {
            bestmove_line = Some(line);
            break;
        }
    }

    stdin.write_all(b"quit\n").unwrap();
    let _ = child.wait();

    assert!(output.contains("uciok"));
    assert!(output.contains("readyok"));
    assert!(output.contains("option name Hash"));
    assert!(output.contains("hashfull"));

    let bestmove = bestmove_line.expect("no bestmove found");
    let parts: Vec<&str> = bestmove.split_whitespace().collect();
    assert!(parts.len() >= 2, "bestmove missing move: {}", bestmove);
    let mv = parts[1];
    assert_ne!(mv, "0000", "engine returned null move");

    let args: Vec<String> = ["startpos", "moves", "e2e4"].map(String::from).to_vec();
    let position = parse_position(&args).unwrap();
    assert!(position.parse_move(mv).is_ok(), "bestmove not legal in position: {}", mv);
}

#[test]
fn uci_reports_options_and_handles_setoption() {
    let mut child = Command::new(ENGINE)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"uci\nsetoption name Hash value 4\nsetoption name Nodes value 50000\nsetoption name MoveTime value 0\nisready\nposition startpos\ngo depth 2\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("option name Hash"));
    assert!(stdout.contains("option name Nodes"));
    assert!(stdout.contains("option name MoveTime"));
    assert!(stdout.contains("readyok"));
    assert!(stdout.contains("info depth 2"));
    assert!(stdout.contains("bestmove "));
}

#[test]
fn adapter_plays_against_own_binary() {
    let mut engine = spawn_engine();
    assert!(engine.name().starts_with("chess_opponent"));
    engine.new_game().unwrap();

    let pos = Position::initial().apply_uci("d2d4").unwrap();
    let result = engine.analyse(&pos, 3_000).unwrap();
    let mv = result.best_move.expect("engine should move");
    assert!(pos.legal_moves().contains(mv));
    assert!(result.depth >= 1);
    assert!(result.nodes > 0);
}

#[test]
fn adapter_reports_mates() {
    let mut engine = spawn_engine();

    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1").unwrap();
    let result = engine.analyse(&pos, 10_000).unwrap();
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("e1e8"));
    assert_eq!(result.score, MATE_VALUE - 1);

    let mated = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let result = engine.analyse(&mated, 100).unwrap();
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_VALUE);
    assert!(matches!(
        engine.best_move(&mated, 100),
        Err(EngineError::NoMove)
    ));
}

#[test]
fn sessions_can_use_an_external_engine() {
    let manager = SessionManager::new(EngineConfig::default().with_node_budget(2_000), || {
        Ok(Box::new(spawn_engine()) as Box<dyn MoveProvider>)
    });
    let game = manager.new_game(Opponent::Engine).unwrap();
    let view = manager.play_move(game.session, "e2e4").unwrap();
    assert!(view.engine_move.is_some());
    manager.end_game(game.session).unwrap();
}
