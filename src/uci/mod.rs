//! Universal Chess Interface (UCI) protocol front end.
//!
//! Implements the subset a GUI or another program needs to play against the
//! built-in searcher: `uci`, `isready`, `ucinewgame`, `setoption`,
//! `position`, `go` and `quit`, plus the `perft` and `d` debugging commands.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

use crate::board::{FenError, MoveParseError};
use crate::config::{EngineConfig, OptionAction};
use crate::position::Position;
use crate::search::{mate_distance, SearchResult, Searcher};

pub mod command;

pub use command::{parse_uci_command, GoLimits, UciCommand};

/// Error type for UCI position command parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciError {
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),

    #[error("invalid move '{move_str}': {error}")]
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },

    #[error("missing required parts in position command")]
    MissingParts,
}

/// Parse the arguments of a `position` command.
///
/// Supports `startpos` and `fen <fields>`, optionally followed by
/// `moves <move1> <move2> ...`.
pub fn parse_position(args: &[String]) -> Result<Position, UciError> {
    let (mut position, rest) = match args.first().map(String::as_str) {
        Some("startpos") => (Position::initial(), &args[1..]),
        Some("fen") => {
            let fields = &args[1..];
            let end = fields.iter().position(|t| t == "moves").unwrap_or(fields.len());
            if end == 0 {
                return Err(UciError::MissingParts);
            }
            (Position::from_fen(&fields[..end].join(" "))?, &fields[end..])
        }
        _ => return Err(UciError::MissingParts),
    };

    if rest.first().map(String::as_str) == Some("moves") {
        for move_str in &rest[1..] {
            position = position
                .apply_uci(move_str)
                .map_err(|error| UciError::InvalidMove {
                    move_str: move_str.clone(),
                    error,
                })?;
        }
    }
    Ok(position)
}

/// UCI `score` field: centipawns, or mate in moves (negative when mated).
#[must_use]
pub fn format_score(score: i32) -> String {
    match mate_distance(score) {
        Some(plies) if plies > 0 => format!("mate {}", (plies + 1) / 2),
        Some(plies) => format!("mate {}", plies / 2),
        None => format!("cp {score}"),
    }
}

/// Engine state behind the protocol loop.
pub struct UciHandler {
    config: EngineConfig,
    searcher: Searcher,
    position: Position,
}

impl UciHandler {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        UciHandler {
            searcher: Searcher::with_config(config.clone()),
            config,
            position: Position::initial(),
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Execute one command. Returns `false` once the loop should end.
    pub fn handle<W: Write>(&mut self, cmd: UciCommand, out: &mut W) -> io::Result<bool> {
        match cmd {
            UciCommand::Uci => self.identify(out)?,
            UciCommand::IsReady => writeln!(out, "readyok")?,
            UciCommand::UciNewGame => {
                self.searcher.clear();
                self.position = Position::initial();
            }
            UciCommand::SetOption { name, value } => {
                if let Some(OptionAction::ReinitHash(mb)) =
                    self.config.apply_option(&name, value.as_deref())
                {
                    debug!("transposition table resized to {} MB", mb);
                }
                self.searcher.set_config(self.config.clone());
            }
            UciCommand::Position(args) => match parse_position(&args) {
                Ok(position) => self.position = position,
                Err(err) => warn!("position command rejected: {}", err),
            },
            UciCommand::Go(limits) => {
                let result = self.go(limits);
                report(&result, self.searcher.table().hashfull_per_mille(), out)?;
            }
            UciCommand::Perft(depth) => {
                let start = Instant::now();
                let nodes = self.position.perft(depth);
                writeln!(
                    out,
                    "info string perft depth {} nodes {} time_ms {}",
                    depth,
                    nodes,
                    start.elapsed().as_millis()
                )?;
            }
            UciCommand::Display => writeln!(out, "{}", self.position)?,
            UciCommand::Stop => {}
            UciCommand::Quit => return Ok(false),
            UciCommand::Unknown(line) => warn!("unknown command: {}", line),
        }
        out.flush()?;
        Ok(true)
    }

    fn identify<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author the chess_opponent authors")?;
        writeln!(
            out,
            "option name Hash type spin default {} min 1 max 4096",
            self.config.tt_mb
        )?;
        writeln!(
            out,
            "option name Nodes type spin default {} min 1 max 100000000",
            self.config.node_budget
        )?;
        let movetime = self.config.time_cap.map_or(0, |d| d.as_millis());
        writeln!(
            out,
            "option name MoveTime type spin default {movetime} min 0 max 3600000"
        )?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {}",
            self.config.max_depth,
            crate::search::MAX_SEARCH_DEPTH
        )?;
        writeln!(out, "uciok")
    }

    fn go(&mut self, limits: GoLimits) -> SearchResult {
        let mut config = self.config.clone();
        if let Some(ms) = limits.movetime_ms {
            config.time_cap = Some(Duration::from_millis(ms));
        }
        let nodes = limits.nodes.unwrap_or(config.node_budget);
        let depth = limits.depth.unwrap_or(config.max_depth);
        self.searcher.set_config(config);
        self.searcher.search_to_depth(&self.position, nodes, depth)
    }
}

fn report<W: Write>(result: &SearchResult, hashfull: u32, out: &mut W) -> io::Result<()> {
    write!(
        out,
        "info depth {} score {} nodes {} time {} hashfull {}",
        result.depth,
        format_score(result.score),
        result.nodes,
        result.elapsed.as_millis(),
        hashfull
    )?;
    match result.best_move {
        Some(mv) => {
            writeln!(out, " pv {mv}")?;
            writeln!(out, "bestmove {mv}")
        }
        None => {
            writeln!(out)?;
            writeln!(out, "bestmove 0000")
        }
    }
}

/// Read commands from `input` until `quit` or end of input.
pub fn run_uci_loop<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<()> {
    let mut handler = UciHandler::new(EngineConfig::default());
    for line in input.lines() {
        let line = line?;
        let Some(cmd) = parse_uci_command(&line) else {
            continue;
        };
        if !handler.handle(cmd, &mut out)? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MATE_VALUE;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn run(script: &str) -> String {
        let mut out = Vec::new();
        run_uci_loop(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn position_startpos_with_moves() {
        let pos = parse_position(&args("startpos moves e2e4 e7e5")).unwrap();
        assert_eq!(
            pos.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
    }

    #[test]
    fn position_fen_without_counters() {
        let pos = parse_position(&args("fen 4k3/8/8/8/8/8/8/4K2R w K - moves e1g1")).unwrap();
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn position_errors() {
        assert_eq!(parse_position(&args("")), Err(UciError::MissingParts));
        assert_eq!(parse_position(&args("fen moves e2e4")), Err(UciError::MissingParts));
        assert!(matches!(
            parse_position(&args("startpos moves e2e5")),
            Err(UciError::InvalidMove { .. })
        ));
        assert!(matches!(
            parse_position(&args("fen not/a/fen w - - 0 1")),
            Err(UciError::InvalidFen(_))
        ));
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(-37), "cp -37");
        assert_eq!(format_score(MATE_VALUE - 1), "mate 1");
        assert_eq!(format_score(MATE_VALUE - 3), "mate 2");
        assert_eq!(format_score(-(MATE_VALUE - 2)), "mate -1");
        assert_eq!(format_score(-MATE_VALUE), "mate 0");
    }

    #[test]
    fn handshake_and_search() {
        let output = run("uci\nisready\nposition startpos moves e2e4\ngo nodes 2000\nquit\n");
        assert!(output.contains("uciok"));
        assert!(output.contains("readyok"));
        let best = output
            .lines()
            .find_map(|l| l.strip_prefix("bestmove "))
            .unwrap();
        let pos = Position::initial().apply_uci("e2e4").unwrap();
        assert!(pos.parse_move(best).is_ok(), "illegal bestmove {best}");
    }

    #[test]
    fn mated_position_reports_null_move() {
        let output = run("position fen 7k/6Q1/6K1/8/8/8/8/8 b - - 0 1\ngo nodes 100\n");
        assert!(output.contains("score mate 0"));
        assert!(output.contains("bestmove 0000"));
    }

    #[test]
    fn rejected_position_keeps_previous() {
        let mut handler = UciHandler::new(EngineConfig::default());
        let mut out = Vec::new();
        let cmd = parse_uci_command("position startpos moves e2e4").unwrap();
        handler.handle(cmd, &mut out).unwrap();
        let before = *handler.position();
        let cmd = parse_uci_command("position startpos moves e2e4 e2e4").unwrap();
        handler.handle(cmd, &mut out).unwrap();
        assert_eq!(*handler.position(), before);
    }

    #[test]
    fn perft_command() {
        let output = run("perft 2\n");
        assert!(output.contains("perft depth 2 nodes 400"));
    }
}
