//! An external engine driven over the UCI protocol.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use super::{EngineError, MoveProvider};
use crate::position::Position;
use crate::search::{SearchResult, MATE_VALUE};

/// How long `Drop` waits for the child to honour `quit`.
const QUIT_GRACE: Duration = Duration::from_millis(500);
const QUIT_POLL: Duration = Duration::from_millis(10);

/// A child process speaking UCI on stdin/stdout.
pub struct UciEngine {
    name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Start `program` and complete the `uci`/`isready` handshake.
    pub fn spawn<S, I, A>(program: S, args: I) -> Result<Self, EngineError>
    where
        S: AsRef<OsStr>,
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let program_name = program.as_ref().to_string_lossy().into_owned();
        let mut child = Command::new(program.as_ref())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Protocol {
                line: "engine pipes unavailable".to_string(),
            });
        };

        let mut engine = UciEngine {
            name: program_name,
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };
        engine.handshake()?;
        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        loop {
            let line = self.read_line("uciok")?;
            if line == "uciok" {
                break;
            }
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.trim().to_string();
            }
        }
        self.sync()?;
        debug!("UCI engine '{}' ready", self.name);
        Ok(())
    }

    /// `isready` and wait for `readyok`.
    fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        while self.read_line("readyok")? != "readyok" {}
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        trace!(">> {}", command);
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Next non-empty line, trimmed. `expected` names what the caller waits for.
    fn read_line(&mut self, expected: &str) -> Result<String, EngineError> {
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(EngineError::UnexpectedEof {
                    expected: expected.to_string(),
                });
            }
            let line = line.trim();
            if !line.is_empty() {
                trace!("<< {}", line);
                return Ok(line.to_string());
            }
        }
    }
}

/// Fields of one `info` line that a search result needs.
#[derive(Debug, Default, PartialEq, Eq)]
struct InfoLine {
    depth: Option<u32>,
    nodes: Option<u64>,
    score: Option<i32>,
}

fn parse_info(line: &str) -> InfoLine {
    let mut info = InfoLine::default();
    let mut tokens = line.split_whitespace().skip(1);
    while let Some(token) = tokens.next() {
        match token {
            "depth" => info.depth = tokens.next().and_then(|v| v.parse().ok()),
            "nodes" => info.nodes = tokens.next().and_then(|v| v.parse().ok()),
            "score" => {
                let kind = tokens.next();
                let value = tokens.next().and_then(|v| v.parse::<i32>().ok());
                info.score = match (kind, value) {
                    (Some("cp"), Some(cp)) => Some(cp),
                    (Some("mate"), Some(moves)) => Some(mate_score(moves)),
                    _ => info.score,
                };
            }
            // the rest of the line is free text
            "string" | "pv" => break,
            _ => {}
        }
    }
    info
}

/// UCI counts mates in moves; scores count plies.
fn mate_score(moves: i32) -> i32 {
    if moves > 0 {
        MATE_VALUE - (2 * moves - 1)
    } else {
        -(MATE_VALUE + 2 * moves)
    }
}

impl MoveProvider for UciEngine {
    fn analyse(
        &mut self,
        position: &Position,
        node_budget: u64,
    ) -> Result<SearchResult, EngineError> {
        let start = Instant::now();
        let fen = position.to_fen();
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go nodes {}", node_budget.max(1)))?;

        let mut last = InfoLine::default();
        loop {
            let line = self.read_line("bestmove")?;
            if line.starts_with("info") {
                let info = parse_info(&line);
                last.depth = info.depth.or(last.depth);
                last.nodes = info.nodes.or(last.nodes);
                last.score = info.score.or(last.score);
                continue;
            }
            let Some(rest) = line.strip_prefix("bestmove") else {
                warn!("ignoring engine output: {}", line);
                continue;
            };

            let reply = rest.split_whitespace().next().unwrap_or("(none)");
            let best_move = if reply == "(none)" || reply == "0000" {
                if !position.is_terminal() {
                    return Err(EngineError::NoMove);
                }
                None
            } else {
                let mv = position
                    .parse_move(reply)
                    .map_err(|_| EngineError::IllegalReply {
                        reply: reply.to_string(),
                        fen: fen.clone(),
                    })?;
                Some(mv)
            };

            let score = match (best_move, last.score) {
                (None, _) if position.is_in_check() => -MATE_VALUE,
                (None, _) => 0,
                (Some(_), score) => score.unwrap_or(0),
            };
            return Ok(SearchResult {
                best_move,
                score,
                nodes: last.nodes.unwrap_or(0),
                depth: last.depth.unwrap_or(0),
                elapsed: start.elapsed(),
            });
        }
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.send("ucinewgame")?;
        self.sync()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if self.send("quit").is_err() {
            warn!("engine '{}' did not accept quit", self.name);
        }
        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) if Instant::now() < deadline => thread::sleep(QUIT_POLL),
                _ => break,
            }
        }
        warn!("engine '{}' ignored quit; killing it", self.name);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lines() {
        let info = parse_info("info depth 7 seldepth 9 score cp -34 nodes 12345 nps 1 pv e2e4 e7e5");
        assert_eq!(
            info,
            InfoLine {
                depth: Some(7),
                nodes: Some(12345),
                score: Some(-34),
            }
        );
        assert_eq!(parse_info("info string depth 3").depth, None);
    }

    #[test]
    fn mate_scores_convert_to_plies() {
        assert_eq!(parse_info("info depth 2 score mate 1").score, Some(MATE_VALUE - 1));
        assert_eq!(mate_score(3), MATE_VALUE - 5);
        assert_eq!(mate_score(-2), -(MATE_VALUE - 4));
        assert_eq!(mate_score(0), -MATE_VALUE);
    }

    #[test]
    fn spawning_a_missing_program_fails() {
        let result = UciEngine::spawn("./definitely-not-an-engine", std::iter::empty::<&str>());
        assert!(matches!(result, Err(EngineError::Spawn { .. })));
    }
}
