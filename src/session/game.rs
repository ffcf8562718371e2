//! One game: its position, history and engine.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use parking_lot::Mutex;

use super::{DrawReason, GameStatus, GameView, Opponent, Outlook, SessionError, SessionId};
use crate::board::Move;
use crate::config::DispatchMode;
use crate::position::Position;
use crate::provider::{EngineError, MoveProvider};
use crate::search::SearchResult;

pub(super) type SharedProvider = Arc<Mutex<Box<dyn MoveProvider>>>;

type PendingReply = JoinHandle<Result<SearchResult, EngineError>>;

pub(super) struct Session {
    id: SessionId,
    opponent: Opponent,
    position: Position,
    /// Hashes of every position reached, current one last.
    history: Vec<u64>,
    provider: SharedProvider,
    dispatch: DispatchMode,
    node_budget: u64,
    pending: Option<PendingReply>,
    last_move: Option<Move>,
    engine_move: Option<Move>,
    engine_score: Option<i32>,
}

impl Session {
    pub(super) fn new(
        id: SessionId,
        opponent: Opponent,
        position: Position,
        provider: SharedProvider,
        dispatch: DispatchMode,
        node_budget: u64,
    ) -> Self {
        Session {
            id,
            opponent,
            position,
            history: vec![position.hash()],
            provider,
            dispatch,
            node_budget,
            pending: None,
            last_move: None,
            engine_move: None,
            engine_score: None,
        }
    }

    pub(super) fn status(&self) -> GameStatus {
        let pos = &self.position;
        if pos.is_checkmate() {
            GameStatus::Checkmate {
                winner: pos.side_to_move().opponent(),
            }
        } else if pos.is_stalemate() {
            GameStatus::Stalemate
        } else if pos.is_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if pos.is_fifty_move_draw() {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if self.repetitions() >= 3 {
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else {
            GameStatus::Ongoing
        }
    }

    fn repetitions(&self) -> usize {
        let current = self.position.hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    pub(super) fn view(&self) -> GameView {
        GameView {
            session: self.id,
            opponent: self.opponent,
            fen: self.position.to_fen(),
            board: self.position.diagram(),
            side_to_move: self.position.side_to_move(),
            last_move: self.last_move.map(|m| m.to_string()),
            engine_move: self.engine_move.map(|m| m.to_string()),
            status: self.status(),
            outlook: self
                .engine_score
                .map_or(Outlook::Unclear, Outlook::from_engine_score),
            thinking: self.pending.is_some(),
        }
    }

    /// Pick up a finished background reply. `EngineBusy` while it still runs.
    pub(super) fn settle(&mut self) -> Result<(), SessionError> {
        match &self.pending {
            Some(handle) if !handle.is_finished() => {
                warn!("session {} is busy", self.id);
                Err(SessionError::EngineBusy(self.id))
            }
            Some(_) => self.join_pending(),
            None => Ok(()),
        }
    }

    /// Block until a background reply, if any, has been applied.
    pub(super) fn join_pending(&mut self) -> Result<(), SessionError> {
        let Some(handle) = self.pending.take() else {
            return Ok(());
        };
        let result = handle.join().map_err(|_| EngineError::WorkerPanicked)??;
        self.apply_engine_result(result)
    }

    fn ensure_ongoing(&self) -> Result<(), SessionError> {
        let status = self.status();
        if status.is_over() {
            return Err(SessionError::GameOver {
                id: self.id,
                status,
            });
        }
        Ok(())
    }

    /// The player's move, followed by the engine's reply when it is the
    /// player's opponent.
    pub(super) fn play_move(&mut self, text: &str) -> Result<(), SessionError> {
        self.settle()?;
        self.ensure_ongoing()?;
        let mv = self.position.parse_move(text).map_err(|err| {
            warn!("session {}: rejected move '{}': {}", self.id, text, err);
            err
        })?;
        self.push(mv);
        self.last_move = Some(mv);
        self.engine_move = None;
        if self.opponent == Opponent::Engine {
            self.request_reply()?;
        }
        Ok(())
    }

    /// The engine moves for the player, then answers as the opponent.
    pub(super) fn auto_move(&mut self) -> Result<(), SessionError> {
        self.settle()?;
        self.ensure_ongoing()?;
        let result = self.provider.lock().analyse(&self.position, self.node_budget)?;
        let mv = result.best_move.ok_or(EngineError::NoMove)?;
        self.checked_push(mv)?;
        self.last_move = Some(mv);
        self.engine_move = None;
        if self.opponent == Opponent::Engine {
            self.request_reply()?;
        }
        Ok(())
    }

    fn request_reply(&mut self) -> Result<(), SessionError> {
        if self.status().is_over() {
            return Ok(());
        }
        match self.dispatch {
            DispatchMode::Inline => {
                let result = self.provider.lock().analyse(&self.position, self.node_budget)?;
                self.apply_engine_result(result)
            }
            DispatchMode::Background => {
                let provider = Arc::clone(&self.provider);
                let position = self.position;
                let budget = self.node_budget;
                debug!("session {}: reply search dispatched", self.id);
                self.pending = Some(thread::spawn(move || {
                    provider.lock().analyse(&position, budget)
                }));
                Ok(())
            }
        }
    }

    fn apply_engine_result(&mut self, result: SearchResult) -> Result<(), SessionError> {
        let Some(mv) = result.best_move else {
            return Ok(());
        };
        self.checked_push(mv)?;
        self.engine_move = Some(mv);
        self.engine_score = Some(result.score);
        debug!(
            "session {}: engine plays {} (score {}, depth {}, {} nodes)",
            self.id, mv, result.score, result.depth, result.nodes
        );
        Ok(())
    }

    /// Play a move that did not come from parsing, rejecting it if illegal.
    fn checked_push(&mut self, mv: Move) -> Result<(), EngineError> {
        if !self.position.legal_moves().contains(mv) {
            return Err(EngineError::IllegalReply {
                reply: mv.to_string(),
                fen: self.position.to_fen(),
            });
        }
        self.push(mv);
        Ok(())
    }

    fn push(&mut self, mv: Move) {
        self.position = self.position.play(mv);
        self.history.push(self.position.hash());
    }
}
