//! Move providers: anything that can choose a move for a [`Position`].
//!
//! The in-process [`Searcher`] and an external engine driven over UCI
//! ([`UciEngine`]) both implement [`MoveProvider`], so sessions can swap
//! backends without caring where the move came from.

mod uci_engine;

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::board::Move;
use crate::position::Position;
use crate::search::{SearchResult, Searcher};

pub use uci_engine::UciEngine;

/// Failures of a move provider.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("engine closed its output while waiting for '{expected}'")]
    UnexpectedEof { expected: String },

    #[error("unexpected engine output: {line}")]
    Protocol { line: String },

    #[error("engine replied with illegal move '{reply}' in {fen}")]
    IllegalReply { reply: String, fen: String },

    #[error("engine returned no move for a position with legal moves")]
    NoMove,

    #[error("engine worker thread panicked")]
    WorkerPanicked,
}

/// A backend that analyses positions.
pub trait MoveProvider: Send {
    /// Search `position` with roughly `node_budget` nodes.
    fn analyse(&mut self, position: &Position, node_budget: u64)
        -> Result<SearchResult, EngineError>;

    /// The move [`MoveProvider::analyse`] settles on.
    fn best_move(&mut self, position: &Position, node_budget: u64) -> Result<Move, EngineError> {
        self.analyse(position, node_budget)?
            .best_move
            .ok_or(EngineError::NoMove)
    }

    /// Forget state carried over from a previous game.
    fn new_game(&mut self) -> Result<(), EngineError>;

    fn name(&self) -> String;
}

impl MoveProvider for Searcher {
    fn analyse(
        &mut self,
        position: &Position,
        node_budget: u64,
    ) -> Result<SearchResult, EngineError> {
        Ok(self.search(position, node_budget))
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.clear();
        Ok(())
    }

    fn name(&self) -> String {
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_string()
    }
}

impl<P: MoveProvider + ?Sized> MoveProvider for Box<P> {
    fn analyse(
        &mut self,
        position: &Position,
        node_budget: u64,
    ) -> Result<SearchResult, EngineError> {
        (**self).analyse(position, node_budget)
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        (**self).new_game()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// One engine shared by several owners; calls are serialised by the lock.
impl<P: MoveProvider + ?Sized> MoveProvider for Arc<Mutex<P>> {
    fn analyse(
        &mut self,
        position: &Position,
        node_budget: u64,
    ) -> Result<SearchResult, EngineError> {
        self.lock().analyse(position, node_budget)
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.lock().new_game()
    }

    fn name(&self) -> String {
        self.lock().name()
    }
}
