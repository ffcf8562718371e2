//! Concurrent game sessions against a move provider.
//!
//! A [`SessionManager`] owns any number of independent games. Each game has
//! its own [`Position`], move history and provider instance (so its own
//! transposition table), and sits behind its own lock; the id map is behind
//! a read-write lock. Requests on different sessions never wait for each
//! other.
//!
//! # Example
//! ```
//! use chess_opponent::config::EngineConfig;
//! use chess_opponent::session::{Opponent, SessionManager};
//!
//! let manager = SessionManager::in_process(EngineConfig::default().with_node_budget(2_000));
//! let game = manager.new_game(Opponent::Engine).unwrap();
//! let view = manager.play_move(game.session, "e2e4").unwrap();
//! assert!(view.engine_move.is_some());
//! ```

mod error;
mod game;
mod view;

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, RwLock};

use crate::config::EngineConfig;
use crate::position::Position;
use crate::provider::{EngineError, MoveProvider};
use crate::search::Searcher;

use game::{Session, SharedProvider};

pub use error::{ErrorKind, SessionError};
pub use view::{DrawReason, GameStatus, GameView, Opponent, Outlook, SessionId};

/// Builds one provider per new session.
pub type ProviderFactory =
    Box<dyn Fn() -> Result<Box<dyn MoveProvider>, EngineError> + Send + Sync>;

pub struct SessionManager {
    config: EngineConfig,
    factory: ProviderFactory,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new<F>(config: EngineConfig, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn MoveProvider>, EngineError> + Send + Sync + 'static,
    {
        SessionManager {
            config,
            factory: Box::new(factory),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Sessions backed by the built-in searcher, one table each.
    #[must_use]
    pub fn in_process(config: EngineConfig) -> Self {
        let searcher_config = config.clone();
        SessionManager::new(config, move || {
            Ok(Box::new(Searcher::with_config(searcher_config.clone())) as Box<dyn MoveProvider>)
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Start a game from the initial position.
    pub fn new_game(&self, opponent: Opponent) -> Result<GameView, SessionError> {
        self.start(opponent, Position::initial())
    }

    /// Start a game from `fen`; the player moves for the side to move.
    pub fn new_game_from_fen(&self, opponent: Opponent, fen: &str) -> Result<GameView, SessionError> {
        let position = Position::from_fen(fen)?;
        self.start(opponent, position)
    }

    fn start(&self, opponent: Opponent, position: Position) -> Result<GameView, SessionError> {
        let mut provider = (self.factory)()?;
        provider.new_game()?;
        let provider: SharedProvider = Arc::new(Mutex::new(provider));

        let mut sessions = self.sessions.write();
        let id = loop {
            let candidate = SessionId(rand::random());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = Session::new(
            id,
            opponent,
            position,
            provider,
            self.config.dispatch,
            self.config.node_budget,
        );
        let view = session.view();
        sessions.insert(id, Arc::new(Mutex::new(session)));
        info!("session {} started ({:?} opponent) at {}", id, opponent, view.fen);
        Ok(view)
    }

    fn session(&self, id: SessionId) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Play the player's move in coordinate notation; the engine replies
    /// when it is the opponent. An illegal move leaves the game untouched.
    pub fn play_move(&self, id: SessionId, mv: &str) -> Result<GameView, SessionError> {
        let session = self.session(id)?;
        let mut session = session.lock();
        session.play_move(mv)?;
        Ok(session.view())
    }

    /// Let the engine move for the player, then reply as the opponent.
    pub fn auto_move(&self, id: SessionId) -> Result<GameView, SessionError> {
        let session = self.session(id)?;
        let mut session = session.lock();
        session.auto_move()?;
        Ok(session.view())
    }

    /// Current state. A finished background reply is applied first; one
    /// still running is reported through [`GameView::thinking`].
    pub fn board(&self, id: SessionId) -> Result<GameView, SessionError> {
        let session = self.session(id)?;
        let mut session = session.lock();
        match session.settle() {
            Ok(()) | Err(SessionError::EngineBusy(_)) => Ok(session.view()),
            Err(err) => Err(err),
        }
    }

    /// Block until the session's background reply, if any, is applied.
    pub fn wait(&self, id: SessionId) -> Result<GameView, SessionError> {
        let session = self.session(id)?;
        let mut session = session.lock();
        session.join_pending()?;
        Ok(session.view())
    }

    /// Drop a session. A reply search still running finishes unobserved.
    pub fn end_game(&self, id: SessionId) -> Result<(), SessionError> {
        let removed = self.sessions.write().remove(&id);
        match removed {
            Some(_) => {
                info!("session {} ended", id);
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }
}
