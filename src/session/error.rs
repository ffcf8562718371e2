use thiserror::Error;

use super::{GameStatus, SessionId};
use crate::board::{FenError, MoveParseError};
use crate::provider::EngineError;

/// Errors returned by [`SessionManager`](super::SessionManager) requests.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session {0} is still waiting for the engine's reply")]
    EngineBusy(SessionId),

    #[error("game in session {id} is over ({status})")]
    GameOver { id: SessionId, status: GameStatus },

    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveParseError),

    #[error("invalid position: {0}")]
    Fen(#[from] FenError),

    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}

/// Coarse classification of a [`SessionError`] for the caller's boundary
/// (for example an HTTP status).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The session id is unknown.
    NotFound,
    /// Retry later.
    Busy,
    /// The request is well formed but the game state forbids it.
    Conflict,
    /// The request itself is malformed.
    BadRequest,
    /// The engine backend failed.
    Internal,
}

impl SessionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NotFound(_) => ErrorKind::NotFound,
            SessionError::EngineBusy(_) => ErrorKind::Busy,
            SessionError::GameOver { .. } => ErrorKind::Conflict,
            SessionError::InvalidMove(_) | SessionError::Fen(_) => ErrorKind::BadRequest,
            SessionError::Engine(_) => ErrorKind::Internal,
        }
    }
}
