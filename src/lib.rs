//! A chess opponent: legal move generation, static evaluation and a
//! node-budgeted alpha-beta search, served to callers through game sessions
//! or the UCI protocol.

pub mod board;
pub mod config;
pub mod eval;
pub mod position;
pub mod provider;
pub mod search;
pub mod session;
pub mod tt;
pub mod uci;
pub(crate) mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use config::EngineConfig;
pub use position::Position;
pub use provider::{EngineError, MoveProvider, UciEngine};
pub use search::{SearchResult, Searcher, MATE_VALUE};
pub use session::{GameView, Opponent, SessionError, SessionManager};
pub use tt::TranspositionTable;
