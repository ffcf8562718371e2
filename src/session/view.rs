//! Values a session hands back to its caller.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Color;
use crate::search::mate_distance;

/// Opaque session handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Who answers the player's moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Opponent {
    /// The engine replies after every player move.
    #[default]
    Engine,
    /// Both sides are entered by hand; the engine only moves on request.
    Human,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
    ThreefoldRepetition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    #[must_use]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate { winner: Color::White } => f.write_str("checkmate, white wins"),
            GameStatus::Checkmate { winner: Color::Black } => f.write_str("checkmate, black wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::Draw(DrawReason::FiftyMoveRule) => f.write_str("draw by the fifty-move rule"),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                f.write_str("draw by insufficient material")
            }
            GameStatus::Draw(DrawReason::ThreefoldRepetition) => {
                f.write_str("draw by threefold repetition")
            }
        }
    }
}

/// What the engine's last search says about the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outlook {
    /// The engine found a forced mate in this many plies.
    EngineMates(u32),
    /// The engine expects to be mated in this many plies.
    PlayerMates(u32),
    #[default]
    Unclear,
}

impl Outlook {
    /// Classify a score from the engine's point of view.
    #[must_use]
    pub fn from_engine_score(score: i32) -> Self {
        match mate_distance(score) {
            Some(plies) if plies > 0 => Outlook::EngineMates(plies.unsigned_abs()),
            Some(plies) => Outlook::PlayerMates(plies.unsigned_abs()),
            None => Outlook::Unclear,
        }
    }
}

/// Snapshot of a session after a request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameView {
    pub session: SessionId,
    pub opponent: Opponent,
    pub fen: String,
    /// Text diagram of the board, White at the bottom.
    pub board: String,
    pub side_to_move: Color,
    /// The player's last move, or the engine's move on the player's behalf.
    pub last_move: Option<String>,
    /// The engine's latest reply.
    pub engine_move: Option<String>,
    pub status: GameStatus,
    pub outlook: Outlook,
    /// A background reply search is still running.
    pub thinking: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MATE_VALUE;

    #[test]
    fn outlook_from_scores() {
        assert_eq!(Outlook::from_engine_score(MATE_VALUE - 3), Outlook::EngineMates(3));
        assert_eq!(Outlook::from_engine_score(-(MATE_VALUE - 2)), Outlook::PlayerMates(2));
        assert_eq!(Outlook::from_engine_score(-MATE_VALUE), Outlook::PlayerMates(0));
        assert_eq!(Outlook::from_engine_score(250), Outlook::Unclear);
    }

    #[test]
    fn status_text() {
        assert_eq!(
            GameStatus::Checkmate { winner: Color::Black }.to_string(),
            "checkmate, black wins"
        );
        assert_eq!(
            GameStatus::Draw(DrawReason::ThreefoldRepetition).to_string(),
            "draw by threefold repetition"
        );
        assert!(!GameStatus::Ongoing.is_over());
        assert!(GameStatus::Stalemate.is_over());
    }

    #[test]
    fn session_id_is_hex() {
        assert_eq!(SessionId(0xbeef).to_string(), "000000000000beef");
    }
}
