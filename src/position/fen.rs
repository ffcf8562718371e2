//! FEN parsing and formatting for positions.

use std::str::FromStr;

use super::Position;
use crate::board::{Board, CastlingRights, Color, FenError, Piece, Square};

impl Position {
    /// Parse a FEN string.
    ///
    /// The halfmove clock and fullmove number are optional and default to
    /// 0 and 1. Rejects positions where the side that just moved is in check
    /// and en passant targets that no double pawn push could have produced.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }

        let board = Board::from_fen_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let castling = parse_castling(parts[2])?;

        let en_passant = match parts[3] {
            "-" => None,
            text => {
                let invalid = || FenError::InvalidEnPassant {
                    found: text.to_string(),
                };
                let sq: Square = text.parse().map_err(|_| invalid())?;
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if sq.rank() != expected_rank {
                    return Err(invalid());
                }
                // the pawn that just double-pushed sits in front of the target
                let mover = side_to_move.opponent();
                let dir = mover.pawn_direction();
                let pushed = sq.offset(dir, 0);
                let origin = sq.offset(-dir, 0);
                let consistent = board.piece_at(sq).is_none()
                    && origin.is_some_and(|o| board.piece_at(o).is_none())
                    && pushed.is_some_and(|p| board.has(p, mover, Piece::Pawn));
                if !consistent {
                    return Err(invalid());
                }
                Some(sq)
            }
        };

        let halfmove_clock = parse_counter(parts.get(4).copied(), 0)?;
        let fullmove_number = parse_counter(parts.get(5).copied(), 1)?;

        let position = Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );

        let waiting = side_to_move.opponent();
        if position.board.in_check(waiting) {
            return Err(FenError::OpponentInCheck { color: waiting });
        }

        Ok(position)
    }

    /// Format the position as a six-field FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.to_fen_placement(),
            side,
            self.castling.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_castling(text: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if text == "-" {
        return Ok(rights);
    }
    for c in text.chars() {
        match c {
            'K' => rights.set(Color::White, true),
            'Q' => rights.set(Color::White, false),
            'k' => rights.set(Color::Black, true),
            'q' => rights.set(Color::Black, false),
            _ => return Err(FenError::InvalidCastling { char: c }),
        }
    }
    Ok(rights)
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidCounter {
            found: text.to_string(),
        }),
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
