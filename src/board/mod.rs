//! Chess board representation.
//!
//! A mailbox of 64 cells with FEN placement parsing, an ASCII diagram,
//! per-square pseudo-legal move generation and attack detection. Game state
//! (side to move, castling, counters) lives in [`crate::position::Position`].
//!
//! # Example
//! ```
//! use chess_opponent::board::{Board, Square};
//!
//! let board = Board::starting();
//! let g1: Square = "g1".parse().unwrap();
//! assert_eq!(board.pseudo_moves(g1, None).len(), 2);
//! ```

mod attack_tables;
mod error;
mod movegen;
mod state;
mod types;

pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, Cell};
pub use types::{CastlingRights, Color, Move, MoveList, Piece, Square};

pub(crate) use types::ScoredMoveList;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_round_trip() {
        for placement in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
        ] {
            let board = Board::from_fen_placement(placement).unwrap();
            assert_eq!(board.to_fen_placement(), placement);
        }
    }

    #[test]
    fn starting_matches_fen() {
        let parsed =
            Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(parsed, Board::starting());
    }

    #[test]
    fn placement_errors() {
        assert_eq!(
            Board::from_fen_placement("8/8/8/8/8/8/8"),
            Err(FenError::InvalidRankCount { found: 7 })
        );
        assert!(matches!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidPiece { char: '9' })
        ));
        assert!(matches!(
            Board::from_fen_placement("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidFileCount { rank: 7, files: 7 })
        ));
        assert!(matches!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1BNR"),
            Err(FenError::KingCount {
                color: Color::White,
                found: 0
            })
        ));
        assert!(matches!(
            Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX"),
            Err(FenError::InvalidPiece { char: 'X' })
        ));
    }

    #[test]
    fn placement_limits_material() {
        assert_eq!(
            Board::from_fen_placement("QQQQQQBk/Q6B/Q6Q/Q6Q/Q6Q/Q6Q/Q6Q/KQQQQQQQ"),
            Err(FenError::TooManyPieces {
                color: Color::White,
                found: 27
            })
        );
        assert_eq!(
            Board::from_fen_placement("4k3/8/8/8/8/P7/PPPPPPPP/4K3"),
            Err(FenError::TooManyPawns {
                color: Color::White,
                found: 9
            })
        );
        assert_eq!(
            Board::from_fen_placement("3pk3/8/8/8/8/8/8/4K3"),
            Err(FenError::PawnOnBackRank {
                square: "d8".parse().unwrap()
            })
        );
        // nine queens after promotions is still a legal setup
        assert!(Board::from_fen_placement("QQQQQQQQ/Q7/8/8/8/8/8/k3K3").is_ok());
    }

    #[test]
    fn diagram_has_rank_eight_on_top() {
        let diagram = Board::starting().diagram();
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[5], "3 . . . . . . . .");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }

    #[test]
    fn mirror_swaps_colours() {
        let board = Board::from_fen_placement("4k3/8/8/8/8/8/4P3/4K3").unwrap();
        let mirrored = board.mirrored();
        assert_eq!(mirrored.to_fen_placement(), "4k3/4p3/8/8/8/8/8/4K3");
        assert_eq!(mirrored.mirrored(), board);
    }
}
