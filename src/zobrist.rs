//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for transposition
//! tables. Keys are drawn from a fixed seed so hashes are stable across runs.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Board, CastlingRights, Color, Piece, Square};

const SEED: u64 = 1_234_567_890;

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
    // castling_keys[color][side]: 0 = kingside, 1 = queenside
    castling_keys: [[u64; 2]; 2],
    // only the file of the en passant target matters
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [[0; 2]; 2];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move_key
    }

    /// Combined key of every right held in `rights`.
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for color in Color::BOTH {
            for (side, kingside) in [(0, true), (1, false)] {
                if rights.has(color, kingside) {
                    key ^= self.castling_keys[color.index()][side];
                }
            }
        }
        key
    }

    #[inline]
    pub(crate) fn en_passant(&self, target: Option<Square>) -> u64 {
        target.map_or(0, |sq| self.en_passant_keys[sq.file() as usize])
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Hash a full position from scratch.
pub(crate) fn compute(
    board: &Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> u64 {
    let keys = &*ZOBRIST;
    let mut hash = 0;
    for (sq, color, piece) in board.occupied() {
        hash ^= keys.piece(color, piece, sq);
    }
    if side_to_move == Color::Black {
        hash ^= keys.side();
    }
    hash ^ keys.castling(castling) ^ keys.en_passant(en_passant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_reproducible() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        assert_eq!(a.side(), b.side());
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(
            a.piece(Color::White, Piece::Knight, e4),
            b.piece(Color::White, Piece::Knight, e4)
        );
    }

    #[test]
    fn side_to_move_changes_hash() {
        let board = Board::starting();
        let white = compute(&board, Color::White, CastlingRights::all(), None);
        let black = compute(&board, Color::Black, CastlingRights::all(), None);
        assert_eq!(white ^ black, ZOBRIST.side());
    }

    #[test]
    fn castling_key_covers_each_right() {
        let mut rights = CastlingRights::none();
        assert_eq!(ZOBRIST.castling(rights), 0);
        rights.set(Color::Black, false);
        assert_ne!(ZOBRIST.castling(rights), 0);
        assert_ne!(ZOBRIST.castling(rights), ZOBRIST.castling(CastlingRights::all()));
    }
}
