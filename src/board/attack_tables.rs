//! Precomputed attack tables for leaper pieces (knights, kings, pawns).
//!
//! Each table entry is a 64-bit mask with bit `i` set when square `i` is
//! attacked from the indexed square.

use once_cell::sync::Lazy;

use super::types::Square;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Rook ray directions (rank, file)
pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// Bishop ray directions (rank, file)
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn leaper_table(deltas: &[(i8, i8)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, (idx, slot)) in Square::all().zip(attacks.iter_mut().enumerate()) {
        debug_assert_eq!(sq.index(), idx);
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            if let Some(target) = sq.offset(dr, df) {
                mask |= 1u64 << target.index();
            }
        }
        *slot = mask;
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KING_DELTAS));

/// Squares a pawn of the indexed colour attacks from each square.
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    [
        leaper_table(&[(1, -1), (1, 1)]),
        leaper_table(&[(-1, -1), (-1, 1)]),
    ]
});

/// Iterate the squares set in a mask, lowest index first.
pub(crate) fn squares(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let idx = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(Square::from_index(idx))
    })
}
