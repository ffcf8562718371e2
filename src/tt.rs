//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning.
//!
//! The table is owned by a single searcher and accessed through `&mut self`;
//! sharing between concurrent searches is left to the owner. Slots are
//! indexed by the low bits of the hash and every probe validates the full
//! 64-bit key, so a colliding slot reads as a miss.

use std::mem;

use crate::board::Move;

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

/// A cached search result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub hash: u64,
    pub depth: u8,
    /// Score at the stored node; mate scores are relative to that node.
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
    pub generation: u8,
}

impl TTEntry {
    /// An entry to hand to [`TranspositionTable::store`], which fills in the
    /// key and generation.
    #[must_use]
    pub fn new(depth: u32, score: i32, bound_type: BoundType, best_move: Option<Move>) -> Self {
        TTEntry {
            hash: 0,
            depth: depth.min(u32::from(u8::MAX)) as u8,
            score,
            bound_type,
            best_move,
            generation: 0,
        }
    }

    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    /// Whether the stored bound settles the node for the window `(alpha, beta)`.
    #[must_use]
    pub fn cuts_off(&self, score: i32, alpha: i32, beta: i32) -> bool {
        match self.bound_type {
            BoundType::Exact => true,
            BoundType::LowerBound => score >= beta,
            BoundType::UpperBound => score <= alpha,
        }
    }
}

pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    ///
    /// The slot count is the largest power of two that fits, at least one.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let slot_size = mem::size_of::<Option<TTEntry>>();
        let fit = (size_mb * 1024 * 1024) / slot_size;
        let num_slots = if fit == 0 {
            1
        } else {
            1usize << (usize::BITS - 1 - fit.leading_zeros())
        };

        TranspositionTable {
            slots: vec![None; num_slots],
            mask: num_slots - 1,
            generation: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Probe the table for an entry matching the given hash.
    /// Returns None if the slot is empty or holds another position.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.slots[self.index(hash)].filter(|entry| entry.hash == hash)
    }

    /// Store an entry under `hash`, stamped with the current generation.
    ///
    /// The occupant survives only if it is deeper than `entry` and was written
    /// in the current generation.
    pub fn store(&mut self, hash: u64, entry: TTEntry) {
        let generation = self.generation;
        let idx = self.index(hash);
        let slot = &mut self.slots[idx];

        if let Some(existing) = slot {
            if existing.depth > entry.depth && existing.generation == generation {
                return;
            }
        }

        *slot = Some(TTEntry {
            hash,
            generation,
            ..entry
        });
    }

    /// Start a new search generation; entries from older ones become replaceable.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns hash table fullness in per mille (0-1000), sampled over the
    /// first thousand slots.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample_size = self.slots.len().min(1000);
        let occupied = self.slots[..sample_size]
            .iter()
            .filter(|slot| slot.is_some_and(|e| e.generation == self.generation))
            .count();
        ((occupied * 1000) / sample_size) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.generation = 0;
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}
