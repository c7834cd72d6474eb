use crate::board::Board;
use crate::piece::NUM_SHAPE_TAGS;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Zobrist keys for canonical board encodings, one per (cell, shape tag).
pub struct Zobrist {
    keys: Vec<[u64; NUM_SHAPE_TAGS]>,
}

impl Zobrist {
    pub fn new(cells: usize) -> Self {
        // Use a seeded PRNG for reproducible Zobrist hashes
        let mut rng = ChaCha8Rng::seed_from_u64(0x123456789abcdef0);
        let keys = (0..cells)
            .map(|_| {
                let mut row = [0u64; NUM_SHAPE_TAGS];
                // Empty cells contribute nothing
                for key in row.iter_mut().skip(1) {
                    *key = rng.next_u64();
                }
                row
            })
            .collect();
        Zobrist { keys }
    }

    pub fn hash(&self, cells: &[u8]) -> u64 {
        debug_assert_eq!(cells.len(), self.keys.len());
        cells
            .iter()
            .zip(&self.keys)
            .fold(0u64, |acc, (&tag, keys)| acc ^ keys[tag as usize])
    }

    pub fn key(&self, board: &Board) -> StateKey {
        let cells = board.encode().into_boxed_slice();
        StateKey {
            hash: self.hash(&cells),
            cells,
        }
    }
}

/// A canonical encoding together with its Zobrist fingerprint.
///
/// Hashing only feeds the fingerprint; equality still compares every cell, so
/// a fingerprint collision can never merge two distinct states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKey {
    hash: u64,
    cells: Box<[u8]>,
}

impl Hash for StateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Canonical encodings already reached by the search.
pub struct Visited {
    zobrist: Zobrist,
    seen: HashSet<StateKey>,
}

impl Visited {
    pub fn new(root: &Board) -> Self {
        Visited {
            zobrist: Zobrist::new((root.width() * root.height()) as usize),
            seen: HashSet::new(),
        }
    }

    /// Mark the board's encoding as seen. Returns false if it already was.
    pub fn insert(&mut self, board: &Board) -> bool {
        self.seen.insert(self.zobrist.key(board))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
