//! Zobrist hashing material.
//!
//! A fixed-seed table of 64-bit keys, identical in every process, so that
//! position fingerprints are reproducible across runs and testable.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square};

/// Seed for the key table. Compiled in so all processes agree on hashes.
const KEY_SEED: u64 = 0x2023_0801;

pub(crate) struct Keys {
    /// One key per (color, piece) pair and square; indexed by
    /// `color.index() * 6 + piece.index()` then `square.index()`.
    pub piece: [[u64; 64]; 12],
    /// XORed into the hash iff black is to move.
    pub side_to_move: u64,
    /// One key per castling right currently held; indexed by right bit.
    pub castling: [u64; 4],
    /// One key per file, applied iff an en-passant target exists.
    pub en_passant_file: [u64; 8],
}

impl Keys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(KEY_SEED);
        let mut piece = [[0u64; 64]; 12];
        for piece_keys in &mut piece {
            for key in piece_keys.iter_mut() {
                *key = rng.gen();
            }
        }

        let side_to_move = rng.gen();

        let mut castling = [0u64; 4];
        for key in &mut castling {
            *key = rng.gen();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }

        Keys {
            piece,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    /// Key for a colored piece standing on a square.
    #[inline]
    pub(crate) fn piece_square(&self, color: Color, piece: Piece, square: Square) -> u64 {
        self.piece[color.index() * 6 + piece.index()][square.index()]
    }

    /// XOR of the keys for every right present in `rights`.
    #[inline]
    pub(crate) fn castling_set(&self, rights: u8) -> u64 {
        let mut acc = 0u64;
        for (bit, key) in self.castling.iter().enumerate() {
            if rights & (1 << bit) != 0 {
                acc ^= key;
            }
        }
        acc
    }
}

pub(crate) static KEYS: Lazy<Keys> = Lazy::new(Keys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic() {
        let a = Keys::new();
        let b = Keys::new();
        assert_eq!(a.piece[3][17], b.piece[3][17]);
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.castling, b.castling);
        assert_eq!(a.en_passant_file, b.en_passant_file);
    }

    #[test]
    fn keys_are_distinct() {
        // Spot check: no two of a sample of keys collide.
        let mut seen = std::collections::HashSet::new();
        for keys in KEYS.piece.iter() {
            for &k in keys.iter() {
                assert!(seen.insert(k));
            }
        }
        assert!(seen.insert(KEYS.side_to_move));
        for &k in &KEYS.castling {
            assert!(seen.insert(k));
        }
        for &k in &KEYS.en_passant_file {
            assert!(seen.insert(k));
        }
    }
}
