//! Transposition table.
//!
//! A hash map from position fingerprints to searched results, shared
//! between the foreground search and the ponder worker. A `parking_lot`
//! readers-writer lock protects the map (many concurrent probes, single
//! writer); entry ages are atomics so a probe under the read lock can still
//! refresh them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;

use crate::board::Move;

/// Results shallower than this are not worth caching.
pub const MIN_TRANSPOSITION_DEPTH: u32 = 2;
/// Entries this many completed searches old are evicted by `prune`.
pub const MAX_AGE_DIFF: u32 = 3;

/// How a stored score relates to the true minimax value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The score is the exact value.
    Exact,
    /// The true value is at least the score (a beta cutoff happened).
    Lower,
    /// The true value is at most the score (no move raised alpha).
    Upper,
}

struct Entry {
    depth: u32,
    score: i32,
    bound: Bound,
    best_move: Move,
    best_response: Option<Move>,
    age: AtomicU32,
}

/// A probe result, copied out of the table so no lock outlives the call.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Move,
    pub best_response: Option<Move>,
}

pub struct TranspositionTable {
    entries: RwLock<HashMap<u64, Entry>>,
    age: AtomicU32,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        TranspositionTable {
            entries: RwLock::new(HashMap::new()),
            age: AtomicU32::new(0),
        }
    }

    /// Store a search result.
    ///
    /// Results below `MIN_TRANSPOSITION_DEPTH` are rejected. An existing
    /// entry always has its age refreshed, but its payload is replaced only
    /// by a strictly deeper result.
    pub fn insert(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound: Bound,
        best_move: Move,
        best_response: Option<Move>,
    ) {
        if depth < MIN_TRANSPOSITION_DEPTH {
            return;
        }
        let age = self.age.load(Ordering::Relaxed);

        let mut entries = self.entries.write();
        match entries.get_mut(&hash) {
            Some(entry) => {
                entry.age.store(age, Ordering::Relaxed);
                if depth > entry.depth {
                    entry.depth = depth;
                    entry.score = score;
                    entry.bound = bound;
                    entry.best_move = best_move;
                    entry.best_response = best_response;
                }
            }
            None => {
                entries.insert(
                    hash,
                    Entry {
                        depth,
                        score,
                        bound,
                        best_move,
                        best_response,
                        age: AtomicU32::new(age),
                    },
                );
            }
        }
    }

    /// Look up a position, refreshing the entry's age on a hit.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<Probe> {
        let entries = self.entries.read();
        let entry = entries.get(&hash)?;
        entry.age.store(self.age.load(Ordering::Relaxed), Ordering::Relaxed);
        Some(Probe {
            depth: entry.depth,
            score: entry.score,
            bound: entry.bound,
            best_move: entry.best_move,
            best_response: entry.best_response,
        })
    }

    /// Bump the table age. Called once after each completed top-level
    /// search.
    pub fn advance_age(&self) {
        self.age.fetch_add(1, Ordering::Relaxed);
    }

    /// Evict entries that have not been touched for `MAX_AGE_DIFF`
    /// completed searches.
    pub fn prune(&self) {
        let age = self.age.load(Ordering::Relaxed);
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| age.saturating_sub(entry.age.load(Ordering::Relaxed)) <= MAX_AGE_DIFF);
        tracing::debug!(
            target: "tt",
            removed = before - entries.len(),
            remaining = entries.len(),
            "pruned stale entries"
        );
    }

    /// Drop every entry and reset the age to zero.
    pub fn reset(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.age.store(0, Ordering::Relaxed);
    }

    /// Number of stored positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new()
    }
}
