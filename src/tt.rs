//! Transposition cache for search results.
//!
//! A fixed-size array of entries addressed by `hash % N`, one entry per
//! slot, no chaining. Collisions are resolved by the replacement policy:
//! an entry is overwritten when the slot is empty or the incoming result
//! was computed at least as deep as the stored one.
//!
//! Each slot also carries a repetition counter: how many times its hash
//! currently sits on the live repetition stack. The search bumps the
//! counter around `push`/`pop` and the session seeds it from the game
//! history, which makes the cache authoritative for threefold-repetition
//! draws during search. Counters survive entry replacement.

use std::mem;

use crate::board::Move;

/// How a stored score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Slot has never been written
    Empty,
    /// Score is the exact value
    Exact,
    /// Score is at least this value (a move failed high here)
    Lower,
    /// Score is at most this value (no move beat alpha here)
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    key: u64,
    depth: u32,
    bound: Bound,
    score: i32,
    best_move: Option<Move>,
    repetitions: u32,
}

impl Entry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn bound(&self) -> Bound {
        self.bound
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    #[must_use]
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            key: 0,
            depth: 0,
            bound: Bound::Empty,
            score: 0,
            best_move: None,
            repetitions: 0,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<Entry>,
    occupied: usize,
}

impl TranspositionTable {
    /// Allocate a table sized to `size_mb` mebibytes of entries.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Entry>();
        let num_entries = (size_mb * 1024 * 1024 / entry_size).max(1);
        TranspositionTable {
            entries: vec![Entry::default(); num_entries],
            occupied: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.occupied
    }

    /// Drop all entries and repetition counters.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = Entry::default();
        }
        self.occupied = 0;
    }

    /// Look up a usable score for `hash` at the requested remaining depth
    /// and window.
    ///
    /// A position whose repetition counter says this is (at least) the
    /// third occurrence scores 0 outright, and the entry is promoted to an
    /// exact 0 so later visits are cheap. Otherwise the stored result must
    /// be at least as deep as requested, and its bound decides whether it
    /// answers this window.
    pub fn probe(&mut self, hash: u64, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        let idx = self.index(hash);
        let entry = &mut self.entries[idx];

        if entry.bound == Bound::Empty || entry.key != hash {
            return None;
        }
        if entry.repetitions >= 2 {
            entry.score = 0;
            entry.bound = Bound::Exact;
            return Some(0);
        }
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::Lower if entry.score >= beta => Some(beta),
            Bound::Upper if entry.score <= alpha => Some(alpha),
            _ => None,
        }
    }

    /// Store a search result. Overwrites when the slot is empty or the new
    /// result is at least as deep as the stored one; the slot's repetition
    /// counter is left untouched either way.
    pub fn record(
        &mut self,
        hash: u64,
        depth: u32,
        bound: Bound,
        score: i32,
        best_move: Option<Move>,
    ) {
        debug_assert!(bound != Bound::Empty, "recording an empty bound");
        let idx = self.index(hash);
        let entry = &mut self.entries[idx];

        if entry.bound == Bound::Empty {
            self.occupied += 1;
        } else if depth < entry.depth {
            return;
        }
        entry.key = hash;
        entry.depth = depth;
        entry.bound = bound;
        entry.score = score;
        entry.best_move = best_move;
    }

    /// Key-checked read of the entry for `hash`.
    #[must_use]
    pub fn entry(&self, hash: u64) -> Option<&Entry> {
        let entry = &self.entries[self.index(hash)];
        if entry.bound != Bound::Empty && entry.key == hash {
            Some(entry)
        } else {
            None
        }
    }

    /// Slot-level repetition count for `hash`.
    #[must_use]
    pub fn repetition_count(&self, hash: u64) -> u32 {
        self.entries[self.index(hash)].repetitions
    }

    pub fn increment_repetition(&mut self, hash: u64) {
        let idx = self.index(hash);
        self.entries[idx].repetitions += 1;
    }

    pub fn decrement_repetition(&mut self, hash: u64) {
        let idx = self.index(hash);
        let reps = &mut self.entries[idx].repetitions;
        debug_assert!(*reps > 0, "repetition counter underflow");
        *reps = reps.saturating_sub(1);
    }

    /// Seed the counter for `hash` from the game history.
    pub fn set_repetition(&mut self, hash: u64, count: u32) {
        let idx = self.index(hash);
        self.entries[idx].repetitions = count;
    }
}
