//! The bounded pool of live search states.
//!
//! The beam is a width-capped collection supporting O(1) indexed access (for
//! uniform random sampling) and score-based eviction once capacity is
//! exceeded. Ties are broken by insertion order so that, with a fixed seed,
//! two runs evict the same entries byte-for-byte.

use rand::Rng;

use crate::state::State;

struct Entry {
    key: u64,
    seq: u64,
    state: State,
}

/// A capacity-bounded pool of `State`s, ordered by nothing in particular
/// except the insertion sequence used to break score ties.
pub struct Beam {
    width: usize,
    entries: Vec<Entry>,
    next_key: u64,
    next_seq: u64,
}

impl Beam {
    /// `width` of 0 means unbounded.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: Vec::new(),
            next_key: 0,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Indexed access, O(1).
    pub fn get(&self, index: usize) -> Option<&State> {
        self.entries.get(index).map(|e| &e.state)
    }

    /// Like [`Beam::get`] but also hands back the entry's key.
    pub fn get_with_key(&self, index: usize) -> Option<(u64, &State)> {
        self.entries.get(index).map(|e| (e.key, &e.state))
    }

    pub fn get_by_key(&self, key: u64) -> Option<&State> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.state)
    }

    pub fn get_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&State> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.entries.len());
        self.get(idx)
    }

    /// Like [`Beam::get_random`] but also hands back the entry's key.
    pub fn get_random_with_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(u64, &State)> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.entries.len());
        self.entries.get(idx).map(|e| (e.key, &e.state))
    }

    /// The highest-scoring state. Ties favor the one inserted earliest.
    pub fn max(&self) -> Option<&State> {
        self.max_with_key().map(|(_, state)| state)
    }

    /// Like [`Beam::max`] but also hands back the entry's key.
    pub fn max_with_key(&self) -> Option<(u64, &State)> {
        self.entries
            .iter()
            .min_by(|a, b| {
                b.state
                    .score
                    .partial_cmp(&a.state.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|e| (e.key, &e.state))
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.entries.iter().map(|e| &e.state)
    }

    /// Inserts `state`, returning the key it was stored under. If the beam
    /// is over width afterwards, the lowest-scoring entry is evicted (ties
    /// broken toward evicting the more recently inserted one).
    pub fn add(&mut self, state: State) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { key, seq, state });

        if self.width > 0 && self.entries.len() > self.width {
            let worst = self
                .entries
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.state
                        .score
                        .partial_cmp(&b.state.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(b.seq.cmp(&a.seq))
                })
                .map(|(idx, _)| idx);
            if let Some(idx) = worst {
                self.entries.remove(idx);
            }
        }
        key
    }
}
