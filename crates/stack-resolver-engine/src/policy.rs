//! The reward memory shared by the Temporal Difference and MCTS predictors.
//!
//! Keyed by `PackageTuple`, each entry accumulates a reward sum and a visit
//! count. Once capacity is set and exceeded the store is periodically
//! trimmed back down, keeping the entries with the highest `(reward_sum,
//! count)` pair, compared lexicographically.

use std::collections::HashMap;

use stack_resolver_common::PackageTuple;

const EVICTION_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolicyEntry {
    pub reward_sum: f64,
    pub count: u64,
}

/// `capacity` of 0 means unbounded; eviction never runs.
pub struct PolicyStore {
    capacity: usize,
    entries: HashMap<PackageTuple, PolicyEntry>,
    updates_since_eviction: u64,
}

impl PolicyStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            updates_since_eviction: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, package: &PackageTuple) -> Option<PolicyEntry> {
        self.entries.get(package).copied()
    }

    /// Records one visit of `package` with the given `reward`, then runs
    /// eviction if the interval has elapsed and a capacity is set.
    pub fn record(&mut self, package: PackageTuple, reward: f64) {
        let entry = self.entries.entry(package).or_default();
        entry.reward_sum += reward;
        entry.count += 1;

        self.updates_since_eviction += 1;
        if self.updates_since_eviction >= EVICTION_INTERVAL {
            self.updates_since_eviction = 0;
            self.evict_if_needed();
        }
    }

    fn evict_if_needed(&mut self) {
        if self.capacity == 0 || self.entries.len() <= self.capacity {
            return;
        }
        let mut ranked: Vec<(PackageTuple, PolicyEntry)> =
            self.entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ranked.sort_by(|a, b| {
            b.1.reward_sum
                .partial_cmp(&a.1.reward_sum)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.count.cmp(&a.1.count))
        });
        ranked.truncate(self.capacity);
        self.entries = ranked.into_iter().collect();
    }
}
