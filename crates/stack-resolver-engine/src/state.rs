//! A single node in the search: a partial assignment of resolved packages
//! plus the dependency names still open.

use rand::Rng;
use smallvec::SmallVec;
use stack_resolver_common::PackageTuple;
use std::collections::HashSet;

use crate::justification::Justification;

/// Most open dependencies carry only a handful of candidates once sieves
/// have run; inlining a few avoids a heap allocation per pending name.
type CandidateList = SmallVec<[PackageTuple; 4]>;

/// One open dependency: the name under negotiation and the candidate
/// versions still under consideration for it, most-recently-seen first.
#[derive(Debug, Clone, PartialEq)]
struct UnresolvedEntry {
    name: String,
    candidates: CandidateList,
}

/// A node in the resolution search tree.
///
/// `resolved` and `unresolved` are both insertion-ordered: resolution order
/// for the former, discovery order for the latter. A name never appears in
/// both at once.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    resolved: Vec<PackageTuple>,
    resolved_names: HashSet<String>,
    unresolved: Vec<UnresolvedEntry>,
    pub justification: Vec<Justification>,
    pub parent_beam_key: Option<u64>,
    pub score: f64,
}

impl State {
    pub fn new() -> Self {
        Self {
            resolved: Vec::new(),
            resolved_names: HashSet::new(),
            unresolved: Vec::new(),
            justification: Vec::new(),
            parent_beam_key: None,
            score: 0.0,
        }
    }

    /// True once there are no open dependencies left to resolve.
    pub fn is_terminal(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn iter_resolved_dependencies(&self) -> impl Iterator<Item = &PackageTuple> {
        self.resolved.iter()
    }

    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved_names.contains(name)
    }

    /// The representative (most recently seen) candidate for each open
    /// dependency, in discovery order.
    pub fn iter_unresolved_dependencies(&self) -> impl Iterator<Item = &PackageTuple> {
        self.unresolved.iter().filter_map(|e| e.candidates.first())
    }

    pub fn unresolved_len(&self) -> usize {
        self.unresolved.len()
    }

    /// Picks one open dependency's representative candidate.
    ///
    /// With `prefer_recent` the search scans from the most recently
    /// introduced dependency backwards, accepting each with probability
    /// 0.5 (a geometric bias toward recency) and falling back to the most
    /// recent entry if none are accepted. Without it, the pick is uniform.
    ///
    /// Returns `None` if the state is terminal.
    pub fn get_random_unresolved_dependency<R: Rng + ?Sized>(
        &self,
        prefer_recent: bool,
        rng: &mut R,
    ) -> Option<PackageTuple> {
        if self.unresolved.is_empty() {
            return None;
        }
        if prefer_recent {
            for entry in self.unresolved.iter().rev() {
                if rng.gen_bool(0.5) {
                    return entry.candidates.first().cloned();
                }
            }
            return self.unresolved.last().and_then(|e| e.candidates.first().cloned());
        }
        let idx = rng.gen_range(0..self.unresolved.len());
        self.unresolved[idx].candidates.first().cloned()
    }

    /// Moves `name` out of `unresolved` (if present) and records `package`
    /// as resolved.
    pub fn add_resolved(&mut self, name: &str, package: PackageTuple) {
        self.unresolved.retain(|e| e.name != name);
        self.resolved_names.insert(name.to_string());
        self.resolved.push(package);
    }

    /// Introduces a new open dependency, or replaces the candidate list of
    /// one already pending. No-op if `name` is already resolved.
    pub fn add_unresolved(&mut self, name: impl Into<String>, candidates: Vec<PackageTuple>) {
        let name = name.into();
        if self.resolved_names.contains(&name) {
            return;
        }
        let candidates: CandidateList = candidates.into();
        if let Some(entry) = self.unresolved.iter_mut().find(|e| e.name == name) {
            entry.candidates = candidates;
        } else {
            self.unresolved.push(UnresolvedEntry { name, candidates });
        }
    }

    pub fn push_justification(&mut self, justification: Justification) {
        self.justification.push(justification);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pt(name: &str, version: &str) -> PackageTuple {
        PackageTuple::new(name, version, "https://pypi.org/simple")
    }

    #[test]
    fn fresh_state_is_not_terminal_once_seeded() {
        let mut state = State::new();
        assert!(state.is_terminal());
        state.add_unresolved("numpy", vec![pt("numpy", "1.0.0")]);
        assert!(!state.is_terminal());
    }

    #[test]
    fn add_resolved_removes_name_from_unresolved() {
        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy", "1.0.0")]);
        state.add_resolved("numpy", pt("numpy", "1.0.0"));
        assert!(state.is_terminal());
        assert!(state.is_resolved("numpy"));
        assert_eq!(state.resolved_len(), 1);
    }

    #[test]
    fn add_unresolved_is_noop_once_resolved() {
        let mut state = State::new();
        state.add_resolved("numpy", pt("numpy", "1.0.0"));
        state.add_unresolved("numpy", vec![pt("numpy", "2.0.0")]);
        assert!(state.is_terminal());
    }

    #[test]
    fn random_unresolved_dependency_prefers_recent() {
        let mut state = State::new();
        state.add_unresolved("oldest", vec![pt("oldest", "1.0.0")]);
        state.add_unresolved("newest", vec![pt("newest", "1.0.0")]);
        let mut rng = StdRng::seed_from_u64(42);
        let picked = state.get_random_unresolved_dependency(true, &mut rng).unwrap();
        assert!(picked.name == "newest" || picked.name == "oldest");
    }

    #[test]
    fn random_unresolved_dependency_returns_none_when_terminal() {
        let state = State::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(state.get_random_unresolved_dependency(false, &mut rng).is_none());
    }
}
