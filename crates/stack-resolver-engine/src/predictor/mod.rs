//! Pluggable search guidance.
//!
//! A predictor decides, once per iteration, which live state to expand next
//! and which of its open dependencies to resolve. `set_reward_signal` lets
//! the resolver loop credit that choice once the expansion's score is known.

pub mod annealing;
pub mod mcts;
pub mod temporal_difference;

pub use annealing::AdaptiveSimulatedAnnealing;
pub use mcts::MonteCarloTreeSearch;
pub use temporal_difference::TemporalDifference;

use stack_resolver_common::{EngineResult, PackageTuple};

use crate::context::Context;
use crate::state::State;

/// One decision: the beam key of the state to expand and the dependency
/// (by representative candidate) to resolve on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub beam_key: u64,
    pub dependency: PackageTuple,
}

pub trait Predictor {
    /// Called once before the resolver loop starts.
    fn pre_run(&mut self, _context: &mut Context) {}

    /// Picks the next (state, dependency) pair to expand. Returns
    /// `EngineError::NoCandidates` if the beam is empty.
    fn run(&mut self, context: &mut Context) -> EngineResult<Decision>;

    /// Credits the outcome of the decision returned by the most recent
    /// `run` call. `reward` is `+Inf` for an accepted terminal state, `NaN`
    /// for a dead end (a sieve starved the expansion), and finite for an
    /// ordinary incremental expansion. `state` is the state the reward
    /// applies to — for a finite or infinite reward this is the expanded
    /// child, not the one `run` returned.
    fn set_reward_signal(&mut self, state: &State, package: &PackageTuple, reward: f64);

    /// Called once after the resolver loop stops.
    fn post_run(&mut self, _context: &mut Context) {}
}
