//! Adaptive Simulated Annealing: the baseline predictor.
//!
//! Each iteration compares the beam's best state against one other state
//! picked at "heap array" position, and accepts the alternative with a
//! Metropolis-style probability that shrinks as the temperature cools.

use rand::Rng;

use stack_resolver_common::{EngineError, EngineResult, PackageTuple};

use super::{Decision, Predictor};
use crate::context::Context;
use crate::state::State;

/// Metropolis acceptance probability for moving from `max_score` to
/// `candidate_score` at the given `temperature`. Always accepts an
/// improving or equal move; a cooled-to-zero temperature never accepts a
/// worse one.
pub fn acceptance_probability(max_score: f64, candidate_score: f64, temperature: f64) -> f64 {
    if candidate_score >= max_score {
        1.0
    } else if temperature <= 0.0 {
        0.0
    } else {
        ((candidate_score - max_score) / temperature).exp()
    }
}

pub struct AdaptiveSimulatedAnnealing;

impl AdaptiveSimulatedAnnealing {
    pub fn new() -> Self {
        Self
    }

    /// Baseline cooling schedule: linear decay from `limit` to `0` over
    /// `limit` iterations, clamped at zero. TD and MCTS replace this with an
    /// adaptive schedule that restarts once a final state is accepted.
    pub fn temperature_function(&self, context: &Context) -> f64 {
        if context.limit == 0 {
            return 0.0;
        }
        (context.limit as f64 - context.iteration as f64).max(0.0)
    }

    /// Picks the beam's best state and one "probable" alternative, decides
    /// between them by Metropolis acceptance, and returns the winner, the
    /// acceptance probability that was computed, and whether the winner was
    /// the best state.
    fn pick_state(&self, context: &mut Context, temperature: f64) -> Option<(u64, State, f64, bool)> {
        let (max_key, max_state) = context.beam.max_with_key().map(|(k, s)| (k, s.clone()))?;
        let len = context.beam.len();
        let j = if len > 1 { context.rng().gen_range(1..len) } else { 0 };
        let (j_key, j_state) = context.beam.get_with_key(j).map(|(k, s)| (k, s.clone()))?;

        let p = acceptance_probability(max_state.score, j_state.score, temperature);
        let uniform: f64 = context.rng().gen();
        let explore = j != 0 && p >= uniform;

        if explore {
            Some((j_key, j_state, p, false))
        } else {
            Some((max_key, max_state, p, true))
        }
    }
}

impl Default for AdaptiveSimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for AdaptiveSimulatedAnnealing {
    fn run(&mut self, context: &mut Context) -> EngineResult<Decision> {
        if context.beam.is_empty() {
            return Err(EngineError::NoCandidates(
                "beam is empty, nothing to expand".to_string(),
            ));
        }
        let temperature = self.temperature_function(context);
        let (beam_key, state, acceptance, picked_max) = self
            .pick_state(context, temperature)
            .ok_or_else(|| EngineError::NoCandidates("beam is empty, nothing to expand".to_string()))?;
        let dependency = state
            .get_random_unresolved_dependency(true, context.rng())
            .ok_or_else(|| {
                EngineError::StateInvariantViolation(
                    "chosen state has no unresolved dependencies but is not terminal".to_string(),
                )
            })?;
        context.record_temperature(temperature, picked_max, acceptance, context.accepted_final_states_count);
        Ok(Decision { beam_key, dependency })
    }

    fn set_reward_signal(&mut self, _state: &State, _package: &PackageTuple, _reward: f64) {
        // The baseline schedule carries no memory between iterations.
    }
}
