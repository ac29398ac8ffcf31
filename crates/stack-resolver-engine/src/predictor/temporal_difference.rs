//! Temporal Difference predictor.
//!
//! Extends [`super::annealing`]'s Metropolis explore/exploit algorithm with
//! two changes: an adaptive cooling schedule that restarts the first time a
//! final state is accepted, and a policy store of past (package, average
//! reward) observations consulted on exploitation.

use rand::Rng;

use stack_resolver_common::{EngineError, EngineResult, PackageTuple};

use super::annealing::acceptance_probability;
use super::{Decision, Predictor};
use crate::context::Context;
use crate::policy::PolicyStore;
use crate::state::State;

pub struct TemporalDifference {
    policy: PolicyStore,
    /// Previous temperature (`t0` in the schedule below).
    temperature: f64,
    /// Cooling slope, fixed the first time a final state is accepted.
    slope: f64,
}

impl TemporalDifference {
    pub fn new(policy_capacity: usize) -> Self {
        Self {
            policy: PolicyStore::new(policy_capacity),
            temperature: 0.0,
            slope: 1.0,
        }
    }

    pub(crate) fn average_reward(&self, package: &PackageTuple) -> f64 {
        self.policy
            .get(package)
            .filter(|entry| entry.count > 0)
            .map(|entry| entry.reward_sum / entry.count as f64)
            .unwrap_or(0.0)
    }

    /// Adaptive cooling schedule. Stays at zero until the first final state
    /// is accepted, then restarts from `limit` and decays linearly with a
    /// slope fixed at that moment — the harder the first solution was to
    /// find, the longer the schedule stays hot afterwards.
    fn temperature_function(&mut self, t0: f64, context: &Context) -> f64 {
        if context.accepted_final_states_count == 0 {
            return 0.0;
        }
        if t0 == 0.0 && context.accepted_final_states_count == 1 {
            self.slope = 0.5 * context.iteration as f64 / context.accepted_final_states_count as f64
                * context.limit as f64;
            return context.limit as f64;
        }
        let temperature = (-(context.limit as f64) / self.slope) * context.iteration as f64 + context.limit as f64;
        temperature.max(0.0)
    }

    /// Credits `reward` to every package already resolved in `state`. Used
    /// both by TD's own `set_reward_signal` and by MCTS, which applies the
    /// same bookkeeping under different NaN/Inf rules.
    pub(crate) fn record_reward_for_resolved(&mut self, state: &State, reward: f64) {
        for package_tuple in state.iter_resolved_dependencies() {
            self.policy.record(package_tuple.clone(), reward);
        }
    }

    /// Picks the open dependency with the best known average reward. Falls
    /// back to `None` if the policy store has no opinion on any of them,
    /// letting the caller fall back to the baseline recency bias.
    fn do_exploitation(&self, state: &State) -> Option<PackageTuple> {
        state
            .iter_unresolved_dependencies()
            .filter(|pt| self.policy.get(pt).is_some())
            .max_by(|a, b| {
                self.average_reward(a)
                    .partial_cmp(&self.average_reward(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
    }
}

impl Predictor for TemporalDifference {
    fn run(&mut self, context: &mut Context) -> EngineResult<Decision> {
        if context.beam.is_empty() {
            return Err(EngineError::NoCandidates(
                "beam is empty, nothing to expand".to_string(),
            ));
        }

        let temperature = self.temperature_function(self.temperature, context);
        self.temperature = temperature;

        let (max_key, max_state) = context
            .beam
            .max_with_key()
            .map(|(k, s)| (k, s.clone()))
            .ok_or_else(|| EngineError::NoCandidates("beam is empty, nothing to expand".to_string()))?;
        let len = context.beam.len();
        let j = if len > 1 { context.rng().gen_range(1..len) } else { 0 };
        let (j_key, j_state) = context
            .beam
            .get_with_key(j)
            .map(|(k, s)| (k, s.clone()))
            .ok_or_else(|| EngineError::NoCandidates("beam is empty, nothing to expand".to_string()))?;

        let p = acceptance_probability(max_state.score, j_state.score, temperature);
        let uniform: f64 = context.rng().gen();
        let explore = j != 0 && p >= uniform;

        let (beam_key, state, picked_max) = if explore {
            (j_key, j_state, false)
        } else {
            (max_key, max_state, true)
        };

        let dependency = if explore {
            state.get_random_unresolved_dependency(true, context.rng())
        } else {
            match self.do_exploitation(&state) {
                Some(pt) => Some(pt),
                None => state.get_random_unresolved_dependency(true, context.rng()),
            }
        }
        .ok_or_else(|| {
            EngineError::StateInvariantViolation(
                "chosen state has no unresolved dependencies but is not terminal".to_string(),
            )
        })?;

        context.record_temperature(temperature, picked_max, p, context.accepted_final_states_count);

        Ok(Decision { beam_key, dependency })
    }

    fn set_reward_signal(&mut self, state: &State, _package: &PackageTuple, reward: f64) {
        if reward.is_nan() || reward.is_infinite() {
            // Final states and dead ends carry no incremental TD signal.
            return;
        }
        self.record_reward_for_resolved(state, reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_resolver_common::EngineConfig;

    fn pt(name: &str) -> PackageTuple {
        PackageTuple::new(name, "1.0.0", "https://pypi.org/simple")
    }

    #[test]
    fn exploitation_prefers_known_high_reward_dependency() {
        let mut td = TemporalDifference::new(0);
        let mut resolved_numpy = State::new();
        resolved_numpy.add_unresolved("numpy", vec![pt("numpy")]);
        resolved_numpy.add_resolved("numpy", pt("numpy"));
        td.set_reward_signal(&resolved_numpy, &pt("numpy"), 10.0);

        let mut resolved_scipy = State::new();
        resolved_scipy.add_unresolved("scipy", vec![pt("scipy")]);
        resolved_scipy.add_resolved("scipy", pt("scipy"));
        td.set_reward_signal(&resolved_scipy, &pt("scipy"), 0.1);

        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy")]);
        state.add_unresolved("scipy", vec![pt("scipy")]);

        let picked = td.do_exploitation(&state).unwrap();
        assert_eq!(picked.name, "numpy");
    }

    #[test]
    fn set_reward_signal_ignores_nan_and_infinite_rewards() {
        let mut td = TemporalDifference::new(0);
        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy")]);
        state.add_resolved("numpy", pt("numpy"));
        td.set_reward_signal(&state, &pt("numpy"), f64::NAN);
        td.set_reward_signal(&state, &pt("numpy"), f64::INFINITY);
        assert_eq!(td.average_reward(&pt("numpy")), 0.0);
    }

    #[test]
    fn temperature_stays_zero_until_a_final_state_is_accepted() {
        let mut td = TemporalDifference::new(0);
        let mut config = EngineConfig::default();
        config.limit = 100;
        let context = Context::new(&config);
        assert_eq!(td.temperature_function(0.0, &context), 0.0);
    }

    #[test]
    fn run_errors_on_empty_beam() {
        let mut td = TemporalDifference::new(0);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        assert!(matches!(td.run(&mut context), Err(EngineError::NoCandidates(_))));
    }
}
