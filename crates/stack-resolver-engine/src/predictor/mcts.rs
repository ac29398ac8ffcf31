//! Monte-Carlo Tree Search predictor.
//!
//! Extends [`TemporalDifference`] with a one-step rollout memory: once a
//! non-terminal expansion reports a finite reward, MCTS remembers that
//! child and continues the same trajectory next iteration instead of
//! letting TD pick fresh. Policy credit is only ever applied once a
//! trajectory reaches a terminal, accepted state — the full resolved set is
//! credited with that state's own score, a Monte-Carlo return rather than
//! TD's per-step update.

use stack_resolver_common::{EngineError, EngineResult, PackageTuple};

use super::temporal_difference::TemporalDifference;
use super::{Decision, Predictor};
use crate::context::Context;
use crate::state::State;

pub struct MonteCarloTreeSearch {
    td: TemporalDifference,
    next_state: Option<State>,
}

impl MonteCarloTreeSearch {
    pub fn new(policy_capacity: usize) -> Self {
        Self {
            td: TemporalDifference::new(policy_capacity),
            next_state: None,
        }
    }
}

impl Predictor for MonteCarloTreeSearch {
    fn pre_run(&mut self, context: &mut Context) {
        self.next_state = None;
        self.td.pre_run(context);
    }

    fn run(&mut self, context: &mut Context) -> EngineResult<Decision> {
        if let Some(state) = self.next_state.take() {
            let dependency = state
                .get_random_unresolved_dependency(true, context.rng())
                .ok_or_else(|| {
                    EngineError::StateInvariantViolation(
                        "chosen state has no unresolved dependencies but is not terminal".to_string(),
                    )
                })?;
            let beam_key = context.beam.add(state);
            return Ok(Decision { beam_key, dependency });
        }
        self.td.run(context)
    }

    fn set_reward_signal(&mut self, state: &State, _package: &PackageTuple, reward: f64) {
        if reward.is_nan() {
            // Dead end: drop the trajectory and let TD pick fresh next time.
            self.next_state = None;
        } else if !reward.is_infinite() {
            // Continue the trajectory through this child next iteration.
            self.next_state = Some(state.clone());
        } else {
            // Terminal, accepted state: credit the whole trajectory with
            // its own score, then start a new one.
            self.td.record_reward_for_resolved(state, state.score);
            self.next_state = None;
        }
    }

    fn post_run(&mut self, context: &mut Context) {
        self.td.post_run(context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::Beam;
    use stack_resolver_common::EngineConfig;

    fn pt(name: &str) -> PackageTuple {
        PackageTuple::new(name, "1.0.0", "https://pypi.org/simple")
    }

    #[test]
    fn terminal_reward_credits_the_whole_resolved_set_with_state_score() {
        let mut mcts = MonteCarloTreeSearch::new(0);
        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy")]);
        state.add_resolved("numpy", pt("numpy"));
        state.score = 42.0;

        mcts.set_reward_signal(&state, &pt("numpy"), f64::INFINITY);

        assert_eq!(mcts.td.average_reward(&pt("numpy")), 42.0);
        assert!(mcts.next_state.is_none());
    }

    #[test]
    fn finite_reward_continues_the_trajectory_without_crediting_policy() {
        let mut mcts = MonteCarloTreeSearch::new(0);
        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy")]);
        state.add_resolved("numpy", pt("numpy"));

        mcts.set_reward_signal(&state, &pt("numpy"), 1.5);

        assert_eq!(mcts.td.average_reward(&pt("numpy")), 0.0);
        assert!(mcts.next_state.is_some());
    }

    #[test]
    fn nan_reward_drops_a_pending_trajectory() {
        let mut mcts = MonteCarloTreeSearch::new(0);
        let mut state = State::new();
        state.add_unresolved("numpy", vec![pt("numpy")]);
        state.add_resolved("numpy", pt("numpy"));
        mcts.set_reward_signal(&state, &pt("numpy"), 1.5);
        assert!(mcts.next_state.is_some());

        mcts.set_reward_signal(&state, &pt("numpy"), f64::NAN);
        assert!(mcts.next_state.is_none());
    }

    #[test]
    fn run_continues_a_pending_trajectory_before_consulting_td() {
        let mut mcts = MonteCarloTreeSearch::new(0);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        context.beam = Beam::new(0);

        let mut pending = State::new();
        pending.add_unresolved("scipy", vec![pt("scipy")]);
        mcts.next_state = Some(pending);

        let decision = mcts.run(&mut context).unwrap();
        assert_eq!(decision.dependency.name, "scipy");
        assert!(mcts.next_state.is_none());
        assert_eq!(context.beam.len(), 1);
    }
}
