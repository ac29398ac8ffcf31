//! The resolver loop: a single-threaded, cooperative driver over the beam,
//! predictor, pipeline, and oracle.
//!
//! The loop never panics on a recoverable condition. A sieve starving one
//! open dependency just abandons that expansion attempt; only a state
//! invariant violation, a pipeline misconfiguration, or a persistently
//! unavailable oracle stops the run early with an error. Every other exit
//! path — the iteration limit, the stack count, the wall-clock deadline, or
//! an external cancellation — produces a `Report`, possibly with zero
//! stacks in it.

use std::sync::Arc;

use rayon::prelude::*;

use stack_resolver_common::{EngineError, EngineResult, PackageTuple, StopReason};

use crate::context::Context;
use crate::oracle::{EnvironmentMarkers, PackageOracle};
use crate::pipeline::Pipeline;
use crate::predictor::Predictor;
use crate::report::{Report, ResolvedStack};
use crate::state::State;

pub struct Resolver {
    pipeline: Pipeline,
    predictor: Box<dyn Predictor>,
    oracle: Arc<dyn PackageOracle>,
    markers: EnvironmentMarkers,
}

impl Resolver {
    pub fn new(
        pipeline: Pipeline,
        predictor: Box<dyn Predictor>,
        oracle: Arc<dyn PackageOracle>,
        markers: EnvironmentMarkers,
    ) -> Self {
        Self {
            pipeline,
            predictor,
            oracle,
            markers,
        }
    }

    async fn get_versions_with_retry(&self, name: &str) -> EngineResult<Vec<PackageTuple>> {
        match self.oracle.get_versions(name, &self.markers).await {
            Ok(versions) => Ok(versions),
            Err(EngineError::OracleUnavailable(reason)) => {
                log::warn!("oracle unavailable ({reason}), retrying once");
                self.oracle.get_versions(name, &self.markers).await
            }
            Err(other) => Err(other),
        }
    }

    fn score_candidates(
        &self,
        context: &Context,
        state: &State,
        candidates: Vec<PackageTuple>,
    ) -> EngineResult<Vec<(PackageTuple, f64)>> {
        let steps = &self.pipeline.steps;
        let scored: EngineResult<Vec<Option<(PackageTuple, f64)>>> = candidates
            .into_par_iter()
            .map(|candidate| -> EngineResult<Option<(PackageTuple, f64)>> {
                let mut total = 0.0;
                for step in steps.iter() {
                    if !step.should_include(context) {
                        continue;
                    }
                    match step.run(context, state, &candidate)? {
                        Some(delta) => total += delta,
                        None => return Ok(None),
                    }
                }
                Ok(Some((candidate, total)))
            })
            .collect();
        Ok(scored?.into_iter().flatten().collect())
    }

    fn run_sieves(&mut self, context: &mut Context, name: &str, mut candidates: Vec<PackageTuple>) -> EngineResult<Vec<PackageTuple>> {
        for sieve in self.pipeline.sieves.iter_mut() {
            if sieve.should_include(context) {
                candidates = sieve.run(context, name, candidates)?;
            }
        }
        Ok(candidates)
    }

    fn run_boots(&mut self, context: &mut Context) -> EngineResult<()> {
        for boot in self.pipeline.boots.iter_mut() {
            if boot.should_include(context) {
                boot.run(context)?;
            }
        }
        Ok(())
    }

    /// `Ok(true)` if the state is accepted and belongs in the report.
    fn run_strides(&mut self, context: &mut Context, state: &State) -> EngineResult<bool> {
        for stride in self.pipeline.strides.iter_mut() {
            if stride.should_include(context) && !stride.run(context, state)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run_wraps(&mut self, context: &mut Context, state: &mut State) -> EngineResult<()> {
        for wrap in self.pipeline.wraps.iter_mut() {
            if wrap.should_include(context) {
                wrap.run(context, state)?;
            }
        }
        Ok(())
    }

    /// Drives the search to completion. `initial_state` seeds the beam with
    /// the run's top-level requirements already recorded as unresolved
    /// dependencies.
    pub async fn run(&mut self, mut context: Context, initial_state: State) -> EngineResult<Report> {
        self.pipeline.finalize_order();
        self.run_boots(&mut context)?;
        self.predictor.pre_run(&mut context);
        context.beam.add(initial_state);

        let mut accepted: Vec<ResolvedStack> = Vec::new();

        let stop_reason = loop {
            if context.is_cancelled() {
                break StopReason::Cancelled;
            }
            if context.deadline_exceeded() {
                break StopReason::DeadlineExceeded;
            }
            if context.iteration_limit_reached() {
                break StopReason::IterationLimitReached;
            }
            if context.count_reached() {
                break StopReason::CountReached;
            }
            if context.beam.is_empty() {
                // Search space exhausted: nothing left to expand.
                break StopReason::IterationLimitReached;
            }

            let decision = match self.predictor.run(&mut context) {
                Ok(decision) => decision,
                Err(EngineError::NoCandidates(reason)) => {
                    log::debug!("no decision this iteration: {reason}");
                    context.iteration += 1;
                    continue;
                }
                Err(other) => return Err(other),
            };

            let Some(state) = context.beam.get_by_key(decision.beam_key).cloned() else {
                context.iteration += 1;
                continue;
            };

            let dependency_name = decision.dependency.name.clone();
            let candidates = match self.get_versions_with_retry(&dependency_name).await {
                Ok(candidates) => candidates,
                Err(EngineError::OracleUnavailable(reason)) => return Err(EngineError::OracleUnavailable(reason)),
                Err(other) => return Err(other),
            };

            let candidates = self.run_sieves(&mut context, &dependency_name, candidates)?;
            if candidates.is_empty() {
                log::debug!("sieves exhausted candidates for {dependency_name}");
                self.predictor.set_reward_signal(&state, &decision.dependency, f64::NAN);
                context.iteration += 1;
                continue;
            }

            let scored = self.score_candidates(&context, &state, candidates)?;

            for (candidate, delta) in scored {
                let mut child = state.clone();
                child.parent_beam_key = Some(decision.beam_key);
                child.score += delta;

                let dependencies = match self.oracle.get_dependencies(&candidate).await {
                    Ok(deps) => deps,
                    Err(EngineError::OracleUnavailable(reason)) => {
                        return Err(EngineError::OracleUnavailable(reason))
                    }
                    Err(other) => return Err(other),
                };

                child.add_resolved(&dependency_name, candidate.clone());
                for dep_name in dependencies {
                    if child.is_resolved(&dep_name) {
                        continue;
                    }
                    let dep_candidates = match self.get_versions_with_retry(&dep_name).await {
                        Ok(candidates) => candidates,
                        Err(EngineError::OracleUnavailable(reason)) => {
                            return Err(EngineError::OracleUnavailable(reason))
                        }
                        Err(other) => return Err(other),
                    };
                    let dep_candidates = self.run_sieves(&mut context, &dep_name, dep_candidates)?;
                    if !dep_candidates.is_empty() {
                        child.add_unresolved(dep_name, dep_candidates);
                    }
                }

                if child.is_terminal() {
                    let stride_accepted = self.run_strides(&mut context, &child)?;
                    if stride_accepted {
                        self.run_wraps(&mut context, &mut child)?;
                        accepted.push(ResolvedStack {
                            packages: child.iter_resolved_dependencies().cloned().collect(),
                            score: child.score,
                            justification: child.justification.clone(),
                        });
                        context.accepted_final_states_count += 1;
                    }
                    // Terminal either way: a stride-rejected state is still a
                    // completed trajectory for reward-signaling purposes.
                    self.predictor.set_reward_signal(&child, &candidate, f64::INFINITY);
                    if context.count_reached() {
                        break;
                    }
                } else {
                    self.predictor.set_reward_signal(&child, &candidate, delta);
                    context.beam.add(child);
                }
            }

            context.iteration += 1;
        };

        self.predictor.post_run(&mut context);

        Ok(Report {
            stacks: accepted,
            stack_info: context.stack_info.clone(),
            iterations: context.iteration,
            temperature_history: if context.keep_history {
                Some(context.temperature_history.clone())
            } else {
                None
            },
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::step::RecommendationScoringStep;
    use crate::predictor::annealing::AdaptiveSimulatedAnnealing;
    use async_trait::async_trait;
    use stack_resolver_common::EngineConfig;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedOracle {
        versions: Mutex<HashMap<String, Vec<PackageTuple>>>,
        dependencies: HashMap<String, Vec<String>>,
    }

    #[async_trait]
    impl PackageOracle for FixedOracle {
        async fn get_versions(&self, name: &str, _markers: &EnvironmentMarkers) -> EngineResult<Vec<PackageTuple>> {
            Ok(self.versions.lock().unwrap().get(name).cloned().unwrap_or_default())
        }

        async fn get_dependencies(&self, package: &PackageTuple) -> EngineResult<Vec<String>> {
            Ok(self.dependencies.get(&package.name).cloned().unwrap_or_default())
        }

        async fn get_environment_markers(&self, _package: &PackageTuple) -> EngineResult<EnvironmentMarkers> {
            Ok(EnvironmentMarkers::new())
        }
    }

    fn pt(name: &str, version: &str) -> PackageTuple {
        PackageTuple::new(name, version, "https://pypi.org/simple")
    }

    #[tokio::test]
    async fn a_single_dependency_run_produces_one_stack() {
        let mut versions = HashMap::new();
        versions.insert("numpy".to_string(), vec![pt("numpy", "2.0.0"), pt("numpy", "1.0.0")]);
        let oracle = Arc::new(FixedOracle {
            versions: Mutex::new(versions),
            dependencies: HashMap::new(),
        });

        let pipeline = Pipeline::new().with_step(Box::new(RecommendationScoringStep::new()));
        let predictor = Box::new(AdaptiveSimulatedAnnealing::new());

        let mut config = EngineConfig::default();
        config.limit = 50;
        config.count = 1;
        let context = Context::new(&config);

        let mut initial = State::new();
        initial.add_unresolved("numpy", vec![pt("numpy", "2.0.0")]);

        let mut resolver = Resolver::new(pipeline, predictor, oracle, EnvironmentMarkers::new());
        let report = resolver.run(context, initial).await.unwrap();

        assert_eq!(report.stacks.len(), 1);
        assert_eq!(report.stacks[0].packages.len(), 1);
    }

    #[tokio::test]
    async fn an_unsatisfiable_dependency_still_returns_a_report() {
        let oracle = Arc::new(FixedOracle {
            versions: Mutex::new(HashMap::new()),
            dependencies: HashMap::new(),
        });
        let pipeline = Pipeline::new();
        let predictor = Box::new(AdaptiveSimulatedAnnealing::new());

        let mut config = EngineConfig::default();
        config.limit = 5;
        let context = Context::new(&config);

        let mut initial = State::new();
        initial.add_unresolved("ghost", vec![pt("ghost", "1.0.0")]);

        let mut resolver = Resolver::new(pipeline, predictor, oracle, EnvironmentMarkers::new());
        let report = resolver.run(context, initial).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(report.stop_reason, StopReason::IterationLimitReached);
    }
}
