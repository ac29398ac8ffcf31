//! Everything the resolver loop threads through a single run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use stack_resolver_common::{DecisionType, EngineConfig, RecommendationType};

use crate::beam::Beam;
use crate::justification::Justification;

/// A clonable handle a caller can use to request cancellation of an
/// in-flight run from another thread.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Mutable state threaded through every iteration of the resolver loop.
pub struct Context {
    pub iteration: u64,
    pub beam: Beam,
    pub limit: u64,
    pub count: u64,
    pub accepted_final_states_count: u64,
    pub stack_info: Vec<Justification>,
    pub recommendation_type: RecommendationType,
    pub decision_type: Option<DecisionType>,
    pub keep_history: bool,
    /// `(temperature, picked_max, acceptance_probability, accepted_final_states_count)`
    /// per predictor iteration, append-only.
    pub temperature_history: Vec<(f64, bool, f64, u64)>,
    pub python_version: Option<String>,
    pub operating_system: Option<String>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
    rng: StdRng,
}

impl Context {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    pub fn with_cancellation(config: &EngineConfig, cancellation: CancellationToken) -> Self {
        let deadline = if config.timeout_seconds > 0 {
            Some(Instant::now() + Duration::from_secs(config.timeout_seconds))
        } else {
            None
        };
        Self {
            iteration: 0,
            beam: Beam::new(config.beam_width),
            limit: config.limit,
            count: config.count,
            accepted_final_states_count: 0,
            stack_info: Vec::new(),
            recommendation_type: config.recommendation_type,
            decision_type: config.decision_type,
            keep_history: config.keep_history,
            temperature_history: Vec::new(),
            python_version: config.python_version.clone(),
            operating_system: config.operating_system.clone(),
            cancellation,
            deadline,
            rng: StdRng::seed_from_u64(config.prng_seed),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn iteration_limit_reached(&self) -> bool {
        self.limit > 0 && self.iteration >= self.limit
    }

    pub fn count_reached(&self) -> bool {
        self.count > 0 && self.accepted_final_states_count >= self.count
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn record_temperature(
        &mut self,
        temperature: f64,
        picked_max: bool,
        acceptance_probability: f64,
        accepted_final_states_count: u64,
    ) {
        if self.keep_history {
            self.temperature_history
                .push((temperature, picked_max, acceptance_probability, accepted_final_states_count));
        }
    }

    pub fn push_stack_info(&mut self, justification: Justification) {
        self.stack_info.push(justification);
    }
}
