//! Steps score (or veto) a single candidate expansion once a sieve has
//! already approved it as a member of its dependency's candidate set.

use stack_resolver_common::{EngineResult, PackageTuple, RecommendationType};

use super::UnitMeta;
use crate::context::Context;
use crate::state::State;

pub trait Step: UnitMeta + Sync {
    fn should_include(&self, _context: &Context) -> bool {
        true
    }

    /// `Ok(None)` vetoes the candidate outright; the expansion is dropped
    /// before it ever reaches the beam. Takes `&self` rather than `&mut
    /// self` so candidates can be scored in parallel.
    fn run(&self, context: &Context, state: &State, candidate: &PackageTuple) -> EngineResult<Option<f64>>;
}

fn numeric_rank(version: &str) -> f64 {
    version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .take(3)
        .filter_map(|part| part.parse::<f64>().ok())
        .enumerate()
        .fold(0.0, |acc, (i, n)| acc + n / 1000f64.powi(i as i32))
}

/// Scores a candidate according to the run's configured recommendation
/// objective. `Latest` rewards higher version numbers; the other
/// objectives are intentionally coarse placeholders for signals (stability
/// history, benchmark results, advisory feeds) this engine doesn't itself
/// source.
pub struct RecommendationScoringStep;

impl RecommendationScoringStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecommendationScoringStep {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitMeta for RecommendationScoringStep {
    fn name(&self) -> &str {
        "recommendation_scoring"
    }
}

impl Step for RecommendationScoringStep {
    fn run(&self, context: &Context, _state: &State, candidate: &PackageTuple) -> EngineResult<Option<f64>> {
        let score = match context.recommendation_type {
            RecommendationType::Latest => numeric_rank(&candidate.version),
            RecommendationType::Stable | RecommendationType::Testing => 0.5,
            RecommendationType::Performance | RecommendationType::Security => 0.5,
        };
        Ok(Some(score))
    }
}
