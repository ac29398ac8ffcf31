//! Configuration for the stack resolution engine.

use serde::{Deserialize, Serialize};
use std::env;

/// The objective the engine scores candidate stacks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationType {
    Latest,
    Stable,
    Testing,
    Performance,
    Security,
}

impl Default for RecommendationType {
    fn default() -> Self {
        Self::Latest
    }
}

/// Dependency-monkey mode: how candidate versions are chosen when the goal
/// is coverage rather than a single best recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionType {
    Random,
    All,
}

/// Engine-wide configuration, read once before the resolver loop starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub recommendation_type: RecommendationType,
    pub decision_type: Option<DecisionType>,

    /// Maximum number of final stacks to keep.
    pub count: u64,
    /// Maximum number of resolver-loop iterations.
    pub limit: u64,
    /// Beam width. 0 means unbounded.
    pub beam_width: usize,
    /// Wall-clock budget for the whole run.
    pub timeout_seconds: u64,
    /// Seed for the single PRNG owned by `Context`; fixing it together with
    /// `beam_width` and unit order makes a run reproducible.
    pub prng_seed: u64,
    /// Whether to record the temperature/acceptance telemetry history.
    pub keep_history: bool,
    /// Cap on the Temporal Difference policy store. 0 = unlimited. Overridable
    /// by `THOTH_TD_POLICY_SIZE`.
    pub td_policy_size: usize,
    /// Cap on the MCTS policy store. 0 = unlimited. Overridable by
    /// `THOTH_MCTS_POLICY_SIZE`.
    pub mcts_policy_size: usize,

    pub python_version: Option<String>,
    pub operating_system: Option<String>,
    pub develop: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommendation_type: RecommendationType::default(),
            decision_type: None,
            count: 1,
            limit: 10_000,
            beam_width: 0,
            timeout_seconds: 300,
            prng_seed: 0,
            keep_history: false,
            td_policy_size: env_usize("THOTH_TD_POLICY_SIZE").unwrap_or(0),
            mcts_policy_size: env_usize("THOTH_MCTS_POLICY_SIZE").unwrap_or(0),
            python_version: None,
            operating_system: None,
            develop: false,
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
