//! The result handed back once a run stops, by whatever means it stopped.

use serde::{Deserialize, Serialize};

use stack_resolver_common::{PackageTuple, StopReason};

use crate::justification::Justification;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedStack {
    pub packages: Vec<PackageTuple>,
    pub score: f64,
    pub justification: Vec<Justification>,
}

/// The final product of a resolver run. Always returned, even if the run
/// was cut short: a `Report` with an empty `stacks` list and a non-`None`
/// `stop_reason` other than `CountReached` is a normal, useful outcome, not
/// a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub stacks: Vec<ResolvedStack>,
    pub stack_info: Vec<Justification>,
    pub iterations: u64,
    /// `(temperature, picked_max, acceptance_probability, accepted_final_states_count)`
    /// per predictor iteration, present only when the run requested history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_history: Option<Vec<(f64, bool, f64, u64)>>,
    pub stop_reason: StopReason,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
