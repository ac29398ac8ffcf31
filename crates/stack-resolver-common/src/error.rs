//! Error and normal-termination types for the stack resolution engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for engine operations.
///
/// Distinguishes bugs and unavailable collaborators (fatal) from the
/// data-driven dead ends the resolver loop recovers from locally.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A sieve emptied the candidate list for an open dependency. Recovered
    /// locally by the resolver loop: the expansion is abandoned, not retried.
    #[error("no candidates remain for dependency {0:?} after sieving")]
    NoCandidates(String),

    /// A `State` invariant was violated (e.g. `add_resolved` for a name not
    /// in `unresolved`). Always a bug; aborts the run.
    #[error("state invariant violated: {0}")]
    StateInvariantViolation(String),

    /// The package metadata oracle failed. Retried once with a short
    /// backoff by the resolver loop; fatal if the retry also fails.
    #[error("package metadata oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// A pipeline unit's configuration was invalid. Raised during pipeline
    /// build, before the resolver loop starts.
    #[error("unit configuration error in {unit}: {reason}")]
    UnitConfigurationError { unit: String, reason: String },

    /// Serialization of a report or justification failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Why the resolver loop stopped. Per spec, these are normal termination
/// conditions, not errors: the loop always returns a (possibly empty) report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// `context.iteration` reached `context.limit`.
    IterationLimitReached,
    /// `context.accepted_final_states_count` reached `context.count`.
    CountReached,
    /// The wall-clock deadline passed.
    DeadlineExceeded,
    /// An external cancellation flag was observed.
    Cancelled,
}
