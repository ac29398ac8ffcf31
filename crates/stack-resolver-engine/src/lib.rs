//! # Stack Resolver Engine
//!
//! A beam-driven stochastic search over partial dependency resolutions.
//!
//! The core loop ([`resolver::Resolver`]) repeatedly asks a pluggable
//! [`predictor::Predictor`] which live [`state::State`] to expand and which
//! of its open dependencies to resolve next, fetches candidate versions
//! through a [`oracle::PackageOracle`], filters and scores them with an
//! ordered [`pipeline::Pipeline`], and keeps the resulting states in a
//! width-bounded [`beam::Beam`] until one of several termination
//! conditions is reached. The loop always produces a [`report::Report`],
//! even when cut short.

pub mod beam;
pub mod context;
pub mod justification;
pub mod oracle;
pub mod pipeline;
pub mod policy;
pub mod predictor;
pub mod report;
pub mod resolver;
pub mod state;

pub use beam::Beam;
pub use context::{CancellationToken, Context};
pub use justification::Justification;
pub use oracle::{EnvironmentMarkers, PackageOracle};
pub use pipeline::{Pipeline, UnitMeta};
pub use policy::{PolicyEntry, PolicyStore};
pub use predictor::{Decision, Predictor};
pub use report::{Report, ResolvedStack};
pub use resolver::Resolver;
pub use state::State;
