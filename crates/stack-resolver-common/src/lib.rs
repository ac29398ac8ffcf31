//! # Stack Resolver Common
//!
//! Shared types used across the stack resolution engine:
//!
//! - Error and normal-termination types
//! - Engine-wide configuration
//! - The `PackageTuple` canonical identity type

pub mod config;
pub mod error;
pub mod package_tuple;

pub use config::{DecisionType, EngineConfig, RecommendationType};
pub use error::{EngineError, EngineResult, StopReason};
pub use package_tuple::PackageTuple;
