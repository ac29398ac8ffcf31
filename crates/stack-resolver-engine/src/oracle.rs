//! The external package-metadata contract the engine negotiates against.
//!
//! Nothing in this crate implements `PackageOracle` against a real index;
//! that lives outside the engine's scope. Production callers provide their
//! own implementation, tests provide an in-memory one.

use async_trait::async_trait;

use stack_resolver_common::{EngineResult, PackageTuple};

/// An environment marker value, e.g. `python_version` or `sys_platform`.
pub type EnvironmentMarkers = std::collections::HashMap<String, String>;

/// Read-only access to package metadata. All methods are async because real
/// implementations hit a network index or a database.
#[async_trait]
pub trait PackageOracle: Send + Sync {
    /// All known versions of `name`, newest first.
    async fn get_versions(&self, name: &str, markers: &EnvironmentMarkers) -> EngineResult<Vec<PackageTuple>>;

    /// The direct dependency names (and optional version specifiers,
    /// opaque to the engine) declared by `package`.
    async fn get_dependencies(&self, package: &PackageTuple) -> EngineResult<Vec<String>>;

    /// The environment markers `package` was published with, if any.
    async fn get_environment_markers(&self, package: &PackageTuple) -> EngineResult<EnvironmentMarkers>;
}
