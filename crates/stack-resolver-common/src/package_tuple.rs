//! The canonical package identity used throughout the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `(name, version, index_url)` — the canonical identity key for a single
/// resolvable package version. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageTuple {
    pub name: String,
    pub version: String,
    pub index_url: String,
}

impl PackageTuple {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        index_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            index_url: index_url.into(),
        }
    }
}

impl fmt::Display for PackageTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={} ({})", self.name, self.version, self.index_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = PackageTuple::new("numpy", "1.0.0", "https://pypi.org/simple");
        let b = PackageTuple::new("numpy", "1.0.0", "https://pypi.org/simple");
        let c = PackageTuple::new("numpy", "2.0.0", "https://pypi.org/simple");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_is_human_readable() {
        let pt = PackageTuple::new("tensorflow", "2.0.0", "https://thoth-station.ninja/simple");
        assert_eq!(
            pt.to_string(),
            "tensorflow==2.0.0 (https://thoth-station.ninja/simple)"
        );
    }
}
