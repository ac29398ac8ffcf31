//! Sieves filter an oracle's candidate stream for one open dependency
//! before the predictor ever sees it. They never score; they only keep or
//! drop candidates.

use stack_resolver_common::{EngineResult, PackageTuple};

use super::UnitMeta;
use crate::context::Context;

pub trait Sieve: UnitMeta {
    fn should_include(&self, _context: &Context) -> bool {
        true
    }

    fn run(
        &mut self,
        context: &mut Context,
        dependency_name: &str,
        candidates: Vec<PackageTuple>,
    ) -> EngineResult<Vec<PackageTuple>>;
}

fn version_marker(version: &str) -> String {
    version
        .chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn is_prerelease(version: &str) -> bool {
    matches!(
        version_marker(version).as_str(),
        "a" | "b" | "rc" | "dev" | "alpha" | "beta" | "pre" | "preview"
    )
}

/// Drops pre-release candidates unless `allow_prereleases` is set, e.g.
/// because every remaining stable candidate has already been exhausted.
///
/// Reports the drop once per sieve instance rather than once per process:
/// a shared, global debounce flag would leak across unrelated runs sharing
/// the same binary.
pub struct CutPreReleasesSieve {
    allow_prereleases: bool,
    reported: bool,
}

impl CutPreReleasesSieve {
    pub fn new(allow_prereleases: bool) -> Self {
        Self {
            allow_prereleases,
            reported: false,
        }
    }
}

impl UnitMeta for CutPreReleasesSieve {
    fn name(&self) -> &str {
        "cut_prereleases"
    }
}

impl Sieve for CutPreReleasesSieve {
    fn run(
        &mut self,
        _context: &mut Context,
        _dependency_name: &str,
        candidates: Vec<PackageTuple>,
    ) -> EngineResult<Vec<PackageTuple>> {
        if self.allow_prereleases {
            return Ok(candidates);
        }
        let before = candidates.len();
        let filtered: Vec<PackageTuple> = candidates
            .into_iter()
            .filter(|pt| !is_prerelease(&pt.version))
            .collect();
        if filtered.len() < before && !self.reported {
            log::debug!("cut_prereleases sieve removed {} candidates", before - filtered.len());
            self.reported = true;
        }
        Ok(filtered)
    }
}

/// Keeps only the `limit` most recent candidates per dependency, assuming
/// the oracle already returns candidates newest-first.
pub struct LimitLatestVersionsSieve {
    limit: usize,
}

impl LimitLatestVersionsSieve {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl UnitMeta for LimitLatestVersionsSieve {
    fn name(&self) -> &str {
        "limit_latest_versions"
    }

    fn priority(&self) -> i32 {
        10
    }
}

impl Sieve for LimitLatestVersionsSieve {
    fn run(
        &mut self,
        _context: &mut Context,
        _dependency_name: &str,
        mut candidates: Vec<PackageTuple>,
    ) -> EngineResult<Vec<PackageTuple>> {
        if self.limit > 0 && candidates.len() > self.limit {
            candidates.truncate(self.limit);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_resolver_common::EngineConfig;

    fn pt(version: &str) -> PackageTuple {
        PackageTuple::new("tensorflow", version, "https://pypi.org/simple")
    }

    #[test]
    fn cut_prereleases_drops_marked_versions() {
        let mut sieve = CutPreReleasesSieve::new(false);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        let candidates = vec![pt("2.0.0"), pt("2.1.0rc1"), pt("2.1.0a1")];
        let result = sieve.run(&mut context, "tensorflow", candidates).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].version, "2.0.0");
    }

    #[test]
    fn cut_prereleases_allows_when_configured() {
        let mut sieve = CutPreReleasesSieve::new(true);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        let candidates = vec![pt("2.1.0rc1")];
        let result = sieve.run(&mut context, "tensorflow", candidates).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn limit_latest_versions_truncates() {
        let mut sieve = LimitLatestVersionsSieve::new(2);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        let candidates = vec![pt("3.0.0"), pt("2.0.0"), pt("1.0.0")];
        let result = sieve.run(&mut context, "tensorflow", candidates).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].version, "3.0.0");
    }

    #[test]
    fn limit_zero_means_unbounded() {
        let mut sieve = LimitLatestVersionsSieve::new(0);
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        let candidates = vec![pt("3.0.0"), pt("2.0.0"), pt("1.0.0")];
        let result = sieve.run(&mut context, "tensorflow", candidates).unwrap();
        assert_eq!(result.len(), 3);
    }
}
