//! The scoring pipeline: an ordered sequence of small, independently
//! testable units that run at fixed points in the resolver loop.
//!
//! Five categories exist, corresponding to the five moments a resolution
//! run passes through: [`boot::Boot`] at startup, [`sieve::Sieve`] to
//! pre-filter an oracle's candidate stream, [`step::Step`] to score (or
//! veto) a single expansion, [`stride::Stride`] to accept or reject a
//! terminal state, and [`wrap::Wrap`] to post-process an accepted stack.
//! Units within a category run in a fixed order: by declared priority, then
//! by name, so that a pipeline built from the same unit set always runs in
//! the same order.

pub mod boot;
pub mod sieve;
pub mod step;
pub mod stride;
pub mod wrap;

use boot::Boot;
use sieve::Sieve;
use step::Step;
use stride::Stride;
use wrap::Wrap;

/// Shared identity and ordering contract every pipeline unit implements.
pub trait UnitMeta {
    /// Stable, unique name used for logging and deterministic ordering.
    fn name(&self) -> &str;

    /// Lower runs first. Units with equal priority are ordered by name.
    fn priority(&self) -> i32 {
        0
    }
}

fn sort_units<T: UnitMeta + ?Sized>(units: &mut Vec<Box<T>>) {
    units.sort_by(|a, b| a.priority().cmp(&b.priority()).then_with(|| a.name().cmp(b.name())));
}

/// The full, ordered set of units a run applies.
#[derive(Default)]
pub struct Pipeline {
    pub boots: Vec<Box<dyn Boot>>,
    pub sieves: Vec<Box<dyn Sieve>>,
    pub steps: Vec<Box<dyn Step>>,
    pub strides: Vec<Box<dyn Stride>>,
    pub wraps: Vec<Box<dyn Wrap>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boot(mut self, boot: Box<dyn Boot>) -> Self {
        self.boots.push(boot);
        self
    }

    pub fn with_sieve(mut self, sieve: Box<dyn Sieve>) -> Self {
        self.sieves.push(sieve);
        self
    }

    pub fn with_step(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_stride(mut self, stride: Box<dyn Stride>) -> Self {
        self.strides.push(stride);
        self
    }

    pub fn with_wrap(mut self, wrap: Box<dyn Wrap>) -> Self {
        self.wraps.push(wrap);
        self
    }

    /// Fixes the run order of every category. Call once after all units are
    /// registered and before the resolver loop starts.
    pub fn finalize_order(&mut self) {
        sort_units(&mut self.boots);
        sort_units(&mut self.sieves);
        sort_units(&mut self.steps);
        sort_units(&mut self.strides);
        sort_units(&mut self.wraps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use stack_resolver_common::{EngineConfig, EngineResult};

    struct NamedBoot(&'static str, i32);
    impl UnitMeta for NamedBoot {
        fn name(&self) -> &str {
            self.0
        }
        fn priority(&self) -> i32 {
            self.1
        }
    }
    impl Boot for NamedBoot {
        fn run(&mut self, _context: &mut Context) -> EngineResult<()> {
            Ok(())
        }
    }

    #[test]
    fn units_run_in_priority_then_name_order() {
        let mut pipeline = Pipeline::new()
            .with_boot(Box::new(NamedBoot("zeta", 0)))
            .with_boot(Box::new(NamedBoot("alpha", 0)))
            .with_boot(Box::new(NamedBoot("urgent", -5)));
        pipeline.finalize_order();
        let names: Vec<&str> = pipeline.boots.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["urgent", "alpha", "zeta"]);
    }

    #[test]
    fn empty_pipeline_has_no_units() {
        let config = EngineConfig::default();
        let _context = Context::new(&config);
        let pipeline = Pipeline::new();
        assert!(pipeline.boots.is_empty());
        assert!(pipeline.sieves.is_empty());
    }
}
