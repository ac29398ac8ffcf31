//! Strides run once a state has resolved every dependency, deciding whether
//! it is accepted as a final stack or discarded.

use stack_resolver_common::EngineResult;

use super::UnitMeta;
use crate::context::Context;
use crate::state::State;

pub trait Stride: UnitMeta {
    fn should_include(&self, _context: &Context) -> bool {
        true
    }

    /// `Ok(false)` rejects the terminal state; it is dropped without
    /// counting toward `count`.
    fn run(&mut self, context: &mut Context, state: &State) -> EngineResult<bool>;
}

/// Rejects terminal stacks whose accumulated score falls below a floor.
pub struct MinimumScoreStride {
    minimum: f64,
}

impl MinimumScoreStride {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl UnitMeta for MinimumScoreStride {
    fn name(&self) -> &str {
        "minimum_score"
    }
}

impl Stride for MinimumScoreStride {
    fn run(&mut self, _context: &mut Context, state: &State) -> EngineResult<bool> {
        Ok(state.score >= self.minimum)
    }
}
