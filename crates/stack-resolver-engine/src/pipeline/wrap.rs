//! Wraps post-process a state after a stride has accepted it as final,
//! typically to attach human-readable justification before it's added to
//! the report.

use stack_resolver_common::EngineResult;

use super::UnitMeta;
use crate::context::Context;
use crate::justification::Justification;
use crate::state::State;

pub trait Wrap: UnitMeta {
    fn should_include(&self, _context: &Context) -> bool {
        true
    }

    fn run(&mut self, context: &mut Context, state: &mut State) -> EngineResult<()>;
}

/// Appends a one-line summary of the accepted stack's size and score.
pub struct SummaryJustificationWrap;

impl SummaryJustificationWrap {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SummaryJustificationWrap {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitMeta for SummaryJustificationWrap {
    fn name(&self) -> &str {
        "summary_justification"
    }

    fn priority(&self) -> i32 {
        100
    }
}

impl Wrap for SummaryJustificationWrap {
    fn run(&mut self, _context: &mut Context, state: &mut State) -> EngineResult<()> {
        state.push_justification(Justification::new(
            "summary",
            format!(
                "resolved {} packages with score {:.3}",
                state.resolved_len(),
                state.score
            ),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_resolver_common::EngineConfig;

    #[test]
    fn run_appends_a_summary_entry() {
        let mut wrap = SummaryJustificationWrap::new();
        let config = EngineConfig::default();
        let mut context = Context::new(&config);
        let mut state = State::new();
        state.score = 1.5;
        wrap.run(&mut context, &mut state).unwrap();
        assert_eq!(state.justification.len(), 1);
        assert_eq!(state.justification[0].kind, "summary");
    }
}
