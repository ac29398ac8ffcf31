//! Boots run once, before the first iteration. They check the run's
//! environment and record whatever up-front justification the rest of the
//! report should carry.

use stack_resolver_common::EngineResult;

use super::UnitMeta;
use crate::context::Context;
use crate::justification::Justification;

pub trait Boot: UnitMeta {
    /// Whether this boot applies to the run at all. Skipped boots neither
    /// run nor appear in `stack_info`.
    fn should_include(&self, _context: &Context) -> bool {
        true
    }

    fn run(&mut self, context: &mut Context) -> EngineResult<()>;
}

/// Flags runs targeting a Python version old enough to need the
/// `importlib_resources` backport, recording it as a stack-level note
/// rather than silently depending on an interpreter detail.
pub struct BackportRemovalBoot {
    priority: i32,
}

impl BackportRemovalBoot {
    pub fn new() -> Self {
        Self { priority: 0 }
    }

    fn python_needs_backport(version: &str) -> bool {
        let mut parts = version.split('.');
        let major: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        major == 3 && minor < 9
    }
}

impl Default for BackportRemovalBoot {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitMeta for BackportRemovalBoot {
    fn name(&self) -> &str {
        "backport_removal"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl Boot for BackportRemovalBoot {
    fn should_include(&self, context: &Context) -> bool {
        context
            .python_version
            .as_deref()
            .is_some_and(Self::python_needs_backport)
    }

    fn run(&mut self, context: &mut Context) -> EngineResult<()> {
        context.push_stack_info(Justification::new(
            "backport",
            format!(
                "python {} requires importlib_resources as a backport",
                context.python_version.as_deref().unwrap_or("unknown")
            ),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_resolver_common::EngineConfig;

    fn context_with_python(version: Option<&str>) -> Context {
        let mut config = EngineConfig::default();
        config.python_version = version.map(|v| v.to_string());
        Context::new(&config)
    }

    #[test]
    fn should_include_is_true_for_old_python() {
        let boot = BackportRemovalBoot::new();
        let context = context_with_python(Some("3.7"));
        assert!(boot.should_include(&context));
    }

    #[test]
    fn should_include_is_false_for_modern_python() {
        let boot = BackportRemovalBoot::new();
        let context = context_with_python(Some("3.11"));
        assert!(!boot.should_include(&context));
    }

    #[test]
    fn should_include_is_false_when_python_version_unknown() {
        let boot = BackportRemovalBoot::new();
        let context = context_with_python(None);
        assert!(!boot.should_include(&context));
    }

    #[test]
    fn run_records_stack_info() {
        let mut boot = BackportRemovalBoot::new();
        let mut context = context_with_python(Some("3.6"));
        boot.run(&mut context).unwrap();
        assert_eq!(context.stack_info.len(), 1);
    }
}
