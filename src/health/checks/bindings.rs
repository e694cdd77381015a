//! Binding table health check

use crate::health::check::{CheckResult, SystemCheck};
use crate::input::{BindingSet, InputContextKind, MOVEMENT_ACTIONS};

/// Checks that each context binds movement and has no key collisions
pub struct BindingsCheck;

impl BindingsCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BindingsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BindingsCheck {
    fn name(&self) -> &'static str {
        "Input Bindings"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Every context resolves movement and binds each key once")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut problems = 0;

        for kind in InputContextKind::ALL {
            let set = BindingSet::for_context(kind);

            let missing: Vec<_> = MOVEMENT_ACTIONS
                .iter()
                .filter(|name| set.get(name).is_none())
                .collect();
            if !missing.is_empty() {
                details.push(format!("✗ {kind}: missing {missing:?}"));
                problems += 1;
            }

            for (key, names) in set.duplicate_keys() {
                details.push(format!("✗ {kind}: {key:?} bound to {names:?}"));
                problems += 1;
            }

            details.push(format!("  {kind}: {} actions", set.len()));
        }

        if problems > 0 {
            CheckResult::fail(format!("{problems} binding problem(s)")).with_details(details)
        } else {
            CheckResult::pass(format!("{} contexts consistent", InputContextKind::ALL.len()))
                .with_details(details)
        }
    }
}
