//! Gamepad backend health check

use crate::health::check::{CheckResult, SystemCheck};
use crate::input::{GamepadBackend, GilrsGamepads};

/// Checks whether platform gamepad support initializes
///
/// Missing support only degrades input, so it is reported as a warning.
pub struct GamepadBackendCheck;

impl GamepadBackendCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GamepadBackendCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for GamepadBackendCheck {
    fn name(&self) -> &'static str {
        "Gamepad Backend"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Initializes gilrs and lists connected devices")
    }

    fn check(&self) -> CheckResult {
        let backend = GilrsGamepads::new();
        if !backend.is_available() {
            return CheckResult::warn("Gamepad support unavailable, keyboard and touch only");
        }

        let connected = backend.connected();
        let details = connected
            .iter()
            .map(|id| match backend.snapshot(*id) {
                Some(state) => format!(
                    "✓ Gamepad {id}: {} buttons, {} axes",
                    state.buttons.len(),
                    state.axes.len()
                ),
                None => format!("⚠ Gamepad {id}: listed but unreadable"),
            })
            .collect();

        CheckResult::pass(format!("{} backend, {} connected", backend.name(), connected.len()))
            .with_details(details)
    }
}
