//! Dash controller smoke check

use std::time::Duration;

use crate::config::DashConfig;
use crate::dash::{DashController, DashPhase, TracingChargeBar};
use crate::health::check::{CheckResult, SystemCheck};
use crate::sim::{Player, World};

/// Drives a scratch controller through a tap and a full charge
pub struct DashControllerCheck {
    config: DashConfig,
}

impl DashControllerCheck {
    pub fn new() -> Self {
        Self::with_config(DashConfig::default())
    }

    pub fn with_config(config: DashConfig) -> Self {
        Self { config }
    }

    /// Advances the clock in 16 ms frames until `until`
    fn run_until(
        world: &mut World,
        dash: &mut DashController<Player, TracingChargeBar>,
        until: Duration,
    ) {
        while world.now() < until {
            world.tick(Duration::from_millis(16));
            dash.update(world.now());
        }
    }
}

impl Default for DashControllerCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for DashControllerCheck {
    fn name(&self) -> &'static str {
        "Dash Controller"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Tap dashes, full hold auto-runs, both windows expire")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut world = World::new();
        let mut dash = DashController::new(
            self.config.clone(),
            Player::default(),
            TracingChargeBar::new(),
        );

        // Tap
        dash.on_shift_down(world.now());
        dash.on_shift_up(world.now());
        if dash.phase() != DashPhase::Dashing {
            return CheckResult::fail("Tap did not dash").with_details(details);
        }
        details.push(format!("✓ Tap dashed at {} u/s", dash.body().velocity.x));

        let dash_end = world.now() + self.config.dash_duration();
        Self::run_until(&mut world, &mut dash, dash_end);
        if !dash.can_move() {
            return CheckResult::fail("Dash window never closed").with_details(details);
        }
        details.push(format!("✓ Dash ended after {:?}", self.config.dash_duration()));

        // Full charge
        let pressed_at = world.now();
        dash.on_shift_down(pressed_at);
        Self::run_until(&mut world, &mut dash, pressed_at + self.config.max_charge());
        dash.on_shift_up(world.now());
        if dash.phase() != DashPhase::AutoRunning {
            return CheckResult::fail("Full charge did not auto-run").with_details(details);
        }
        details.push("✓ Full charge started an auto-run".to_string());

        let run_end = world.now() + self.config.auto_run_duration(1.0);
        Self::run_until(&mut world, &mut dash, run_end);
        if dash.phase() != DashPhase::Idle {
            return CheckResult::fail("Auto-run never expired").with_details(details);
        }
        details.push(format!(
            "✓ Auto-run ended after {:?}",
            self.config.auto_run_duration(1.0)
        ));

        CheckResult::pass("Dash and auto-run cycle completed").with_details(details)
    }
}
