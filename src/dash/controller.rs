//! Tap-to-dash / hold-to-auto-run state machine

use std::time::Duration;

use tracing::debug;

use super::collaborators::{ChargeBar, MovementBody};
use super::scheduler::{Scheduler, TaskToken};
use crate::config::DashConfig;
use crate::input::TouchSource;

/// Id the controller registers its charge bar under
pub const CHARGE_BAR_ID: &str = "dash-charge";

/// Coarse controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPhase {
    Idle,
    Charging,
    Dashing,
    AutoRunning,
}

/// Observable charge/dash record
///
/// At most one of `is_dashing` / `is_auto_running` is set, and
/// `is_charging` never coexists with `is_auto_running`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashState {
    pub is_dashing: bool,
    pub is_charging: bool,
    pub is_auto_running: bool,
    /// Accumulated hold time, capped at the charge window
    pub charge_time: Duration,
    /// -1, 0 or 1
    pub auto_run_direction: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashTask {
    EndDash,
    EndAutoRun,
}

/// Turns a press/release signal plus hold duration into a dash or an auto-run
pub struct DashController<B, C> {
    config: DashConfig,
    body: B,
    charge_bar: C,
    touch: Option<Box<dyn TouchSource>>,
    state: DashState,
    shift_pressed: bool,
    pressed_at: Duration,
    last_update: Option<Duration>,
    dash_direction: i8,
    scheduler: Scheduler<DashTask>,
    dash_token: Option<TaskToken>,
    auto_run_token: Option<TaskToken>,
    destroyed: bool,
}

impl<B: MovementBody, C: ChargeBar> DashController<B, C> {
    pub fn new(config: DashConfig, body: B, mut charge_bar: C) -> Self {
        charge_bar.create(CHARGE_BAR_ID, config.charge_bar_color);
        charge_bar.hide();

        Self {
            config,
            body,
            charge_bar,
            touch: None,
            state: DashState::default(),
            shift_pressed: false,
            pressed_at: Duration::ZERO,
            last_update: None,
            dash_direction: 0,
            scheduler: Scheduler::new(),
            dash_token: None,
            auto_run_token: None,
            destroyed: false,
        }
    }

    /// Listens to the on-screen shift button of a touch source
    pub fn with_touch(mut self, touch: impl TouchSource + 'static) -> Self {
        self.touch = Some(Box::new(touch));
        self
    }

    pub fn state(&self) -> DashState {
        self.state
    }

    pub fn phase(&self) -> DashPhase {
        if self.state.is_auto_running {
            DashPhase::AutoRunning
        } else if self.state.is_dashing {
            DashPhase::Dashing
        } else if self.state.is_charging {
            DashPhase::Charging
        } else {
            DashPhase::Idle
        }
    }

    /// Accumulated charge divided by the charge window, in [0, 1]
    pub fn charge_fraction(&self) -> f32 {
        let max = self.config.max_charge();
        if max.is_zero() {
            return 0.0;
        }
        self.state.charge_time.div_duration_f32(max).clamp(0.0, 1.0)
    }

    /// False while a dash or auto-run owns horizontal movement
    pub fn can_move(&self) -> bool {
        !self.state.is_dashing && !self.state.is_auto_running
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn charge_bar(&self) -> &C {
        &self.charge_bar
    }

    /// Starts (or restarts) charging; ignored while auto-running
    pub fn on_shift_down(&mut self, now: Duration) {
        if self.destroyed {
            return;
        }
        if self.state.is_auto_running {
            debug!("Shift pressed during auto-run, ignored");
            return;
        }

        self.shift_pressed = true;
        self.pressed_at = now;
        self.last_update = Some(now);
        self.state.is_charging = true;
        self.state.charge_time = Duration::ZERO;
        self.charge_bar.update(0.0);
        debug!(?now, "Charging");
    }

    /// Resolves the hold into a dash or an auto-run
    pub fn on_shift_up(&mut self, now: Duration) {
        if self.destroyed || !self.shift_pressed {
            return;
        }
        self.shift_pressed = false;
        self.accumulate_charge(now);
        self.charge_bar.hide();

        let held = now.saturating_sub(self.pressed_at);
        if held < self.config.tap_threshold() {
            self.state.is_charging = false;
            self.state.charge_time = Duration::ZERO;
            self.execute_dash(now);
        } else {
            self.execute_auto_run(now);
        }
    }

    /// Advances timers and applies velocities; call once per frame
    pub fn update(&mut self, now: Duration) {
        if self.destroyed {
            return;
        }

        let signals = self
            .touch
            .as_ref()
            .map(|touch| touch.drain_shift_signals())
            .unwrap_or_default();
        for signal in signals {
            if signal.active {
                self.on_shift_down(now);
            } else {
                self.on_shift_up(now);
            }
        }

        for (token, task) in self.scheduler.drain_due(now) {
            match task {
                DashTask::EndDash if self.dash_token == Some(token) => self.finish_dash(),
                DashTask::EndAutoRun if self.auto_run_token == Some(token) => {
                    self.finish_auto_run()
                }
                _ => {}
            }
        }

        self.accumulate_charge(now);
        if self.state.is_charging {
            self.charge_bar.update(self.charge_fraction());
        }

        if self.state.is_auto_running {
            let velocity = f32::from(self.state.auto_run_direction) * self.config.auto_run_speed;
            self.body.set_velocity_x(velocity);
        } else if self.state.is_dashing {
            let velocity = f32::from(self.dash_direction) * self.config.dash_speed;
            self.body.set_velocity_x(velocity);
        }
    }

    fn accumulate_charge(&mut self, now: Duration) {
        let elapsed = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_update = Some(now);

        if self.state.is_charging {
            self.state.charge_time = (self.state.charge_time + elapsed).min(self.config.max_charge());
        }
    }

    /// Direction of current motion, else facing, else right
    fn travel_direction(&self) -> i8 {
        let velocity = self.body.velocity_x();
        if velocity > 0.0 {
            1
        } else if velocity < 0.0 || self.body.is_flipped_x() {
            -1
        } else {
            1
        }
    }

    /// Instant fixed-length dash; no-op while already dashing
    pub fn execute_dash(&mut self, now: Duration) {
        if self.destroyed || self.state.is_dashing {
            return;
        }
        if self.state.is_auto_running {
            debug!("Dash requested during auto-run, ignored");
            return;
        }

        self.dash_direction = self.travel_direction();
        self.state.is_dashing = true;
        self.body
            .set_velocity_x(f32::from(self.dash_direction) * self.config.dash_speed);
        self.body.set_alpha(self.config.dash_alpha);
        self.dash_token = Some(
            self.scheduler
                .schedule(now + self.config.dash_duration(), DashTask::EndDash),
        );
        debug!(direction = self.dash_direction, "Dash");
    }

    /// Consumes the current charge into an auto-run, or fizzles if too weak
    pub fn execute_auto_run(&mut self, now: Duration) {
        if self.destroyed || self.state.is_auto_running {
            return;
        }

        let fraction = self.charge_fraction();
        self.state.is_charging = false;
        self.state.charge_time = Duration::ZERO;

        if fraction < self.config.min_charge_fraction {
            debug!(fraction, "Charge too low, auto-run cancelled");
            return;
        }

        // Auto-run takes over from an in-flight dash
        if self.state.is_dashing {
            if let Some(token) = self.dash_token {
                self.scheduler.cancel(token);
            }
            self.finish_dash();
        }

        let direction = self.travel_direction();
        let duration = self.config.auto_run_duration(fraction);
        self.state.is_auto_running = true;
        self.state.auto_run_direction = direction;
        self.body
            .set_velocity_x(f32::from(direction) * self.config.auto_run_speed);
        self.auto_run_token = Some(
            self.scheduler
                .schedule(now + duration, DashTask::EndAutoRun),
        );
        debug!(fraction, ?duration, direction, "Auto-run");
    }

    fn finish_dash(&mut self) {
        self.state.is_dashing = false;
        self.dash_token = None;
        self.body.set_alpha(1.0);
        debug!("Dash finished");
    }

    fn finish_auto_run(&mut self) {
        self.state.is_auto_running = false;
        self.state.auto_run_direction = 0;
        self.auto_run_token = None;
        debug!("Auto-run finished");
    }

    /// Forces Idle from any state, cancelling every pending transition
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.dash_token = None;
        self.auto_run_token = None;
        if self.state.is_dashing {
            self.body.set_alpha(1.0);
        }
        self.state = DashState::default();
        self.shift_pressed = false;
        self.charge_bar.hide();
    }

    /// Resets and stops reacting to any further input
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.reset();
        self.touch = None;
        self.destroyed = true;
    }

    /// Number of transitions waiting on the clock
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Body {
        velocity_x: f32,
        flipped: bool,
        alpha: f32,
    }

    impl MovementBody for Body {
        fn velocity_x(&self) -> f32 {
            self.velocity_x
        }

        fn set_velocity_x(&mut self, velocity: f32) {
            self.velocity_x = velocity;
        }

        fn is_flipped_x(&self) -> bool {
            self.flipped
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
        }
    }

    #[derive(Debug, Default)]
    struct Bar {
        id: String,
        fills: Vec<f32>,
        hidden: usize,
    }

    impl ChargeBar for Bar {
        fn create(&mut self, id: &str, _color: u32) {
            self.id = id.to_string();
        }

        fn update(&mut self, fraction: f32) {
            self.fills.push(fraction);
        }

        fn hide(&mut self) {
            self.hidden += 1;
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> DashController<Body, Bar> {
        DashController::new(DashConfig::default(), Body::default(), Bar::default())
    }

    #[test]
    fn test_charge_bar_registered_and_hidden_on_creation() {
        let dash = controller();
        assert_eq!(dash.charge_bar().id, CHARGE_BAR_ID);
        assert_eq!(dash.charge_bar().hidden, 1);
    }

    #[test]
    fn test_charge_accumulates_and_caps() {
        let mut dash = controller();
        dash.on_shift_down(ms(0));
        for t in (100..=1500).step_by(100) {
            dash.update(ms(t));
        }

        assert_eq!(dash.state().charge_time, ms(1000));
        assert_eq!(dash.charge_fraction(), 1.0);
        assert_eq!(dash.charge_bar().fills.last(), Some(&1.0));
    }

    #[test]
    fn test_dash_prefers_flip_when_standing_still() {
        let mut dash = controller();
        dash.body_mut().flipped = true;
        dash.on_shift_down(ms(0));
        dash.on_shift_up(ms(50));

        assert_eq!(dash.body().velocity_x, -600.0);
        assert_eq!(dash.body().alpha, 0.6);
    }

    #[test]
    fn test_velocity_sign_beats_flip() {
        let mut dash = controller();
        dash.body_mut().flipped = true;
        dash.body_mut().velocity_x = 120.0;
        dash.execute_dash(ms(0));

        assert_eq!(dash.body().velocity_x, 600.0);
    }

    #[test]
    fn test_execute_dash_twice_is_noop() {
        let mut dash = controller();
        dash.execute_dash(ms(0));
        dash.execute_dash(ms(100));

        assert_eq!(dash.pending_tasks(), 1);
        dash.update(ms(200));
        assert_eq!(dash.phase(), DashPhase::Idle);
        assert_eq!(dash.body().alpha, 1.0);
    }

    #[test]
    fn test_auto_run_preempts_dash() {
        let mut dash = controller();
        dash.on_shift_down(ms(0));
        dash.update(ms(200));
        dash.execute_dash(ms(300));
        assert_eq!(dash.phase(), DashPhase::Dashing);

        dash.on_shift_up(ms(400));

        let state = dash.state();
        assert!(state.is_auto_running);
        assert!(!state.is_dashing);
        assert_eq!(dash.body().alpha, 1.0);
        // Only the auto-run end remains scheduled
        assert_eq!(dash.pending_tasks(), 1);
    }

    #[test]
    fn test_destroyed_controller_ignores_input() {
        let mut dash = controller();
        dash.destroy();
        dash.on_shift_down(ms(0));
        dash.update(ms(100));

        assert_eq!(dash.phase(), DashPhase::Idle);
        assert!(dash.charge_bar().fills.is_empty());
    }
}
