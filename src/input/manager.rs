//! Unified input manager

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use glam::Vec2;
use tracing::{debug, info, warn};
use winit::event::WindowEvent;

use super::bindings::{Binding, BindingSet, InputContextKind};
use super::collector::KeyboardCollector;
use super::events::KeyCode;
use super::gamepad::{GamepadBackend, GamepadEvent, GilrsGamepads};
use super::state::GamepadState;
use super::touch::{TouchSource, digital_vector};
use crate::config::InputConfig;

/// Single source of truth for "is this logical action active"
///
/// Per frame the host calls [`update`](Self::update) first, queries actions,
/// then [`end_frame`](Self::end_frame) (or at least
/// [`update_gamepad_states`](Self::update_gamepad_states)) once input has been
/// consumed. Skipping the end-of-frame call leaves gamepad edge queries stale.
pub struct InputManager {
    config: InputConfig,
    context: Option<InputContextKind>,
    bindings: BindingSet,
    keyboard: KeyboardCollector,
    /// None once cleaned up
    backend: Option<Box<dyn GamepadBackend>>,
    active_gamepad: Option<usize>,
    gamepad: Option<GamepadState>,
    previous_gamepad: Option<GamepadState>,
    last_poll: Option<Duration>,
    touch: Option<Box<dyn TouchSource>>,
    /// Unknown action names already reported
    warned: RefCell<HashSet<String>>,
}

impl InputManager {
    /// Creates a manager with no bindings; call [`init`](Self::init) next
    pub fn new(config: InputConfig, backend: Box<dyn GamepadBackend>) -> Self {
        if !backend.is_available() {
            warn!(backend = backend.name(), "No gamepad support, keyboard and touch only");
        }

        Self {
            config,
            context: None,
            bindings: BindingSet::default(),
            keyboard: KeyboardCollector::new(),
            backend: Some(backend),
            active_gamepad: None,
            gamepad: None,
            previous_gamepad: None,
            last_poll: None,
            touch: None,
            warned: RefCell::new(HashSet::new()),
        }
    }

    /// Creates a manager reading platform gamepads through gilrs
    pub fn with_platform_gamepads(config: InputConfig) -> Self {
        Self::new(config, Box::new(GilrsGamepads::new()))
    }

    /// Attaches on-screen touch controls as the last-resort movement source
    pub fn with_touch(mut self, touch: impl TouchSource + 'static) -> Self {
        self.touch = Some(Box::new(touch));
        self
    }

    /// Installs the binding set for a named context
    ///
    /// Existing bindings and keyboard/gamepad edge state are discarded. An
    /// unknown context leaves the manager without bindings.
    pub fn init(&mut self, context: &str) {
        match context.parse::<InputContextKind>() {
            Ok(kind) => self.init_context(kind),
            Err(unknown) => {
                warn!(context = %unknown.0, "Unknown input context, no bindings installed");
                self.reset_bindings();
            }
        }
    }

    /// Installs the binding set for a context
    pub fn init_context(&mut self, kind: InputContextKind) {
        self.reset_bindings();
        self.bindings = BindingSet::for_context(kind);
        self.context = Some(kind);
        info!(context = %kind, bindings = self.bindings.len(), "Input context installed");
    }

    fn reset_bindings(&mut self) {
        self.bindings = BindingSet::default();
        self.context = None;
        self.keyboard.clear();
        self.previous_gamepad = self.gamepad.clone();
        self.warned.borrow_mut().clear();
    }

    /// Active context, if any
    pub fn context(&self) -> Option<InputContextKind> {
        self.context
    }

    /// Forward a winit window event to the keyboard collector
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.keyboard.handle_window_event(event);
    }

    /// Record a key press or release
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        self.keyboard.handle_key(key, pressed);
    }

    /// Start-of-frame gamepad bookkeeping
    ///
    /// Applies connect/disconnect events, rescans the device list on the poll
    /// interval (some platforms under-report connections), and refreshes the
    /// active gamepad's snapshot.
    pub fn update(&mut self, now: Duration) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        for event in backend.drain_events() {
            match event {
                GamepadEvent::Connected(id) => {
                    info!(id, "Gamepad connected");
                    if self.active_gamepad.is_none() {
                        self.active_gamepad = Some(id);
                    }
                }
                GamepadEvent::Disconnected(id) => {
                    info!(id, "Gamepad disconnected");
                    if self.active_gamepad == Some(id) {
                        self.clear_gamepad();
                    }
                }
            }
        }

        let poll_due = self
            .last_poll
            .is_none_or(|last| now.saturating_sub(last) >= self.config.gamepad_poll_interval());
        if poll_due {
            self.last_poll = Some(now);
            self.scan_gamepads();
        }

        self.gamepad = match (self.active_gamepad, self.backend.as_ref()) {
            (Some(id), Some(backend)) => backend.snapshot(id),
            _ => None,
        };
        if self.active_gamepad.is_some() && self.gamepad.is_none() {
            debug!("Active gamepad vanished without an event");
            self.clear_gamepad();
        }
    }

    fn scan_gamepads(&mut self) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let connected = backend.connected();

        match (self.active_gamepad, connected.first()) {
            (Some(_), None) => {
                debug!("Device list empty, dropping gamepad state");
                self.clear_gamepad();
            }
            (Some(id), Some(_)) if connected.contains(&id) => {}
            (_, Some(&first)) => {
                info!(id = first, "Gamepad discovered by polling");
                self.active_gamepad = Some(first);
                self.previous_gamepad = None;
            }
            (None, None) => {}
        }
    }

    fn clear_gamepad(&mut self) {
        self.active_gamepad = None;
        self.gamepad = None;
        self.previous_gamepad = None;
    }

    /// Stores the current gamepad snapshot as the previous frame's
    pub fn update_gamepad_states(&mut self) {
        self.previous_gamepad = self.gamepad.clone();
    }

    /// End-of-frame bookkeeping for every source
    pub fn end_frame(&mut self) {
        self.keyboard.advance_frame();
        self.update_gamepad_states();
    }

    fn binding(&self, name: &str) -> Option<Binding> {
        let binding = self.bindings.get(name).copied();
        if binding.is_none() && self.warned.borrow_mut().insert(name.to_string()) {
            warn!(
                name,
                context = self.context.map(InputContextKind::as_str),
                "No binding for input"
            );
        }
        binding
    }

    fn gamepad_active(&self, pad: Option<&GamepadState>, binding: &Binding) -> bool {
        pad.is_some_and(|pad| binding.gamepad.is_active(pad, self.config.axis_threshold))
    }

    /// Whether the action is held on any source
    pub fn is_key_down(&self, name: &str) -> bool {
        let Some(binding) = self.binding(name) else {
            return false;
        };
        self.keyboard.key(binding.key).is_down()
            || self.gamepad_active(self.gamepad.as_ref(), &binding)
    }

    /// Whether the action went from released to pressed this frame
    pub fn is_key_just_down(&self, name: &str) -> bool {
        let Some(binding) = self.binding(name) else {
            return false;
        };
        self.keyboard.key(binding.key).is_just_pressed()
            || (self.gamepad_active(self.gamepad.as_ref(), &binding)
                && !self.gamepad_active(self.previous_gamepad.as_ref(), &binding))
    }

    /// Whether the action went from pressed to released this frame
    pub fn is_key_just_up(&self, name: &str) -> bool {
        let Some(binding) = self.binding(name) else {
            return false;
        };
        self.keyboard.key(binding.key).is_just_released()
            || (self.gamepad_active(self.previous_gamepad.as_ref(), &binding)
                && !self.gamepad_active(self.gamepad.as_ref(), &binding))
    }

    /// Movement direction in [-1, 1] x [-1, 1], screen space (up is -Y)
    ///
    /// Gamepad stick beats keyboard, keyboard beats the touch d-pad.
    pub fn get_movement_input(&self) -> Vec2 {
        if let Some(stick) = self.stick_movement() {
            return stick;
        }

        let keyboard = self.keyboard_movement();
        if keyboard != Vec2::ZERO {
            return keyboard;
        }

        self.touch
            .as_ref()
            .map(|touch| touch.dpad().vector())
            .unwrap_or(Vec2::ZERO)
    }

    fn stick_movement(&self) -> Option<Vec2> {
        let pad = self.gamepad.as_ref()?;
        let stick = Vec2::new(pad.axis(0), pad.axis(1));
        (stick.length() > self.config.stick_deadzone).then(|| stick.clamp_length_max(1.0))
    }

    fn keyboard_movement(&self) -> Vec2 {
        let held = |name: &str| {
            self.bindings
                .get(name)
                .is_some_and(|binding| self.keyboard.key(binding.key).is_down())
        };
        digital_vector(held("up"), held("down"), held("left"), held("right"))
    }

    /// Whether a gamepad is currently in use
    pub fn has_gamepad(&self) -> bool {
        self.gamepad.is_some()
    }

    pub fn active_gamepad_id(&self) -> Option<usize> {
        self.active_gamepad
    }

    /// Releases bindings, listeners and the gamepad backend; stops polling
    pub fn cleanup(&mut self) {
        if self.backend.is_none() && self.context.is_none() && self.touch.is_none() {
            return;
        }
        self.reset_bindings();
        self.clear_gamepad();
        self.backend = None;
        self.touch = None;
        self.last_poll = None;
        debug!("Input manager cleaned up");
    }

    pub fn destroy(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::VirtualGamepads;

    fn manager() -> (InputManager, VirtualGamepads) {
        let pads = VirtualGamepads::new();
        let mut input = InputManager::new(InputConfig::default(), Box::new(pads.clone()));
        input.init("world");
        (input, pads)
    }

    #[test]
    fn test_unknown_context_installs_nothing() {
        let (mut input, _) = manager();
        input.init("dungeon");
        input.handle_key(KeyCode::W, true);

        assert_eq!(input.context(), None);
        assert!(!input.is_key_down("up"));
        assert_eq!(input.get_movement_input(), Vec2::ZERO);
    }

    #[test]
    fn test_unknown_name_reads_false() {
        let (input, _) = manager();
        assert!(!input.is_key_down("fly"));
        assert!(!input.is_key_just_down("fly"));
    }

    #[test]
    fn test_switching_context_drops_held_keys() {
        let (mut input, _) = manager();
        input.handle_key(KeyCode::Escape, true);
        assert!(input.is_key_down("menu"));

        input.init("battle");
        assert!(!input.is_key_down("cancel"));
    }

    #[test]
    fn test_stick_within_deadzone_falls_back_to_keyboard() {
        let (mut input, pads) = manager();
        pads.connect(0);
        pads.set_left_stick(0, 0.1, 0.05);
        input.update(Duration::ZERO);
        input.handle_key(KeyCode::A, true);

        assert_eq!(input.get_movement_input(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_stick_magnitude_clamped_not_normalized() {
        let (mut input, pads) = manager();
        pads.connect(0);

        pads.set_left_stick(0, 0.4, 0.0);
        input.update(Duration::ZERO);
        assert_eq!(input.get_movement_input(), Vec2::new(0.4, 0.0));

        pads.set_left_stick(0, 1.0, 1.0);
        input.update(Duration::from_millis(16));
        let movement = input.get_movement_input();
        assert!((movement.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (mut input, pads) = manager();
        pads.connect(0);
        input.update(Duration::ZERO);
        assert!(input.has_gamepad());

        input.cleanup();
        input.cleanup();
        input.update(Duration::from_millis(500));

        assert!(!input.has_gamepad());
        assert_eq!(input.context(), None);
    }
}
