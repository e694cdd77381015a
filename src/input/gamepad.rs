//! Gamepad backends
//!
//! The manager only talks to [`GamepadBackend`]. Two implementations exist:
//! [`GilrsGamepads`] for platform devices and [`VirtualGamepads`] for
//! scripted devices (headless hosts, touch overlays, tests).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, warn};

use super::state::{ButtonSample, GamepadState};

/// Connection change reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadEvent {
    Connected(usize),
    Disconnected(usize),
}

/// Source of gamepad devices and their per-frame state
pub trait GamepadBackend {
    /// Name of this backend for diagnostics
    fn name(&self) -> &'static str;

    /// False when the platform offers no gamepad support at all
    fn is_available(&self) -> bool;

    /// Connection events since the last call
    fn drain_events(&mut self) -> Vec<GamepadEvent>;

    /// Ids of all currently connected devices
    fn connected(&self) -> Vec<usize>;

    /// Current state of one device, `None` if it is gone
    fn snapshot(&self, id: usize) -> Option<GamepadState>;
}

/// Standard-layout button order (index = position in this table)
const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Platform gamepads through gilrs
pub struct GilrsGamepads {
    /// None if initialization failed
    gilrs: Option<Gilrs>,
}

impl GilrsGamepads {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(e) => {
                warn!(error = %e, "Gamepad support unavailable, continuing without gamepads");
                None
            }
        };
        Self { gilrs }
    }

    fn read(gamepad: gilrs::Gamepad<'_>, id: usize) -> GamepadState {
        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|&button| {
                let pressed = gamepad.is_pressed(button);
                let value = gamepad
                    .button_data(button)
                    .map(|data| data.value())
                    .unwrap_or(if pressed { 1.0 } else { 0.0 });
                ButtonSample { pressed, value }
            })
            .collect();

        // gilrs reports Y up as positive; the standard layout has up negative
        let axes = vec![
            gamepad.value(Axis::LeftStickX),
            -gamepad.value(Axis::LeftStickY),
            gamepad.value(Axis::RightStickX),
            -gamepad.value(Axis::RightStickY),
        ];

        GamepadState { id, buttons, axes }
    }
}

impl Default for GilrsGamepads {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadBackend for GilrsGamepads {
    fn name(&self) -> &'static str {
        "gilrs"
    }

    fn is_available(&self) -> bool {
        self.gilrs.is_some()
    }

    fn drain_events(&mut self) -> Vec<GamepadEvent> {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return Vec::new();
        };

        // Pumping events also refreshes the cached button/axis state
        let mut events = Vec::new();
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected => events.push(GamepadEvent::Connected(event.id.into())),
                EventType::Disconnected => {
                    events.push(GamepadEvent::Disconnected(event.id.into()))
                }
                _ => {}
            }
        }
        events
    }

    fn connected(&self) -> Vec<usize> {
        self.gilrs
            .as_ref()
            .map(|gilrs| gilrs.gamepads().map(|(id, _)| id.into()).collect())
            .unwrap_or_default()
    }

    fn snapshot(&self, id: usize) -> Option<GamepadState> {
        let gilrs = self.gilrs.as_ref()?;
        let (_, gamepad) = gilrs
            .gamepads()
            .find(|(gamepad_id, _)| usize::from(*gamepad_id) == id)?;
        Some(Self::read(gamepad, id))
    }
}

#[derive(Debug, Default)]
struct VirtualPads {
    available: bool,
    pads: BTreeMap<usize, GamepadState>,
    events: Vec<GamepadEvent>,
}

/// Scripted gamepads
///
/// Clones share the same devices, so a host keeps one handle to drive state
/// while the manager owns another.
#[derive(Debug, Clone)]
pub struct VirtualGamepads {
    inner: Rc<RefCell<VirtualPads>>,
}

impl VirtualGamepads {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VirtualPads {
                available: true,
                ..Default::default()
            })),
        }
    }

    /// A backend that behaves like a platform without gamepad support
    pub fn unavailable() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VirtualPads::default())),
        }
    }

    /// Plugs in a device and reports a connect event
    pub fn connect(&self, id: usize) {
        let mut inner = self.inner.borrow_mut();
        if !inner.available {
            return;
        }
        inner.pads.insert(id, Self::blank(id));
        inner.events.push(GamepadEvent::Connected(id));
    }

    /// Plugs in a device without an event, like platforms that under-report
    pub fn connect_silently(&self, id: usize) {
        let mut inner = self.inner.borrow_mut();
        if inner.available {
            inner.pads.insert(id, Self::blank(id));
        }
    }

    pub fn disconnect(&self, id: usize) {
        let mut inner = self.inner.borrow_mut();
        if inner.pads.remove(&id).is_some() {
            inner.events.push(GamepadEvent::Disconnected(id));
        }
    }

    /// Removes a device without an event
    pub fn disconnect_silently(&self, id: usize) {
        self.inner.borrow_mut().pads.remove(&id);
    }

    pub fn set_button(&self, id: usize, index: usize, pressed: bool) {
        if let Some(pad) = self.inner.borrow_mut().pads.get_mut(&id)
            && let Some(button) = pad.buttons.get_mut(index)
        {
            *button = ButtonSample::digital(pressed);
        }
    }

    /// Sets the left stick (standard layout: Y negative is up)
    pub fn set_left_stick(&self, id: usize, x: f32, y: f32) {
        if let Some(pad) = self.inner.borrow_mut().pads.get_mut(&id) {
            pad.axes[0] = x;
            pad.axes[1] = y;
        }
    }

    fn blank(id: usize) -> GamepadState {
        GamepadState {
            id,
            buttons: vec![ButtonSample::default(); STANDARD_BUTTONS.len()],
            axes: vec![0.0; 4],
        }
    }
}

impl Default for VirtualGamepads {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadBackend for VirtualGamepads {
    fn name(&self) -> &'static str {
        "virtual"
    }

    fn is_available(&self) -> bool {
        self.inner.borrow().available
    }

    fn drain_events(&mut self) -> Vec<GamepadEvent> {
        let events = std::mem::take(&mut self.inner.borrow_mut().events);
        if !events.is_empty() {
            debug!(count = events.len(), "Virtual gamepad events drained");
        }
        events
    }

    fn connected(&self) -> Vec<usize> {
        self.inner.borrow().pads.keys().copied().collect()
    }

    fn snapshot(&self, id: usize) -> Option<GamepadState> {
        self.inner.borrow().pads.get(&id).cloned()
    }
}
