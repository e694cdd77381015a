//! Touch-UI input source
//!
//! On-screen controls provide a d-pad and a "shift" button. The d-pad is read
//! by the input manager as a last-resort movement source; shift signals are
//! consumed by the dash controller exactly like a key down/up pair.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;

/// Press (`active: true`) or release of the on-screen shift button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSignal {
    pub active: bool,
}

/// Held directions on the on-screen d-pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dpad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Dpad {
    /// Unit-length movement vector (screen space, up is negative Y)
    pub fn vector(self) -> Vec2 {
        digital_vector(self.up, self.down, self.left, self.right)
    }
}

/// Direction from four digital inputs; diagonals are scaled to unit length
pub fn digital_vector(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let axis = |negative: bool, positive: bool| f32::from(positive as u8) - f32::from(negative as u8);
    let x = axis(left, right);
    let y = axis(up, down);

    if x != 0.0 && y != 0.0 {
        Vec2::new(x, y) / std::f32::consts::SQRT_2
    } else {
        Vec2::new(x, y)
    }
}

/// Injected touch-control source
pub trait TouchSource {
    /// Current d-pad state
    fn dpad(&self) -> Dpad;

    /// Shift signals received since the last call, oldest first
    fn drain_shift_signals(&self) -> Vec<ShiftSignal>;
}

#[derive(Debug, Default)]
struct TouchState {
    dpad: Dpad,
    shift_held: bool,
    signals: VecDeque<ShiftSignal>,
}

/// Shared handle to on-screen controls
///
/// The UI layer writes through one clone while the input manager and dash
/// controller read through others.
#[derive(Debug, Clone, Default)]
pub struct TouchControls {
    state: Rc<RefCell<TouchState>>,
}

impl TouchControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dpad(&self, dpad: Dpad) {
        self.state.borrow_mut().dpad = dpad;
    }

    /// Emits a shift signal; repeated signals with the same value are dropped
    pub fn set_shift(&self, active: bool) {
        let mut state = self.state.borrow_mut();
        if state.shift_held == active {
            return;
        }
        state.shift_held = active;
        state.signals.push_back(ShiftSignal { active });
    }

    pub fn is_shift_held(&self) -> bool {
        self.state.borrow().shift_held
    }
}

impl TouchSource for TouchControls {
    fn dpad(&self) -> Dpad {
        self.state.borrow().dpad
    }

    fn drain_shift_signals(&self) -> Vec<ShiftSignal> {
        self.state.borrow_mut().signals.drain(..).collect()
    }
}
