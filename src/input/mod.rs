//! Input handling system
//!
//! Unifies keyboard, gamepad and touch controls behind named logical inputs:
//! - Collects raw keyboard input from winit events
//! - Polls gamepads through a pluggable backend (gilrs or virtual)
//! - Reads an injected touch source for d-pad movement
//! - Resolves action names through per-context binding tables
//!
//! # Architecture
//!
//! ```text
//! winit events ──→ KeyboardCollector ─┐
//! GamepadBackend ─→ GamepadState ─────┼─→ InputManager ─→ is_key_down / get_movement_input
//! TouchSource ─→ Dpad ────────────────┘        ↑
//!                                         BindingSet (world | battle | map)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut input = InputManager::with_platform_gamepads(config.input.clone());
//! input.init("world");
//!
//! // In window_event()
//! input.handle_window_event(&event);
//!
//! // Each frame
//! input.update(now);
//! let movement = input.get_movement_input();
//! input.end_frame();
//! ```

mod bindings;
mod collector;
mod events;
mod gamepad;
mod manager;
mod state;
mod touch;

// Re-export public API
pub use bindings::{
    AxisDirection, Binding, BindingSet, GamepadControl, InputContextKind, MOVEMENT_ACTIONS,
    StickAxis, UnknownContext,
};
pub use collector::KeyboardCollector;
pub use events::KeyCode;
pub use gamepad::{GamepadBackend, GamepadEvent, GilrsGamepads, VirtualGamepads};
pub use manager::InputManager;
pub use state::{ButtonSample, ButtonState, GamepadState, KeyboardState};
pub use touch::{Dpad, ShiftSignal, TouchControls, TouchSource, digital_vector};
