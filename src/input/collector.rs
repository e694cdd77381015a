//! Raw keyboard collection from winit events

use super::events::KeyCode;
use super::state::{ButtonState, KeyboardState};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Collects raw keyboard input from winit events and maintains KeyboardState
#[derive(Debug, Default)]
pub struct KeyboardCollector {
    state: KeyboardState,
}

impl KeyboardCollector {
    /// Creates a new keyboard collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // OS auto-repeat must not look like fresh presses
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(code.into(), event.state == ElementState::Pressed);
                }
            }

            // Keys released while unfocused never reach us
            WindowEvent::Focused(false) => self.state.release_all(),

            _ => {}
        }
    }

    /// Record a press or release of a key
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if key == KeyCode::Other {
            return;
        }
        if pressed {
            self.state.press(key);
        } else {
            self.state.release(key);
        }
    }

    pub fn key(&self, key: KeyCode) -> ButtonState {
        self.state.key(key)
    }

    /// Advance to next frame (transitions edge states to steady states)
    pub fn advance_frame(&mut self) {
        self.state.advance_frame();
    }

    /// Forget every key (context switch or teardown)
    pub fn clear(&mut self) {
        self.state.clear();
    }
}
