//! Raw input state

use std::collections::HashMap;

use super::events::KeyCode;

/// Button press state with edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Released,
    /// Pressed this frame (edge)
    JustPressed,
    /// Held down (multiple frames)
    Pressed,
    /// Released this frame (edge)
    JustReleased,
    /// Pressed and released within this frame; carries both edges
    Tapped,
}

impl ButtonState {
    /// Advance state for next frame (transitions edges to steady states)
    pub fn advance(self) -> Self {
        match self {
            Self::JustPressed => Self::Pressed,
            Self::JustReleased | Self::Tapped => Self::Released,
            state => state,
        }
    }

    /// State after a press notification arrives
    pub fn press(self) -> Self {
        if self.is_down() { self } else { Self::JustPressed }
    }

    /// State after a release notification arrives
    pub fn release(self) -> Self {
        match self {
            Self::JustPressed => Self::Tapped,
            Self::Pressed => Self::JustReleased,
            state => state,
        }
    }

    /// Returns true if button is currently down (just pressed or held)
    pub fn is_down(self) -> bool {
        matches!(self, Self::JustPressed | Self::Pressed)
    }

    /// Returns true if button was just pressed this frame
    pub fn is_just_pressed(self) -> bool {
        matches!(self, Self::JustPressed | Self::Tapped)
    }

    /// Returns true if button was just released this frame
    pub fn is_just_released(self) -> bool {
        matches!(self, Self::JustReleased | Self::Tapped)
    }
}

/// Keyboard input state
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys: HashMap<KeyCode, ButtonState>,
}

impl KeyboardState {
    pub fn key(&self, key: KeyCode) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn press(&mut self, key: KeyCode) {
        let state = self.keys.entry(key).or_default();
        *state = state.press();
    }

    pub fn release(&mut self, key: KeyCode) {
        let state = self.keys.entry(key).or_default();
        *state = state.release();
    }

    /// Releases every held key (window lost focus)
    pub fn release_all(&mut self) {
        for state in self.keys.values_mut() {
            *state = state.release();
        }
    }

    /// Advance all key states for next frame
    pub fn advance_frame(&mut self) {
        self.keys.retain(|_, state| {
            *state = state.advance();
            *state != ButtonState::Released
        });
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// One sampled gamepad button
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonSample {
    pub pressed: bool,
    /// Analog value in [0, 1]; digital buttons report 0 or 1
    pub value: f32,
}

impl ButtonSample {
    pub fn digital(pressed: bool) -> Self {
        Self {
            pressed,
            value: if pressed { 1.0 } else { 0.0 },
        }
    }
}

/// Snapshot of one gamepad for a single frame, in the standard layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadState {
    /// Backend-assigned device id
    pub id: usize,
    pub buttons: Vec<ButtonSample>,
    /// Left stick X/Y then right stick X/Y; Y is negative when pushed up
    pub axes: Vec<f32>,
}

impl GamepadState {
    /// Button sample at a standard-layout index; unknown indices read as released
    pub fn button(&self, index: usize) -> ButtonSample {
        self.buttons.get(index).copied().unwrap_or_default()
    }

    /// Axis value at an index; missing axes read as centered
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edge_lasts_one_frame() {
        let mut keyboard = KeyboardState::default();
        keyboard.press(KeyCode::W);
        assert!(keyboard.key(KeyCode::W).is_just_pressed());

        keyboard.advance_frame();
        assert_eq!(keyboard.key(KeyCode::W), ButtonState::Pressed);

        // OS key repeat must not re-trigger the edge
        keyboard.press(KeyCode::W);
        assert!(!keyboard.key(KeyCode::W).is_just_pressed());
    }

    #[test]
    fn test_release_all_produces_release_edges() {
        let mut keyboard = KeyboardState::default();
        keyboard.press(KeyCode::A);
        keyboard.advance_frame();
        keyboard.release_all();

        assert!(keyboard.key(KeyCode::A).is_just_released());
        keyboard.advance_frame();
        assert_eq!(keyboard.key(KeyCode::A), ButtonState::Released);
    }

    #[test]
    fn test_press_and_release_in_one_frame_keeps_both_edges() {
        let mut keyboard = KeyboardState::default();
        keyboard.press(KeyCode::Shift);
        keyboard.release(KeyCode::Shift);

        let state = keyboard.key(KeyCode::Shift);
        assert_eq!(state, ButtonState::Tapped);
        assert!(state.is_just_pressed());
        assert!(state.is_just_released());
        assert!(!state.is_down());

        keyboard.advance_frame();
        assert_eq!(keyboard.key(KeyCode::Shift), ButtonState::Released);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut keyboard = KeyboardState::default();
        keyboard.release(KeyCode::Shift);
        assert_eq!(keyboard.key(KeyCode::Shift), ButtonState::Released);
    }

    #[test]
    fn test_gamepad_out_of_range_reads_neutral() {
        let pad = GamepadState::default();
        assert!(!pad.button(15).pressed);
        assert_eq!(pad.axis(3), 0.0);
    }
}
