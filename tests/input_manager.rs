//! Integration tests for the unified input manager

use std::time::Duration;

use glam::Vec2;
use skydash::config::InputConfig;
use skydash::input::{Dpad, InputContextKind, InputManager, KeyCode, TouchControls, VirtualGamepads};

const EPSILON: f32 = 1e-6;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn manager(context: &str) -> (InputManager, VirtualGamepads) {
    let pads = VirtualGamepads::new();
    let mut input = InputManager::new(InputConfig::default(), Box::new(pads.clone()));
    input.init(context);
    (input, pads)
}

fn assert_vec_eq(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_keyboard_diagonal_is_normalized() {
    let (mut input, _) = manager("world");
    input.handle_key(KeyCode::W, true);
    input.handle_key(KeyCode::D, true);

    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert_vec_eq(input.get_movement_input(), Vec2::new(half, -half));
}

#[test]
fn test_gamepad_stick_overrides_keyboard() {
    let (mut input, pads) = manager("world");
    pads.connect(0);
    pads.set_left_stick(0, -0.5, 0.0);
    input.update(ms(0));
    input.handle_key(KeyCode::D, true);

    assert!(input.has_gamepad());
    assert_vec_eq(input.get_movement_input(), Vec2::new(-0.5, 0.0));
}

#[test]
fn test_touch_dpad_is_last_resort() {
    let touch = TouchControls::new();
    let pads = VirtualGamepads::new();
    let mut input =
        InputManager::new(InputConfig::default(), Box::new(pads.clone())).with_touch(touch.clone());
    input.init("world");

    touch.set_dpad(Dpad {
        down: true,
        ..Dpad::default()
    });
    assert_vec_eq(input.get_movement_input(), Vec2::new(0.0, 1.0));

    input.handle_key(KeyCode::A, true);
    assert_vec_eq(input.get_movement_input(), Vec2::new(-1.0, 0.0));
}

#[test]
fn test_no_sources_means_no_movement() {
    let (input, _) = manager("world");
    assert_eq!(input.get_movement_input(), Vec2::ZERO);
}

#[test]
fn test_keyboard_edges_last_one_frame() {
    let (mut input, _) = manager("world");

    input.handle_key(KeyCode::Shift, true);
    assert!(input.is_key_down("dash"));
    assert!(input.is_key_just_down("dash"));
    input.end_frame();

    assert!(input.is_key_down("dash"));
    assert!(!input.is_key_just_down("dash"));

    input.handle_key(KeyCode::Shift, false);
    assert!(!input.is_key_down("dash"));
    assert!(input.is_key_just_up("dash"));
    input.end_frame();

    assert!(!input.is_key_just_up("dash"));
}

#[test]
fn test_gamepad_button_edges_follow_frames() {
    let (mut input, pads) = manager("world");
    pads.connect(0);
    input.update(ms(0));
    input.end_frame();

    pads.set_button(0, 5, true);
    input.update(ms(16));
    assert!(input.is_key_down("dash"));
    assert!(input.is_key_just_down("dash"));
    input.end_frame();

    input.update(ms(32));
    assert!(input.is_key_down("dash"));
    assert!(!input.is_key_just_down("dash"));
    input.end_frame();

    pads.set_button(0, 5, false);
    input.update(ms(48));
    assert!(input.is_key_just_up("dash"));
    assert!(!input.is_key_down("dash"));
}

#[test]
fn test_gamepad_edges_stay_stale_without_frame_end() {
    let (mut input, pads) = manager("world");
    pads.connect(0);
    input.update(ms(0));
    input.end_frame();

    pads.set_button(0, 0, true);
    input.update(ms(16));
    assert!(input.is_key_just_down("interact"));

    // Previous snapshot never advanced
    input.update(ms(32));
    assert!(input.is_key_just_down("interact"));

    input.update_gamepad_states();
    assert!(!input.is_key_just_down("interact"));
}

#[test]
fn test_axis_binding_uses_threshold() {
    let (mut input, pads) = manager("world");
    pads.connect(0);

    pads.set_left_stick(0, 0.0, -0.2);
    input.update(ms(0));
    assert!(!input.is_key_down("up"));

    pads.set_left_stick(0, 0.0, -0.6);
    input.update(ms(16));
    assert!(input.is_key_down("up"));
    assert!(!input.is_key_down("down"));
}

#[test]
fn test_polling_discovers_silent_connection() {
    let (mut input, pads) = manager("world");
    input.update(ms(0));

    pads.connect_silently(2);
    input.update(ms(50));
    assert!(!input.has_gamepad());

    input.update(ms(100));
    assert!(input.has_gamepad());
    assert_eq!(input.active_gamepad_id(), Some(2));
}

#[test]
fn test_empty_device_list_clears_gamepad() {
    let (mut input, pads) = manager("world");
    pads.connect(0);
    pads.set_button(0, 5, true);
    input.update(ms(0));
    input.end_frame();
    assert!(input.is_key_down("dash"));

    pads.disconnect_silently(0);
    input.update(ms(100));

    assert!(!input.has_gamepad());
    assert!(!input.is_key_down("dash"));
    assert!(!input.is_key_just_up("dash"));
}

#[test]
fn test_disconnect_event_drops_gamepad() {
    let (mut input, pads) = manager("world");
    pads.connect(1);
    input.update(ms(0));
    assert_eq!(input.active_gamepad_id(), Some(1));

    pads.disconnect(1);
    input.update(ms(16));
    assert_eq!(input.active_gamepad_id(), None);
    assert!(!input.has_gamepad());
}

#[test]
fn test_unavailable_backend_degrades_to_keyboard() {
    let pads = VirtualGamepads::unavailable();
    let mut input = InputManager::new(InputConfig::default(), Box::new(pads.clone()));
    input.init("world");

    pads.connect(0);
    input.update(ms(0));
    input.update(ms(200));
    assert!(!input.has_gamepad());

    input.handle_key(KeyCode::D, true);
    assert_vec_eq(input.get_movement_input(), Vec2::new(1.0, 0.0));
}

#[test]
fn test_context_switch_changes_bindings() {
    let (mut input, _) = manager("world");
    assert_eq!(input.context(), Some(InputContextKind::World));

    input.init_context(InputContextKind::Battle);
    input.handle_key(KeyCode::J, true);
    assert!(input.is_key_down("attack"));
    assert!(!input.is_key_down("dash"));

    input.init("map");
    assert_eq!(input.context(), Some(InputContextKind::Map));
    input.handle_key(KeyCode::M, true);
    assert!(input.is_key_down("close"));
    assert!(!input.is_key_down("attack"));
}

#[test]
fn test_movement_works_in_every_context() {
    for kind in InputContextKind::ALL {
        let (mut input, _) = manager(kind.as_str());
        input.handle_key(KeyCode::S, true);
        assert_vec_eq(input.get_movement_input(), Vec2::new(0.0, 1.0));
    }
}
