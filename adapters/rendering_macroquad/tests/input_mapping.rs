use std::time::Duration;

use cyberdoom_rendering_macroquad::{map_input, DeviceState, DEFAULT_MOUSE_SENSITIVITY};

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn idle_devices_produce_neutral_input() {
    let input = map_input(&DeviceState::default(), FRAME, DEFAULT_MOUSE_SENSITIVITY);

    assert_eq!(input, Default::default());
}

#[test]
fn movement_keys_map_to_axes() {
    let state = DeviceState {
        forward: true,
        strafe_left: true,
        run: true,
        ..DeviceState::default()
    };

    let input = map_input(&state, FRAME, DEFAULT_MOUSE_SENSITIVITY);

    assert_eq!(input.controls.forward, 1.0);
    assert_eq!(input.controls.strafe, -1.0);
    assert!(input.controls.run);
    assert!(!input.controls.shoot);
}

#[test]
fn arrow_keys_turn_at_a_fixed_rate() {
    let state = DeviceState {
        turn_left: true,
        ..DeviceState::default()
    };

    let input = map_input(&state, FRAME, DEFAULT_MOUSE_SENSITIVITY);

    assert!((input.controls.turn + 2.4).abs() < 1e-6);
}

#[test]
fn mouse_motion_is_scaled_by_sensitivity_and_frame_time() {
    let state = DeviceState {
        mouse_dx: 10.0,
        ..DeviceState::default()
    };

    let input = map_input(&state, Duration::from_millis(100), 1.0);

    assert!((input.controls.turn - 0.22).abs() < 1e-5);
}

#[test]
fn mouse_turn_rate_is_bounded() {
    let state = DeviceState {
        mouse_dx: -4_000.0,
        ..DeviceState::default()
    };

    let input = map_input(&state, Duration::ZERO, DEFAULT_MOUSE_SENSITIVITY);

    assert!((input.controls.turn + 12.0).abs() < 1e-6);
}

#[test]
fn actions_and_toggles_are_forwarded() {
    let state = DeviceState {
        attack: true,
        interact: true,
        minimap: true,
        pause_pressed: true,
        quit_pressed: true,
        ..DeviceState::default()
    };

    let input = map_input(&state, FRAME, DEFAULT_MOUSE_SENSITIVITY);

    assert!(input.controls.shoot);
    assert!(input.controls.interact);
    assert!(input.show_minimap);
    assert!(input.pause_toggled);
    assert!(input.quit);
}
