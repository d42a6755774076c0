//! Keyboard and mouse mapping onto the device-agnostic frame input.

use std::time::Duration;

use cyberdoom_core::InputVector;
use cyberdoom_rendering::FrameInput;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};

/// Mouse sensitivity used when none is configured.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 1.6;

/// Turn rate produced by the arrow keys, in radians per second.
const KEY_TURN_RATE: f32 = 2.4;
/// Radians turned per pixel of horizontal mouse motion at unit sensitivity.
const MOUSE_TURN_PER_PIXEL: f32 = 0.0022;
/// Bound on the turn rate contributed by the mouse.
const MAX_MOUSE_TURN_RATE: f32 = 12.0;
/// Smallest frame delta used when converting mouse motion into a rate.
const MIN_FRAME_SECONDS: f32 = 0.001;

/// Raw device observations for one frame.
///
/// Movement and action keys are level-triggered; pause and quit are
/// edge-triggered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceState {
    /// `W` held.
    pub forward: bool,
    /// `S` held.
    pub backward: bool,
    /// `A` held.
    pub strafe_left: bool,
    /// `D` held.
    pub strafe_right: bool,
    /// Left arrow held.
    pub turn_left: bool,
    /// Right arrow held.
    pub turn_right: bool,
    /// Either shift key held.
    pub run: bool,
    /// Space or the left mouse button held.
    pub attack: bool,
    /// `E` held.
    pub interact: bool,
    /// `Tab` held.
    pub minimap: bool,
    /// `Escape` pressed this frame.
    pub pause_pressed: bool,
    /// `Q` pressed this frame.
    pub quit_pressed: bool,
    /// Horizontal mouse motion since the previous frame, in pixels.
    pub mouse_dx: f32,
}

impl DeviceState {
    /// Samples macroquad's input state. `mouse_dx` is left at zero.
    pub(crate) fn poll() -> Self {
        Self {
            forward: is_key_down(KeyCode::W),
            backward: is_key_down(KeyCode::S),
            strafe_left: is_key_down(KeyCode::A),
            strafe_right: is_key_down(KeyCode::D),
            turn_left: is_key_down(KeyCode::Left),
            turn_right: is_key_down(KeyCode::Right),
            run: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            attack: is_key_down(KeyCode::Space) || is_mouse_button_down(MouseButton::Left),
            interact: is_key_down(KeyCode::E),
            minimap: is_key_down(KeyCode::Tab),
            pause_pressed: is_key_pressed(KeyCode::Escape),
            quit_pressed: is_key_pressed(KeyCode::Q),
            mouse_dx: 0.0,
        }
    }
}

/// Tracks the cursor between frames to derive horizontal motion.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MouseTracker {
    last_x: Option<f32>,
}

impl MouseTracker {
    pub(crate) fn delta(&mut self) -> f32 {
        let (x, _) = mouse_position();
        let delta = self.last_x.map_or(0.0, |last| x - last);
        self.last_x = Some(x);
        delta
    }
}

/// Converts device observations into the frame input.
#[must_use]
pub fn map_input(state: &DeviceState, dt: Duration, sensitivity: f32) -> FrameInput {
    let forward = axis(state.forward, state.backward);
    let strafe = axis(state.strafe_right, state.strafe_left);
    let keys = axis(state.turn_right, state.turn_left) * KEY_TURN_RATE;

    let seconds = dt.as_secs_f32().max(MIN_FRAME_SECONDS);
    let mouse = (state.mouse_dx * MOUSE_TURN_PER_PIXEL * sensitivity / seconds)
        .clamp(-MAX_MOUSE_TURN_RATE, MAX_MOUSE_TURN_RATE);

    FrameInput {
        controls: InputVector {
            forward,
            strafe,
            turn: keys + mouse,
            run: state.run,
            shoot: state.attack,
            interact: state.interact,
        },
        show_minimap: state.minimap,
        pause_toggled: state.pause_pressed,
        quit: state.quit_pressed,
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}
