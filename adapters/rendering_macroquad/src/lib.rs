#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Cyberdoom.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature. Consumers that want sound can enable `macroquad/audio` in their
//! own manifest.
//!
//! The backend owns the window and the event loop. Each frame it samples the
//! keyboard and mouse, maps them onto a [`FrameInput`] and hands the caller a
//! [`RasterSurface`] that forwards draw calls to macroquad's shape API.

mod input;

pub use input::{map_input, DeviceState, DEFAULT_MOUSE_SENSITIVITY};

use anyhow::Result;
use cyberdoom_rendering::{
    Color, FrameControl, FrameInput, Presentation, RasterSurface, RenderingBackend,
};
use glam::Vec2;
use macroquad::color::BLACK;
use std::time::Duration;

use self::input::MouseTracker;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    mouse_sensitivity: f32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or present frames as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Scales how strongly horizontal mouse motion turns the player.
    #[must_use]
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity.max(0.0);
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average frame rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

/// Surface that forwards draw calls to macroquad's immediate-mode shapes.
struct MacroquadSurface {
    width: u32,
    height: u32,
}

impl MacroquadSurface {
    fn current() -> Self {
        Self {
            width: macroquad::window::screen_width().max(0.0) as u32,
            height: macroquad::window::screen_height().max(0.0) as u32,
        }
    }
}

impl RasterSurface for MacroquadSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, 1.0, to_macroquad_color(color));
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let _ = macroquad::text::draw_text(
            text,
            position.x,
            position.y,
            size,
            to_macroquad_color(color),
        );
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn RasterSurface) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            mouse_sensitivity,
        } = self;

        let Presentation {
            window_title,
            width,
            height,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).unwrap_or(i32::MAX),
            window_height: i32::try_from(height).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut fps_counter = FpsCounter::default();
            let mut mouse = MouseTracker::default();

            loop {
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let mut devices = DeviceState::poll();
                devices.mouse_dx = mouse.delta();
                let frame_input = map_input(&devices, frame_dt, mouse_sensitivity);

                macroquad::window::clear_background(BLACK);
                let mut surface = MacroquadSurface::current();
                let control = frame(frame_dt, frame_input, &mut surface);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                if control == FrameControl::Exit {
                    log::debug!("frame callback requested exit");
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_channels_are_forwarded() {
        let color = to_macroquad_color(Color::from_rgba_u8(255, 92, 122, 0.9));

        assert!((color.r - 1.0).abs() < f32::EPSILON);
        assert!((color.g - 92.0 / 255.0).abs() < 1e-6);
        assert!((color.a - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn vsync_maps_onto_swap_interval() {
        assert_eq!(MacroquadBackend::new().swap_interval, None);
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
    }

    #[test]
    fn negative_sensitivity_is_clamped() {
        let backend = MacroquadBackend::new().with_mouse_sensitivity(-2.0);

        assert_eq!(backend.mouse_sensitivity, 0.0);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());

        let per_second = counter
            .record_frame(frame)
            .expect("should report FPS after one second of samples");
        assert!((per_second - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame).is_none());
    }
}
