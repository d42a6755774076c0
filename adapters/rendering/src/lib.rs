#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Cyberdoom adapters.
//!
//! The [`Renderer`] turns a read-only [`Scene`] into draw calls against any
//! [`RasterSurface`]. Backends own the window and event loop and implement
//! [`RenderingBackend`]; [`Framebuffer`] is the in-memory surface used by
//! tests and headless runs.

use std::{f32::consts::PI, time::Duration};

use anyhow::Result as AnyResult;
use cyberdoom_core::{GridMap, InputVector, Sprite, WorldPoint, TILE_SIZE};
use glam::Vec2;
use thiserror::Error;

mod framebuffer;
mod minimap;
mod raycaster;

pub use framebuffer::Framebuffer;
pub use raycaster::Renderer;

/// Horizontal field of view in radians.
pub const FIELD_OF_VIEW: f32 = PI / 3.0;
/// Distance beyond which walls are not resolved.
pub const MAX_DEPTH: f32 = TILE_SIZE * 16.0;
/// Minimum fog factor applied to distant walls.
pub const FOG_FLOOR: f32 = 0.05;
/// Extra angle beyond the field of view within which billboards are still drawn.
pub const SPRITE_MARGIN: f32 = 0.25;
/// Minimap pixels per tile.
pub const MINIMAP_SCALE: f32 = 4.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 1.0)
    }

    /// Creates a color from byte RGB values and a floating point alpha.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha,
        }
    }

    /// Darkens the color channels by `factor`, leaving alpha untouched.
    #[must_use]
    pub fn shade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    /// Scales the alpha channel by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        Self {
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Output target exposing the drawing primitives the renderer needs.
///
/// Coordinates are in pixels with the origin at the top-left corner.
/// Implementations clip anything outside `width() x height()`.
pub trait RasterSurface {
    /// Output width in pixels.
    fn width(&self) -> u32;

    /// Output height in pixels.
    fn height(&self) -> u32;

    /// Fills an axis-aligned rectangle, blending by the color's alpha.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Draws a one pixel wide line segment.
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Sets a single pixel.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.fill_rect(x as f32, y as f32, 1.0, 1.0, color);
    }

    /// Draws a text label with its baseline starting at `position`.
    ///
    /// Surfaces without font support ignore text.
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let _ = (text, position, size, color);
    }

    /// Outlines an axis-aligned rectangle.
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (left, top) = (x, y);
        let (right, bottom) = (x + width, y + height);
        self.line(Vec2::new(left, top), Vec2::new(right, top), color);
        self.line(Vec2::new(right, top), Vec2::new(right, bottom), color);
        self.line(Vec2::new(right, bottom), Vec2::new(left, bottom), color);
        self.line(Vec2::new(left, bottom), Vec2::new(left, top), color);
    }
}

/// Viewpoint the scene is rendered from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Position in world units.
    pub position: WorldPoint,
    /// Facing angle in radians.
    pub angle: f32,
}

impl Camera {
    /// Creates a camera at `position` facing `angle`.
    #[must_use]
    pub const fn new(position: WorldPoint, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// Read-only view of the world consumed by the [`Renderer`].
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Level geometry.
    pub map: &'a GridMap,
    /// Player viewpoint.
    pub camera: Camera,
    /// Live enemies and pickups to billboard.
    pub sprites: &'a [Sprite],
    /// Whether the minimap overlay is drawn.
    pub show_minimap: bool,
}

/// Input snapshot gathered by adapters before the frame is simulated.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Device-agnostic movement and action controls.
    pub controls: InputVector,
    /// Whether the minimap overlay is held open.
    pub show_minimap: bool,
    /// Whether pause was toggled on this frame.
    pub pause_toggled: bool,
    /// Whether the player asked to quit on this frame.
    pub quit: bool,
}

/// Decision returned by the per-frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Close the backend after this frame.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Presentation {
    /// Constructs a presentation descriptor, rejecting empty resolutions.
    pub fn new<T>(window_title: T, width: u32, height: u32) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidResolution { width, height });
        }
        Ok(Self {
            window_title: window_title.into(),
            width,
            height,
        })
    }
}

/// Rendering backend capable of presenting Cyberdoom frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The `frame` closure receives the measured frame delta, the input
    /// captured by the adapter and the surface to draw on. Returning
    /// [`FrameControl::Exit`] stops the backend.
    fn run<F>(self, presentation: Presentation, frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn RasterSurface) -> FrameControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// Both output dimensions must be positive.
    #[error("resolution must be positive (received {width}x{height})")]
    InvalidResolution {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}
