use glam::Vec2;

use crate::{Color, RasterSurface, RenderingError};

/// In-memory RGBA surface with alpha blending.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Creates a black framebuffer of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidResolution { width, height });
        }
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        Ok(Self {
            width,
            height,
            pixels: vec![black; width as usize * height as usize],
        })
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Encodes the buffer as row-major RGBA bytes.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| {
                [pixel.red, pixel.green, pixel.blue, pixel.alpha]
                    .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
            })
            .collect()
    }

    fn blend(&mut self, x: usize, y: usize, color: Color) {
        let index = y * self.width as usize + x;
        let Some(target) = self.pixels.get_mut(index) else {
            return;
        };
        let alpha = color.alpha.clamp(0.0, 1.0);
        target.red = color.red * alpha + target.red * (1.0 - alpha);
        target.green = color.green * alpha + target.green * (1.0 - alpha);
        target.blue = color.blue * alpha + target.blue * (1.0 - alpha);
        target.alpha = 1.0;
    }
}

fn span(start: f32, length: f32, limit: u32) -> (usize, usize) {
    let low = start.round().clamp(0.0, limit as f32);
    let high = (start + length).round().clamp(0.0, limit as f32);
    (low as usize, high as usize)
}

impl RasterSurface for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return;
        }
        let (left, right) = span(x, width, self.width);
        let (top, bottom) = span(y, height, self.height);
        for row in top..bottom {
            for column in left..right {
                self.blend(column, row, color);
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        if !(from.is_finite() && to.is_finite()) {
            return;
        }
        let steps = (to - from).abs().max_element().ceil().max(1.0);
        // Degenerate or absurdly long segments are clipped to the buffer diagonal.
        let steps = steps.min((self.width + self.height) as f32 * 2.0) as u32;
        for step in 0..=steps {
            let point = from.lerp(to, step as f32 / steps as f32).floor();
            if point.x >= 0.0 && point.y >= 0.0 {
                let (column, row) = (point.x as u32, point.y as u32);
                if column < self.width && row < self.height {
                    self.blend(column as usize, row as usize, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.blend(x as usize, y as usize, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_buffers_are_rejected() {
        assert_eq!(
            Framebuffer::new(0, 4),
            Err(RenderingError::InvalidResolution {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn fill_rect_clips_and_blends() {
        let mut buffer = Framebuffer::new(4, 4).expect("valid size");

        buffer.fill_rect(-2.0, 2.0, 10.0, 10.0, Color::new(1.0, 0.0, 0.0, 1.0));
        buffer.fill_rect(0.0, 3.0, 1.0, 1.0, Color::new(0.0, 0.0, 1.0, 0.5));

        assert_eq!(buffer.pixel(0, 1), Some(Color::new(0.0, 0.0, 0.0, 1.0)));
        assert_eq!(buffer.pixel(3, 2), Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(buffer.pixel(0, 3), Some(Color::new(0.5, 0.0, 0.5, 1.0)));
        assert_eq!(buffer.pixel(4, 0), None);
    }

    #[test]
    fn lines_cover_both_endpoints() {
        let mut buffer = Framebuffer::new(8, 8).expect("valid size");
        let white = Color::new(1.0, 1.0, 1.0, 1.0);

        buffer.line(Vec2::new(1.0, 1.0), Vec2::new(6.0, 6.0), white);

        assert_eq!(buffer.pixel(1, 1), Some(white));
        assert_eq!(buffer.pixel(6, 6), Some(white));
        assert_eq!(buffer.pixel(6, 1), Some(Color::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn rgba_bytes_follow_row_major_order() {
        let mut buffer = Framebuffer::new(2, 1).expect("valid size");
        buffer.set_pixel(1, 0, Color::new(1.0, 0.5, 0.0, 1.0));

        assert_eq!(buffer.to_rgba8(), vec![0, 0, 0, 255, 255, 128, 0, 255]);
    }
}
