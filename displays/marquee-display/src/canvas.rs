//! Off-screen framebuffer for an RGB LED matrix
//!
//! `Canvas` keeps the unscaled frame in matrix coordinates. Brightness is
//! applied only when the frame is serialized for the LED chain, so changing
//! it never loses color information.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_5X7, MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use marquee_protocol::Rgb;

use crate::backend::{DisplayError, RenderSurface};
use crate::layout::{scale_brightness, StripLayout};

/// Convert a protocol color to an embedded-graphics color
pub const fn to_rgb888(color: Rgb) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// RGB framebuffer of `W` x `H` pixels
pub struct Canvas<const W: usize, const H: usize> {
    pixels: [[Rgb888; W]; H],
    cursor: Point,
    color: Rgb888,
    brightness: u8,
    font: &'static MonoFont<'static>,
}

impl<const W: usize, const H: usize> Default for Canvas<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Canvas<W, H> {
    /// Create a blank canvas using the 5x7 font
    pub const fn new() -> Self {
        Self::with_font(&FONT_5X7)
    }

    /// Create a blank canvas with a specific monospace font
    pub const fn with_font(font: &'static MonoFont<'static>) -> Self {
        Self {
            pixels: [[Rgb888::BLACK; W]; H],
            cursor: Point::zero(),
            color: Rgb888::WHITE,
            brightness: u8::MAX,
            font,
        }
    }

    /// Unscaled pixel at (x, y), `None` outside the canvas
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Current text cursor
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor.x, self.cursor.y)
    }

    /// Current output brightness
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// True when no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pixels
            .iter()
            .all(|row| row.iter().all(|&p| p == Rgb888::BLACK))
    }

    /// Serialize the frame in LED chain order with brightness applied
    ///
    /// `out` must hold at least `W * H` LEDs.
    pub fn write_strip(
        &self,
        layout: StripLayout,
        out: &mut [Rgb888],
    ) -> Result<(), DisplayError> {
        if out.len() < W * H {
            return Err(DisplayError::BufferOverflow);
        }
        for (y, row) in self.pixels.iter().enumerate() {
            for (x, pixel) in row.iter().enumerate() {
                if let Some(slot) = out.get_mut(layout.index(x, y, W, H)) {
                    *slot = Rgb888::new(
                        scale_brightness(pixel.r(), self.brightness),
                        scale_brightness(pixel.g(), self.brightness),
                        scale_brightness(pixel.b(), self.brightness),
                    );
                }
            }
        }
        Ok(())
    }

    fn advance(&self) -> u32 {
        self.font.character_size.width + self.font.character_spacing
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Canvas<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for Canvas<W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.x < W as i32 && point.y >= 0 && point.y < H as i32 {
                self.pixels[point.y as usize][point.x as usize] = color;
            }
        }
        Ok(())
    }
}

impl<const W: usize, const H: usize> RenderSurface for Canvas<W, H> {
    fn clear(&mut self) {
        self.pixels = [[Rgb888::BLACK; W]; H];
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = to_rgb888(color);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn measure_text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance()
    }

    fn draw_text(&mut self, text: &str) {
        let width = self.measure_text_width(text) as i32;
        let style = MonoTextStyle::new(self.font, self.color);
        let _ = Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(self);
        self.cursor.x += width;
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        (W as u32, H as u32)
    }
}
