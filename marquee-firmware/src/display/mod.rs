//! WS2812 LED matrix
//!
//! The engine draws into a `Canvas`; presenting serializes the canvas in
//! chain order with brightness applied and hands the frame to the LED task.
//! The panel is a 32x8 matrix wired in columns, zigzag, from the top left.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use smart_leds::RGB8;

use marquee_display::{Canvas, DisplayError, RenderSurface, StripLayout};
use marquee_protocol::Rgb;

use crate::channels::FRAME;

/// Matrix width in pixels
pub const WIDTH: usize = 32;

/// Matrix height in pixels
pub const HEIGHT: usize = 8;

/// Number of LEDs in the chain
pub const LED_COUNT: usize = WIDTH * HEIGHT;

/// Render surface backed by the LED chain
pub struct LedMatrix {
    canvas: Canvas<WIDTH, HEIGHT>,
    layout: StripLayout,
    strip: [Rgb888; LED_COUNT],
}

impl LedMatrix {
    pub fn new(layout: StripLayout) -> Self {
        Self {
            canvas: Canvas::new(),
            layout,
            strip: [Rgb888::BLACK; LED_COUNT],
        }
    }
}

impl RenderSurface for LedMatrix {
    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.canvas.set_cursor(x, y);
    }

    fn set_color(&mut self, color: Rgb) {
        self.canvas.set_color(color);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.canvas.set_brightness(brightness);
    }

    fn measure_text_width(&self, text: &str) -> u32 {
        self.canvas.measure_text_width(text)
    }

    fn draw_text(&mut self, text: &str) {
        self.canvas.draw_text(text);
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.canvas.write_strip(self.layout, &mut self.strip)?;

        let mut frame = [RGB8::default(); LED_COUNT];
        for (led, pixel) in frame.iter_mut().zip(self.strip.iter()) {
            *led = RGB8::new(pixel.r(), pixel.g(), pixel.b());
        }
        FRAME.signal(frame);
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }
}
