//! Render surface trait
//!
//! Drawing primitives for a pixel display. No layout logic lives here.

use marquee_protocol::Rgb;

/// Render surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Output buffer too small for the frame
    BufferOverflow,
}

/// Pixel render surface
///
/// Coordinates are in pixels with the origin at the top-left corner. Text is
/// positioned by its top-left corner, and anything drawn outside the visible
/// area is clipped.
pub trait RenderSurface {
    /// Blank the frame
    fn clear(&mut self);

    /// Move the text cursor
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Set the color used by subsequent `draw_text` calls
    fn set_color(&mut self, color: Rgb);

    /// Set the output brightness (0-255)
    fn set_brightness(&mut self, brightness: u8);

    /// Width in pixels that `text` would occupy
    fn measure_text_width(&self, text: &str) -> u32;

    /// Draw text at the cursor and advance the cursor past it
    fn draw_text(&mut self, text: &str);

    /// Show the frame that has been drawn
    fn present(&mut self) -> Result<(), DisplayError>;

    /// Surface size in pixels (width, height)
    fn dimensions(&self) -> (u32, u32);
}
