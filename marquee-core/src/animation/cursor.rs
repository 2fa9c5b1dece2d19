//! Horizontal scroll cursor
//!
//! Position advances by elapsed time rather than by frame count, so the
//! on-screen speed does not depend on how regularly frames are drawn.

/// Left edge of scrolling content, in fractional pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollCursor {
    position: f32,
    last_ms: u64,
}

impl ScrollCursor {
    /// Cursor at `x`, with `now_ms` as the time baseline
    pub fn new(x: i32, now_ms: u64) -> Self {
        Self {
            position: x as f32,
            last_ms: now_ms,
        }
    }

    /// Move back to `x` and restart the time baseline
    pub fn reset(&mut self, x: i32, now_ms: u64) {
        self.position = x as f32;
        self.last_ms = now_ms;
    }

    /// Fractional position
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Pixel column to draw at (rounded toward negative infinity)
    pub fn x(&self) -> i32 {
        let truncated = self.position as i32;
        if (truncated as f32) > self.position {
            truncated - 1
        } else {
            truncated
        }
    }

    /// Move left by `speed_px_s` for the time elapsed since the last call
    pub fn advance(&mut self, speed_px_s: f32, now_ms: u64) {
        let elapsed_ms = now_ms.saturating_sub(self.last_ms);
        self.position -= speed_px_s * elapsed_ms as f32 / 1000.0;
        self.last_ms = now_ms;
    }

    /// True once content `width` pixels wide has fully left the left edge
    pub fn has_exited(&self, width: u32) -> bool {
        self.position + (width as f32) < 0.0
    }
}
