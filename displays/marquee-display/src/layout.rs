//! LED chain layout
//!
//! Maps matrix coordinates (origin top-left) to the position of the LED on
//! the data chain.

/// Wiring order of the LED chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripLayout {
    /// Rows left to right, every row starting at the left edge
    RowMajor,
    /// Rows alternating direction
    RowZigzag,
    /// Columns top to bottom, every column starting at the top
    ColumnMajor,
    /// Columns alternating direction, first column running downwards
    #[default]
    ColumnZigzag,
}

impl StripLayout {
    /// Chain index of pixel (x, y) on a `width` x `height` matrix
    ///
    /// Coordinates must be inside the matrix.
    pub const fn index(self, x: usize, y: usize, width: usize, height: usize) -> usize {
        match self {
            Self::RowMajor => y * width + x,
            Self::RowZigzag => {
                if y % 2 == 0 {
                    y * width + x
                } else {
                    y * width + (width - 1 - x)
                }
            }
            Self::ColumnMajor => x * height + y,
            Self::ColumnZigzag => {
                if x % 2 == 0 {
                    x * height + y
                } else {
                    x * height + (height - 1 - y)
                }
            }
        }
    }
}

/// Scale one color channel by a global brightness (0-255)
///
/// Brightness 255 leaves the channel unchanged and 0 turns it off.
pub const fn scale_brightness(channel: u8, brightness: u8) -> u8 {
    ((channel as u16 * (brightness as u16 + 1)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_zigzag_order() {
        // 4x2 panel: column 0 runs down, column 1 runs up
        let layout = StripLayout::ColumnZigzag;
        assert_eq!(layout.index(0, 0, 4, 2), 0);
        assert_eq!(layout.index(0, 1, 4, 2), 1);
        assert_eq!(layout.index(1, 1, 4, 2), 2);
        assert_eq!(layout.index(1, 0, 4, 2), 3);
        assert_eq!(layout.index(2, 0, 4, 2), 4);
    }

    #[test]
    fn test_row_layouts() {
        assert_eq!(StripLayout::RowMajor.index(2, 1, 4, 2), 6);
        assert_eq!(StripLayout::RowZigzag.index(0, 1, 4, 2), 7);
        assert_eq!(StripLayout::ColumnMajor.index(1, 1, 4, 2), 3);
    }

    #[test]
    fn test_layout_is_a_permutation() {
        for layout in [
            StripLayout::RowMajor,
            StripLayout::RowZigzag,
            StripLayout::ColumnMajor,
            StripLayout::ColumnZigzag,
        ] {
            let mut seen = [false; 32 * 8];
            for x in 0..32 {
                for y in 0..8 {
                    let idx = layout.index(x, y, 32, 8);
                    assert!(!seen[idx], "{:?} maps twice to {}", layout, idx);
                    seen[idx] = true;
                }
            }
        }
    }

    #[test]
    fn test_brightness_scaling() {
        assert_eq!(scale_brightness(200, 255), 200);
        assert_eq!(scale_brightness(255, 0), 0);
        assert_eq!(scale_brightness(255, 127), 127);
        assert_eq!(scale_brightness(0, 255), 0);
    }
}
