//! Opaque 24-bit colors
//!
//! Colors travel as six hex digits (`FF654A`), optionally prefixed with `#`
//! or `0x`. There is no alpha channel.

use core::fmt;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value (upper byte ignored)
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Pack into `0xRRGGBB`
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse a hex color such as `FF0000`, `#ff0000` or `0xFF0000`
    ///
    /// Exactly six hex digits are required after the optional prefix.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes() {
        let expected = Rgb::new(0xFF, 0x65, 0x4A);
        assert_eq!(Rgb::from_hex("FF654A"), Some(expected));
        assert_eq!(Rgb::from_hex("#ff654a"), Some(expected));
        assert_eq!(Rgb::from_hex("0xFF654A"), Some(expected));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("FFF"), None);
        assert_eq!(Rgb::from_hex("GG0000"), None);
        assert_eq!(Rgb::from_hex("+F0000"), None);
        assert_eq!(Rgb::from_hex("FF00000"), None);
    }

    #[test]
    fn test_packed() {
        let c = Rgb::from_u32(0x4AABFF);
        assert_eq!(c, Rgb::new(74, 171, 255));
        assert_eq!(c.to_u32(), 0x4AABFF);
    }

    #[test]
    fn test_display_is_uppercase_hex() {
        assert_eq!(std::format!("{}", Rgb::new(74, 171, 255)), "4AABFF");
    }
}
