//! Configuration type definitions
//!
//! Defaults reproduce the stock device: a 32x8 matrix, dim blue text and an
//! orange-red alert color.

use marquee_display::StripLayout;
use marquee_protocol::Rgb;

/// Default primary text color
pub const DEFAULT_PRIMARY_COLOR: Rgb = Rgb::from_u32(0x4AABFF);

/// Default alert color
pub const DEFAULT_ALERT_COLOR: Rgb = Rgb::from_u32(0xFF654A);

/// Color used for the clock while wall time is not synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnsyncedClockPolicy {
    /// Draw the clock in the alert color
    #[default]
    AlertColor,
    /// Draw the clock in the primary color, same as synchronized time
    PrimaryColor,
}

/// Display output settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Brightness at boot (0-255)
    pub brightness: u8,
    /// Upper bound applied to brightness requests
    pub max_brightness: u8,
    /// Scroll speed at boot (pixels per second)
    pub scroll_speed: f32,
    /// Primary text color at boot
    pub primary_color: Rgb,
    /// Color for alerts that do not name one
    pub alert_color: Rgb,
    /// LED chain wiring
    pub strip_layout: StripLayout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            brightness: 2,
            max_brightness: 255,
            scroll_speed: 18.0,
            primary_color: DEFAULT_PRIMARY_COLOR,
            alert_color: DEFAULT_ALERT_COLOR,
            strip_layout: StripLayout::ColumnZigzag,
        }
    }
}

/// Task cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Frame interval while text scrolls
    pub scroll_interval_ms: u32,
    /// Redraw interval of the clock
    pub clock_interval_ms: u32,
    /// Pause between two message rotations
    pub message_delay_ms: u32,
    /// Control request polling interval
    pub control_poll_ms: u32,
    /// Alert expiry and clock staleness check interval
    pub housekeeping_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scroll_interval_ms: 50,
            clock_interval_ms: 1000,
            message_delay_ms: 10_000,
            control_poll_ms: 100,
            housekeeping_interval_ms: 1000,
        }
    }
}

/// Text placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutConfig {
    /// Gap between consecutive messages (pixels)
    pub message_padding: u16,
    /// Left edge of the clock text
    pub clock_x: i16,
    /// Top edge of all text
    pub text_y: i16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            message_padding: 5,
            clock_x: 1,
            text_y: 0,
        }
    }
}

/// Wall clock behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Offset of local time from UTC (seconds)
    pub utc_offset_s: i32,
    /// Age after which a resync should be requested (seconds)
    pub resync_interval_s: u32,
    /// Age after which the time counts as unsynchronized (seconds)
    pub stale_after_s: u32,
    /// Blink the hour/minute separator every other second
    pub blink_colon: bool,
    /// Clock color while unsynchronized
    pub unsynced: UnsyncedClockPolicy,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_s: 3600,
            resync_interval_s: 300,
            stale_after_s: 900,
            blink_colon: true,
            unsynced: UnsyncedClockPolicy::AlertColor,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub clock: ClockConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Boot brightness above `max_brightness`
    BrightnessAboveMax,
    /// Scroll speed not a positive finite number
    InvalidScrollSpeed,
    /// A task interval of zero
    ZeroInterval,
    /// Resync interval not shorter than the staleness limit
    ResyncAfterStale,
}

impl DeviceConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.brightness > self.display.max_brightness {
            return Err(ConfigError::BrightnessAboveMax);
        }
        let speed = self.display.scroll_speed;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidScrollSpeed);
        }
        let t = &self.timing;
        if [
            t.scroll_interval_ms,
            t.clock_interval_ms,
            t.control_poll_ms,
            t.housekeeping_interval_ms,
        ]
        .contains(&0)
        {
            return Err(ConfigError::ZeroInterval);
        }
        if self.clock.resync_interval_s >= self.clock.stale_after_s {
            return Err(ConfigError::ResyncAfterStale);
        }
        Ok(())
    }
}
