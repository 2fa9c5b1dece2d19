//! Minimal TOML parser for device configuration
//!
//! Handles only the subset used by `device.toml`, without allocating:
//! - `[section]` headers (`display`, `timing`, `layout`, `clock`)
//! - `key = value` pairs with string, integer, float and boolean values
//! - Comments (`# ...`), including after a value
//!
//! Keys that are not set keep their defaults.

use marquee_display::StripLayout;
use marquee_protocol::Rgb;

use super::types::{ConfigError, DeviceConfig, UnsyncedClockPolicy};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is not `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Parsed values violate a cross-field constraint
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(error: ConfigError) -> Self {
        ParseError::Invalid(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
    Layout,
    Clock,
}

/// Parse TOML text into a validated `DeviceConfig`
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        "layout" => Ok(Section::Layout),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Cut a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split "key = value"
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Display => {
            let display = &mut config.display;
            match key {
                "brightness" => display.brightness = parse_int(value)?,
                "max_brightness" => display.max_brightness = parse_int(value)?,
                "scroll_speed" => display.scroll_speed = parse_float(value)?,
                "color" => display.primary_color = parse_color(value)?,
                "alert_color" => display.alert_color = parse_color(value)?,
                "strip_layout" => display.strip_layout = parse_strip_layout(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Timing => {
            let timing = &mut config.timing;
            match key {
                "scroll_interval_ms" => timing.scroll_interval_ms = parse_int(value)?,
                "clock_interval_ms" => timing.clock_interval_ms = parse_int(value)?,
                "message_delay_ms" => timing.message_delay_ms = parse_int(value)?,
                "control_poll_ms" => timing.control_poll_ms = parse_int(value)?,
                "housekeeping_interval_ms" => timing.housekeeping_interval_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Layout => {
            let layout = &mut config.layout;
            match key {
                "message_padding" => layout.message_padding = parse_int(value)?,
                "clock_x" => layout.clock_x = parse_int(value)?,
                "text_y" => layout.text_y = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Clock => {
            let clock = &mut config.clock;
            match key {
                "utc_offset_s" => clock.utc_offset_s = parse_int(value)?,
                "resync_interval_s" => clock.resync_interval_s = parse_int(value)?,
                "stale_after_s" => clock.stale_after_s = parse_int(value)?,
                "blink_colon" => clock.blink_colon = parse_bool(value)?,
                "unsynced_color" => clock.unsynced = parse_unsynced_policy(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    let wide: i64 = digits.parse().map_err(|_| ParseError::InvalidValue)?;
    T::try_from(wide).map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_color(value: &str) -> Result<Rgb, ParseError> {
    Rgb::from_hex(parse_string(value)).ok_or(ParseError::InvalidValue)
}

fn parse_strip_layout(value: &str) -> Result<StripLayout, ParseError> {
    match parse_string(value) {
        "row_major" => Ok(StripLayout::RowMajor),
        "row_zigzag" => Ok(StripLayout::RowZigzag),
        "column_major" => Ok(StripLayout::ColumnMajor),
        "column_zigzag" => Ok(StripLayout::ColumnZigzag),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_unsynced_policy(value: &str) -> Result<UnsyncedClockPolicy, ParseError> {
    match parse_string(value) {
        "alert" => Ok(UnsyncedClockPolicy::AlertColor),
        "primary" => Ok(UnsyncedClockPolicy::PrimaryColor),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
# Marquee 32x8 matrix
[display]
brightness = 10
max_brightness = 128
scroll_speed = 24.5
color = "#00FF00"        # green
alert_color = "0xFF0000"
strip_layout = "column_zigzag"

[timing]
message_delay_ms = 15_000

[layout]
clock_x = 2

[clock]
utc_offset_s = -18000
blink_colon = false
unsynced_color = "primary"
"##;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.display.brightness, 10);
        assert_eq!(config.display.max_brightness, 128);
        assert_eq!(config.display.scroll_speed, 24.5);
        assert_eq!(config.display.primary_color, Rgb::GREEN);
        assert_eq!(config.display.alert_color, Rgb::RED);
        assert_eq!(config.timing.message_delay_ms, 15_000);
        assert_eq!(config.layout.clock_x, 2);
        assert_eq!(config.clock.utc_offset_s, -18000);
        assert!(!config.clock.blink_colon);
        assert_eq!(config.clock.unsynced, UnsyncedClockPolicy::PrimaryColor);

        // Untouched keys keep defaults
        assert_eq!(config.timing.scroll_interval_ms, 50);
        assert_eq!(config.layout.message_padding, 5);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), DeviceConfig::default());
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("display"), Ok(Section::Display));
        assert_eq!(parse_section_header(" clock "), Ok(Section::Clock));
        assert_eq!(parse_section_header("wifi"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("color = \"#00FF00\" # x"), "color = \"#00FF00\" ");
        assert_eq!(strip_comment("# only comment"), "");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_config("brightness = 3"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[display]\nbrightness = 300"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\ncolor = \"blue\""),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[timing]\nfoo = 1"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(parse_config("[display]\nbrightness"), Err(ParseError::InvalidLine));
        assert_eq!(
            parse_config("[timing]\nclock_interval_ms = 0"),
            Err(ParseError::Invalid(ConfigError::ZeroInterval))
        );
    }
}
