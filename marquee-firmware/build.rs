//! Build script for marquee-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "display",
        &[
            "brightness",
            "max_brightness",
            "scroll_speed",
            "color",
            "alert_color",
            "strip_layout",
        ],
    ),
    (
        "timing",
        &[
            "scroll_interval_ms",
            "clock_interval_ms",
            "message_delay_ms",
            "control_poll_ms",
            "housekeeping_interval_ms",
        ],
    ),
    ("layout", &["message_padding", "clock_x", "text_y"]),
    (
        "clock",
        &[
            "utc_offset_s",
            "resync_interval_s",
            "stale_after_s",
            "blink_colon",
            "unsynced_color",
        ],
    ),
];

const STRIP_LAYOUTS: &[&str] = &["row_major", "row_zigzag", "column_major", "column_zigzag"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a device.toml configuration file.           ║\n\
            ║  Please create one in the marquee-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_keys(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_clock(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in device.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject unknown sections and keys; the firmware parser does too
fn validate_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (section, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(toml::Value::as_table)
}

fn integer_in(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(n)) if range.contains(n) => Some(*n),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn is_hex_color(text: &str) -> bool {
    let digits = text.strip_prefix('#').unwrap_or(text);
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = section(config, "display") else {
        return;
    };

    let brightness = integer_in(display, "display", "brightness", 0..=255, errors);
    let max = integer_in(display, "display", "max_brightness", 0..=255, errors);
    if brightness.unwrap_or(2) > max.unwrap_or(255) {
        errors.push("[display] brightness exceeds max_brightness".to_string());
    }

    match display.get("scroll_speed") {
        None => {}
        Some(toml::Value::Float(speed)) if *speed > 0.0 => {}
        Some(toml::Value::Integer(speed)) if *speed > 0 => {}
        Some(_) => errors.push("[display] scroll_speed must be a positive number".to_string()),
    }

    for key in ["color", "alert_color"] {
        match display.get(key) {
            None => {}
            Some(toml::Value::String(color)) if is_hex_color(color) => {}
            Some(_) => errors.push(format!("[display] {} must be \"#RRGGBB\"", key)),
        }
    }

    if let Some(layout) = display.get("strip_layout") {
        if !layout.as_str().is_some_and(|l| STRIP_LAYOUTS.contains(&l)) {
            errors.push(format!(
                "[display] strip_layout must be one of {}",
                STRIP_LAYOUTS.join(", ")
            ));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = section(config, "timing") else {
        return;
    };

    for key in SECTIONS[1].1 {
        // A zero delay rotates messages back to back
        let min = if *key == "message_delay_ms" { 0 } else { 1 };
        integer_in(timing, "timing", key, min..=u32::MAX as i64, errors);
    }
}

fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(clock) = section(config, "clock") else {
        return;
    };

    integer_in(clock, "clock", "utc_offset_s", -50_400..=50_400, errors);
    let resync = integer_in(clock, "clock", "resync_interval_s", 1..=u32::MAX as i64, errors);
    let stale = integer_in(clock, "clock", "stale_after_s", 1..=u32::MAX as i64, errors);
    if resync.unwrap_or(300) >= stale.unwrap_or(900) {
        errors.push("[clock] resync_interval_s must be below stale_after_s".to_string());
    }

    if let Some(blink) = clock.get("blink_colon") {
        if !blink.is_bool() {
            errors.push("[clock] blink_colon must be true or false".to_string());
        }
    }

    if let Some(policy) = clock.get("unsynced_color") {
        if !matches!(policy.as_str(), Some("alert" | "primary")) {
            errors.push("[clock] unsynced_color must be 'alert' or 'primary'".to_string());
        }
    }
}
