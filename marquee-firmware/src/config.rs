//! Boot configuration
//!
//! The device configuration is compiled into the image from `device.toml`.
//! build.rs already rejects a broken file, so a parse failure here means the
//! image was built without validation; fall back to the defaults.

use defmt::*;

use marquee_core::config::{parse_config, DeviceConfig};

/// Parse the embedded configuration
pub fn load(text: &str) -> DeviceConfig {
    match parse_config(text) {
        Ok(config) => {
            info!(
                "Config: brightness={}, speed={} px/s, rotation delay={} ms",
                config.display.brightness,
                config.display.scroll_speed,
                config.timing.message_delay_ms
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            DeviceConfig::default()
        }
    }
}
