//! Content store
//!
//! Owns everything the display can show: output settings, the priority
//! alert and the message slots. Mutations validate their input completely
//! before writing, so a rejected request leaves the store untouched.

use core::fmt;

use heapless::String;
use marquee_protocol::{LabelText, MessageText, Rgb};

use crate::config::DisplayConfig;

/// Number of message slots
pub const MESSAGE_SLOTS: usize = 3;

/// Field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Brightness,
    ScrollSpeed,
    Label,
    Text,
}

/// Content store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Value rejected
    Validation(Field),
    /// Message slot index outside `0..capacity`
    OutOfRange { index: i64, capacity: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(_) => f.write_str("Invalid value"),
            StoreError::OutOfRange { .. } => f.write_str("Index out of range"),
        }
    }
}

/// Map a requested slot index onto a valid slot
pub fn slot_index(index: i64) -> Result<usize, StoreError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < MESSAGE_SLOTS)
        .ok_or(StoreError::OutOfRange {
            index,
            capacity: MESSAGE_SLOTS,
        })
}

/// Global output settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySettings {
    /// Output brightness (0-255)
    pub brightness: u8,
    /// Primary text color
    pub color: Rgb,
    /// Scroll speed in pixels per second
    pub scroll_speed: f32,
}

/// Priority alert
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alert {
    pub text: MessageText,
    pub color: Rgb,
    /// Uptime at which the alert disappears; `None` never expires
    pub expires_at_ms: Option<u64>,
}

impl Alert {
    /// True once `now_ms` reaches the deadline
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expires_at_ms, Some(deadline) if now_ms >= deadline)
    }
}

/// Message slot contents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub label: LabelText,
    pub text: MessageText,
    pub color: Rgb,
    /// Disabled slots keep their content but are not shown
    pub enabled: bool,
}

/// Display content and settings
#[derive(Debug, Clone)]
pub struct ContentStore {
    settings: DisplaySettings,
    max_brightness: u8,
    alert_color: Rgb,
    alert: Option<Alert>,
    messages: [Message; MESSAGE_SLOTS],
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}

impl ContentStore {
    /// Create a store with boot settings from `config`
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            settings: DisplaySettings {
                brightness: config.brightness.min(config.max_brightness),
                color: config.primary_color,
                scroll_speed: config.scroll_speed,
            },
            max_brightness: config.max_brightness,
            alert_color: config.alert_color,
            alert: None,
            messages: Default::default(),
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Color used for alerts without their own
    pub fn alert_color(&self) -> Rgb {
        self.alert_color
    }

    /// Set brightness, clamped to the configured maximum
    ///
    /// Returns the brightness actually applied.
    pub fn set_brightness(&mut self, value: i32) -> Result<u8, StoreError> {
        if value < 0 {
            return Err(StoreError::Validation(Field::Brightness));
        }
        let clamped = value.min(self.max_brightness as i32) as u8;
        self.settings.brightness = clamped;
        Ok(clamped)
    }

    /// Set scroll speed in pixels per second
    pub fn set_scroll_speed(&mut self, speed: f32) -> Result<f32, StoreError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(StoreError::Validation(Field::ScrollSpeed));
        }
        self.settings.scroll_speed = speed;
        Ok(speed)
    }

    /// Set the primary color
    pub fn set_color(&mut self, color: Rgb) {
        self.settings.color = color;
    }

    /// Replace the alert
    ///
    /// Empty text removes the alert. Without a color the configured alert
    /// color is used; without a timeout the alert stays until cleared.
    pub fn set_alert(
        &mut self,
        text: &str,
        color: Option<Rgb>,
        timeout_ms: Option<u32>,
        now_ms: u64,
    ) -> Result<(), StoreError> {
        if text.is_empty() {
            self.alert = None;
            return Ok(());
        }
        let text = bounded(text, Field::Text)?;
        self.alert = Some(Alert {
            text,
            color: color.unwrap_or(self.alert_color),
            expires_at_ms: timeout_ms.map(|ms| now_ms.saturating_add(ms as u64)),
        });
        Ok(())
    }

    /// Remove the alert (no-op when there is none)
    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    /// Drop the alert if it has expired
    ///
    /// Returns true if an alert was removed.
    pub fn expire_alert(&mut self, now_ms: u64) -> bool {
        if self.alert.as_ref().is_some_and(|a| a.is_expired(now_ms)) {
            self.alert = None;
            return true;
        }
        false
    }

    /// The alert to show at `now_ms`, if any
    pub fn active_alert(&self, now_ms: u64) -> Option<&Alert> {
        self.alert
            .as_ref()
            .filter(|a| !a.text.is_empty() && !a.is_expired(now_ms))
    }

    /// Overwrite a message slot and enable it
    pub fn set_message(
        &mut self,
        index: usize,
        label: &str,
        text: &str,
        color: Rgb,
    ) -> Result<(), StoreError> {
        let slot = check_slot(index)?;
        let label = bounded(label, Field::Label)?;
        let text = bounded(text, Field::Text)?;
        self.messages[slot] = Message {
            label,
            text,
            color,
            enabled: true,
        };
        Ok(())
    }

    /// Disable a message slot, keeping its content
    pub fn clear_message(&mut self, index: usize) -> Result<(), StoreError> {
        let slot = check_slot(index)?;
        self.messages[slot].enabled = false;
        Ok(())
    }

    pub fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn enabled_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.enabled).count()
    }

    /// Enabled messages in slot order
    pub fn enabled_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.enabled)
    }
}

fn check_slot(index: usize) -> Result<usize, StoreError> {
    if index < MESSAGE_SLOTS {
        Ok(index)
    } else {
        Err(StoreError::OutOfRange {
            index: index as i64,
            capacity: MESSAGE_SLOTS,
        })
    }
}

fn bounded<const N: usize>(value: &str, field: Field) -> Result<String<N>, StoreError> {
    String::try_from(value).map_err(|_| StoreError::Validation(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_brightness_clamps_and_rejects_negative() {
        let mut store = ContentStore::default();
        assert_eq!(store.set_brightness(0), Ok(0));
        assert_eq!(store.settings().brightness, 0);
        assert_eq!(store.set_brightness(255), Ok(255));
        assert_eq!(store.settings().brightness, 255);
        assert_eq!(store.set_brightness(1000), Ok(255));
        assert_eq!(
            store.set_brightness(-1),
            Err(StoreError::Validation(Field::Brightness))
        );
        assert_eq!(store.settings().brightness, 255);
    }

    #[test]
    fn test_brightness_respects_configured_max() {
        let config = DisplayConfig {
            max_brightness: 64,
            ..DisplayConfig::default()
        };
        let mut store = ContentStore::new(&config);
        assert_eq!(store.set_brightness(200), Ok(64));
    }

    #[test]
    fn test_scroll_speed_validation() {
        let mut store = ContentStore::default();
        assert_eq!(store.set_scroll_speed(30.0), Ok(30.0));
        for bad in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert_eq!(
                store.set_scroll_speed(bad),
                Err(StoreError::Validation(Field::ScrollSpeed))
            );
        }
        assert_eq!(store.settings().scroll_speed, 30.0);
    }

    #[test]
    fn test_alert_defaults_and_expiry() {
        let mut store = ContentStore::default();
        store.set_alert("fire", None, Some(500), 1_000).unwrap();

        let alert = store.active_alert(1_000).unwrap();
        assert_eq!(alert.color, store.alert_color());
        assert_eq!(alert.expires_at_ms, Some(1_500));

        assert!(store.active_alert(1_499).is_some());
        assert!(store.active_alert(1_500).is_none());
        assert!(store.active_alert(1_600).is_none());
    }

    #[test]
    fn test_alert_without_timeout_never_expires() {
        let mut store = ContentStore::default();
        store.set_alert("storm", Some(Rgb::RED), None, 0).unwrap();
        assert!(store.active_alert(u64::MAX).is_some());
        assert!(!store.expire_alert(u64::MAX));
    }

    #[test]
    fn test_empty_alert_is_absent() {
        let mut store = ContentStore::default();
        store.set_alert("fire", None, None, 0).unwrap();
        store.set_alert("", None, None, 0).unwrap();
        assert!(store.active_alert(0).is_none());
    }

    #[test]
    fn test_clear_alert_is_idempotent() {
        let mut store = ContentStore::default();
        store.clear_alert();
        store.set_alert("fire", None, None, 0).unwrap();
        store.clear_alert();
        store.clear_alert();
        assert!(store.active_alert(0).is_none());
    }

    #[test]
    fn test_expire_alert_purges() {
        let mut store = ContentStore::default();
        store.set_alert("fire", None, Some(100), 0).unwrap();
        assert!(!store.expire_alert(99));
        assert!(store.expire_alert(100));
        assert!(!store.expire_alert(100));
    }

    #[test]
    fn test_message_bounds() {
        let mut store = ContentStore::default();
        assert_eq!(
            store.set_message(3, "a", "b", Rgb::RED),
            Err(StoreError::OutOfRange {
                index: 3,
                capacity: MESSAGE_SLOTS
            })
        );
        assert!(store.clear_message(7).is_err());
        assert_eq!(store.enabled_message_count(), 0);
        assert_eq!(
            slot_index(-1),
            Err(StoreError::OutOfRange {
                index: -1,
                capacity: MESSAGE_SLOTS
            })
        );
        assert_eq!(slot_index(2), Ok(2));
    }

    #[test]
    fn test_overlong_text_rejected_without_write() {
        let mut store = ContentStore::default();
        store.set_message(0, "old", "keep", Rgb::RED).unwrap();

        let long = "x".repeat(marquee_protocol::MAX_TEXT_LEN + 1);
        assert_eq!(
            store.set_message(0, "new", &long, Rgb::GREEN),
            Err(StoreError::Validation(Field::Text))
        );
        let slot = store.message(0).unwrap();
        assert_eq!(slot.label.as_str(), "old");
        assert_eq!(slot.text.as_str(), "keep");
    }

    #[test]
    fn test_clear_then_set_restores_visibility() {
        let mut store = ContentStore::default();
        store.set_message(1, "a", "b", Rgb::RED).unwrap();
        store.clear_message(1).unwrap();
        assert_eq!(store.enabled_message_count(), 0);
        // Content is kept while disabled
        assert_eq!(store.message(1).unwrap().text.as_str(), "b");

        store.set_message(1, "c", "d", Rgb::GREEN).unwrap();
        assert_eq!(store.enabled_message_count(), 1);
        let shown: Vec<_> = store.enabled_messages().collect();
        assert_eq!(shown[0].label.as_str(), "c");
    }

    #[test]
    fn test_overwrite_leaves_no_residue() {
        let mut store = ContentStore::default();
        store.set_message(0, "long label", "long text here", Rgb::RED).unwrap();
        store.set_message(0, "x", "y", Rgb::GREEN).unwrap();
        let slot = store.message(0).unwrap();
        assert_eq!(slot.label.as_str(), "x");
        assert_eq!(slot.text.as_str(), "y");
        assert_eq!(slot.color, Rgb::GREEN);
    }

    #[test]
    fn test_enabled_messages_in_slot_order() {
        let mut store = ContentStore::default();
        store.set_message(2, "c", "3", Rgb::RED).unwrap();
        store.set_message(0, "a", "1", Rgb::RED).unwrap();
        let labels: Vec<_> = store.enabled_messages().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["a", "c"]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(usize),
        Clear(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..MESSAGE_SLOTS).prop_map(Op::Set),
            (0..MESSAGE_SLOTS).prop_map(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_matches_last_write_per_slot(ops in proptest::collection::vec(op(), 0..32)) {
            let mut store = ContentStore::default();
            let mut expected = [false; MESSAGE_SLOTS];
            for op in &ops {
                match *op {
                    Op::Set(i) => {
                        store.set_message(i, "l", "t", Rgb::RED).unwrap();
                        expected[i] = true;
                    }
                    Op::Clear(i) => {
                        store.clear_message(i).unwrap();
                        expected[i] = false;
                    }
                }
            }
            let count = expected.iter().filter(|&&e| e).count();
            prop_assert_eq!(store.enabled_message_count(), count);
        }

        #[test]
        fn prop_expiry_at_or_after_deadline(set_at in 0u64..1_000_000, timeout in 0u32..100_000, at_ms in 0u64..2_000_000) {
            let mut store = ContentStore::default();
            store.set_alert("fire", None, Some(timeout), set_at).unwrap();
            let deadline = set_at + timeout as u64;
            prop_assert_eq!(store.active_alert(at_ms).is_none(), at_ms >= deadline);
        }
    }
}
