//! Mode resolution and message rotation timer

/// What the display is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Time of day, redrawn once per clock interval
    #[default]
    Clock,
    /// Priority alert scrolling in a loop
    Alert,
    /// One pass of all enabled messages
    MessageRotation,
}

/// Facts that decide the display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeInputs {
    /// An unexpired, non-empty alert exists
    pub alert_active: bool,
    /// The rotation timer is due or a rotation is in progress
    pub rotation_pending: bool,
    /// Number of enabled message slots
    pub enabled_messages: usize,
}

impl DisplayMode {
    /// Resolve the mode for a frame
    ///
    /// Alert beats message rotation, which beats the clock.
    pub fn resolve(inputs: ModeInputs) -> Self {
        if inputs.alert_active {
            DisplayMode::Alert
        } else if inputs.enabled_messages > 0 && inputs.rotation_pending {
            DisplayMode::MessageRotation
        } else {
            DisplayMode::Clock
        }
    }

    /// Check if this mode scrolls text
    pub fn is_scrolling(&self) -> bool {
        matches!(self, DisplayMode::Alert | DisplayMode::MessageRotation)
    }
}

/// Message rotation timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationTimer {
    /// Next rotation may start immediately
    #[default]
    Due,
    /// Next rotation may start at the given uptime
    Armed { due_at_ms: u64 },
    /// A rotation is on screen
    Active,
}

impl RotationTimer {
    /// True when a rotation should be showing at `now_ms`
    pub fn is_pending(&self, now_ms: u64) -> bool {
        match *self {
            RotationTimer::Due | RotationTimer::Active => true,
            RotationTimer::Armed { due_at_ms } => now_ms >= due_at_ms,
        }
    }

    /// Milliseconds until the timer fires, `None` if already pending
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match *self {
            RotationTimer::Armed { due_at_ms } if now_ms < due_at_ms => Some(due_at_ms - now_ms),
            _ => None,
        }
    }
}
