//! Local time source

/// Local time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// False when the time is not known to be correct
    pub synchronized: bool,
}

impl LocalTime {
    /// Build from seconds since local midnight
    pub const fn from_seconds_of_day(seconds: u32, synchronized: bool) -> Self {
        let seconds = seconds % 86_400;
        Self {
            hour: (seconds / 3600) as u8,
            minute: (seconds / 60 % 60) as u8,
            second: (seconds % 60) as u8,
            synchronized,
        }
    }
}

/// Source of the current local time
pub trait TimeSource {
    /// Local time at the given uptime
    fn now(&self, uptime_ms: u64) -> LocalTime;
}
