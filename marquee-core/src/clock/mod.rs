//! Wall clock
//!
//! Extrapolates local time from the last synchronization point using the
//! monotonic uptime. The network bridge resynchronizes it with `/setTime`.
//! Before the first sync the clock counts up from 00:00 at boot.

use crate::config::ClockConfig;
use crate::traits::{LocalTime, TimeSource};

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct SyncPoint {
    /// Unix time at the sync (seconds)
    epoch_s: u64,
    /// Uptime at the sync (milliseconds)
    uptime_ms: u64,
}

/// Wall clock anchored to the most recent sync
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    config: ClockConfig,
    last_sync: Option<SyncPoint>,
}

impl WallClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            config: *config,
            last_sync: None,
        }
    }

    /// Record that it is `epoch_s` (unix seconds) at `uptime_ms`
    pub fn sync(&mut self, epoch_s: u64, uptime_ms: u64) {
        self.last_sync = Some(SyncPoint { epoch_s, uptime_ms });
    }

    /// Seconds since the last sync, `None` if never synced
    pub fn sync_age_s(&self, uptime_ms: u64) -> Option<u64> {
        self.last_sync
            .map(|sync| uptime_ms.saturating_sub(sync.uptime_ms) / 1000)
    }

    /// True while the last sync is recent enough to trust
    pub fn is_synchronized(&self, uptime_ms: u64) -> bool {
        self.sync_age_s(uptime_ms)
            .is_some_and(|age| age < self.config.stale_after_s as u64)
    }

    /// True when the bridge should be asked for the time again
    pub fn needs_resync(&self, uptime_ms: u64) -> bool {
        self.sync_age_s(uptime_ms)
            .map_or(true, |age| age >= self.config.resync_interval_s as u64)
    }

    /// Unix time at `uptime_ms`, `None` if never synced
    pub fn epoch_s(&self, uptime_ms: u64) -> Option<u64> {
        self.last_sync.map(|sync| {
            sync.epoch_s
                .saturating_add(uptime_ms.saturating_sub(sync.uptime_ms) / 1000)
        })
    }

    /// Seconds since local midnight
    fn seconds_of_day(&self, uptime_ms: u64) -> u32 {
        // Reduce before applying the offset so any epoch stays in range
        let seconds = match self.epoch_s(uptime_ms) {
            Some(epoch) => (epoch % SECONDS_PER_DAY) as i64 + self.config.utc_offset_s as i64,
            None => (uptime_ms / 1000 % SECONDS_PER_DAY) as i64,
        };
        seconds.rem_euclid(SECONDS_PER_DAY as i64) as u32
    }
}

impl TimeSource for WallClock {
    fn now(&self, uptime_ms: u64) -> LocalTime {
        LocalTime::from_seconds_of_day(
            self.seconds_of_day(uptime_ms),
            self.is_synchronized(uptime_ms),
        )
    }
}
