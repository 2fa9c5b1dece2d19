//! Device state shared between scheduled tasks

use crate::clock::WallClock;
use crate::config::DeviceConfig;
use crate::store::ContentStore;

/// Everything the control plane may change
#[derive(Debug, Clone)]
pub struct Device {
    pub store: ContentStore,
    pub clock: WallClock,
}

impl Device {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            store: ContentStore::new(&config.display),
            clock: WallClock::new(&config.clock),
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}
