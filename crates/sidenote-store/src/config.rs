//! Store backend configuration.

use sidenote_core::StorageArea;

/// Default broadcast channel capacity for change events.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration shared by the store backends.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the change-event broadcast channel. Subscribers that
    /// fall more than this many events behind are lagged and must re-fetch.
    pub event_capacity: usize,
    /// Storage area stamped on every emitted change event.
    pub area: StorageArea,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            area: StorageArea::Local,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the change-event channel capacity.
    pub fn event_capacity(mut self, n: usize) -> Self {
        self.event_capacity = n;
        self
    }

    /// Set the storage area stamped on change events.
    pub fn area(mut self, area: StorageArea) -> Self {
        self.area = area;
        self
    }
}
