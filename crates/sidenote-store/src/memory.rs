//! In-memory key-value store backend.
//!
//! Backs tests and ephemeral sessions. Semantics match [`FileStore`]
//! minus persistence: writes are visible to readers before the change
//! event is broadcast, and events are emitted in write order.
//!
//! [`FileStore`]: crate::FileStore

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use sidenote_core::{KeyValueStore, Result, StorageArea, StoreEvent};

use crate::config::StoreConfig;

/// Key-value store held entirely in memory.
///
/// Constructed by the composition root and shared behind an `Arc`; there is
/// no process-wide instance.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    events: broadcast::Sender<StoreEvent>,
    area: StorageArea,
}

impl MemoryStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
            area: config.area,
        }
    }

    /// Create a store pre-populated with `entries`. No change event is
    /// emitted for the seed data.
    pub fn with_entries(entries: HashMap<String, Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
            ..Self::new()
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn get_all(&self) -> Result<HashMap<String, Value>> {
        Ok(self.entries.read().await.clone())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        let mut event = StoreEvent::new(self.area);
        {
            let mut current = self.entries.write().await;
            for (key, value) in entries {
                let old_value = current.insert(key.clone(), value.clone());
                event.record(key, old_value, Some(value));
            }
        }
        debug!(key_count = event.changes.len(), "memory store write");
        // No receivers is fine; the event is simply dropped.
        let _ = self.events.send(event);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
