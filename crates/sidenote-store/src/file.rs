//! JSON-file-backed key-value store.
//!
//! The persistent backend: the full namespace is one JSON object on disk,
//! loaded at [`FileStore::open`] and rewritten on every `set`. The write
//! lock is held across the disk write so that event order matches the
//! on-disk write order.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use sidenote_core::{Error, KeyValueStore, Result, StorageArea, StoreEvent};

use crate::config::StoreConfig;

/// Key-value store persisted as a single JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, Value>>,
    events: broadcast::Sender<StoreEvent>,
    area: StorageArea,
}

impl FileStore {
    /// Open (or create) the store at `path` with the default configuration.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default()).await
    }

    /// Open (or create) the store at `path`.
    ///
    /// A missing file is an empty store; a present file must hold a JSON
    /// object or the open fails with a serialization error.
    pub async fn open_with_config(path: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(Error::Io(e)),
        };
        debug!(path = %path.display(), entry_count = entries.len(), "file store opened");

        let (events, _) = broadcast::channel(config.event_capacity);
        Ok(Self {
            path,
            entries: RwLock::new(entries),
            events,
            area: config.area,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
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
            let mut updated = current.clone();
            for (key, value) in entries {
                let old_value = updated.insert(key.clone(), value.clone());
                event.record(key, old_value, Some(value));
            }
            // Commit to memory only after the disk write succeeds, so a
            // failed set leaves readers on the previous state.
            self.persist(&updated).await?;
            *current = updated;
        }
        debug!(
            path = %self.path.display(),
            key_count = event.changes.len(),
            "file store write"
        );
        let _ = self.events.send(event);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
