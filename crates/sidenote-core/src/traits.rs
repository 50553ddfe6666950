//! Core traits for sidenote abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::events::StoreEvent;

/// Asynchronous flat key-value store with change notification.
///
/// This is the persistence seam of the whole engine: note buckets, feature
/// flags, and setup markers all live in one namespace behind this trait.
/// There is no cross-key transaction and no compare-and-swap; callers doing
/// read-modify-write of the same key can race, and the last write wins.
/// Stores are plain objects owned by the composition root, never implicit
/// singletons.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the listed keys. Absent keys are simply missing from the
    /// returned map, never an error.
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>>;

    /// Fetch every entry in the store.
    async fn get_all(&self) -> Result<HashMap<String, Value>>;

    /// Upsert every entry in `entries`, then broadcast a single
    /// [`StoreEvent`] carrying the old and new value of each written key.
    /// The event is emitted only after the write is observable via `get`.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<()>;

    /// Subscribe to change events. Each call returns an independent
    /// receiver; dropping it is the only deregistration needed.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
