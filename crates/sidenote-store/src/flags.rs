//! Feature flags and one-time setup markers.
//!
//! Markers share the flat namespace with note buckets but live under the
//! `flag:` prefix, so they never wake note subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use sidenote_core::{KeyValueStore, Result};

/// Key prefix for flag entries.
pub const FLAG_PREFIX: &str = "flag";

/// Boolean markers over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Flags {
    store: Arc<dyn KeyValueStore>,
}

impl Flags {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(name: &str) -> String {
        format!("{FLAG_PREFIX}:{name}")
    }

    /// Whether `name` has been marked. Anything but a stored `true` reads
    /// as unset.
    pub async fn is_set(&self, name: &str) -> Result<bool> {
        let key = Self::key(name);
        let result = self.store.get(std::slice::from_ref(&key)).await?;
        Ok(matches!(result.get(&key), Some(Value::Bool(true))))
    }

    /// Set the marker `name`.
    pub async fn mark(&self, name: &str) -> Result<()> {
        self.store
            .set(HashMap::from([(Self::key(name), Value::Bool(true))]))
            .await
    }

    /// Set the marker and report whether this call was the first to do so.
    /// Used for one-time flows such as onboarding.
    pub async fn mark_once(&self, name: &str) -> Result<bool> {
        if self.is_set(name).await? {
            return Ok(false);
        }
        self.mark(name).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_unset_by_default() {
        let flags = Flags::new(Arc::new(MemoryStore::new()));
        assert!(!flags.is_set("welcome_shown").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_then_is_set() {
        let flags = Flags::new(Arc::new(MemoryStore::new()));
        flags.mark("welcome_shown").await.unwrap();
        assert!(flags.is_set("welcome_shown").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_once_reports_first_call() {
        let flags = Flags::new(Arc::new(MemoryStore::new()));
        assert!(flags.mark_once("welcome_shown").await.unwrap());
        assert!(!flags.mark_once("welcome_shown").await.unwrap());
    }

    #[tokio::test]
    async fn test_non_boolean_value_reads_unset() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(HashMap::from([(
                "flag:welcome_shown".to_string(),
                serde_json::json!("yes"),
            )]))
            .await
            .unwrap();
        let flags = Flags::new(store);
        assert!(!flags.is_set("welcome_shown").await.unwrap());
    }
}
