//! Store change-notification types.
//!
//! Key-value store implementations broadcast one [`StoreEvent`] per write
//! batch over a `tokio::sync::broadcast` channel. Subscribers each get an
//! independent receiver; slow receivers that fall behind see a `Lagged`
//! error and must re-fetch rather than replay, which is how the note
//! subscription broker consumes them anyway.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage area a change originated from. Note buckets live in `Local`;
/// subscribers ignore every other area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Local,
    Session,
}

/// Old and new value of a single changed key.
#[derive(Debug, Clone, Default)]
pub struct KeyChange {
    /// Value before the write; `None` when the key was absent.
    pub old_value: Option<Value>,
    /// Value after the write; `None` when the key was removed.
    pub new_value: Option<Value>,
}

/// One batch of key changes, tagged with the originating storage area.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub area: StorageArea,
    pub changes: HashMap<String, KeyChange>,
}

impl StoreEvent {
    /// Empty change batch for `area`.
    pub fn new(area: StorageArea) -> Self {
        Self {
            area,
            changes: HashMap::new(),
        }
    }

    /// Record one key transition in the batch.
    pub fn record(&mut self, key: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) {
        self.changes.insert(key.into(), KeyChange { old_value, new_value });
    }

    /// Keys changed in this batch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_and_keys() {
        let mut event = StoreEvent::new(StorageArea::Local);
        event.record("notes_domain:a.com", None, Some(json!({})));
        event.record("flag:welcome", Some(json!(false)), Some(json!(true)));

        let mut keys: Vec<&str> = event.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["flag:welcome", "notes_domain:a.com"]);

        let change = &event.changes["notes_domain:a.com"];
        assert!(change.old_value.is_none());
        assert_eq!(change.new_value, Some(json!({})));
    }

    #[test]
    fn test_storage_area_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StorageArea::Local).unwrap(),
            r#""local""#
        );
        assert_eq!(
            serde_json::to_string(&StorageArea::Session).unwrap(),
            r#""session""#
        );
    }
}
