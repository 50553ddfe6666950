//! Note repository: CRUD over per-bucket collections.
//!
//! Every note lives in the bucket resolved from the URL it was created
//! against, and every bucket is one store entry. Mutations are a full
//! read-modify-write of that single entry: two concurrent writers to the
//! same bucket race, and the last write wins. That is the documented
//! behavior of the engine (single-user local store), not an oversight.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use sidenote_core::{
    is_bucket_key, resolve_bucket_location, sanitize_html, BucketLocation, Error, KeyValueStore,
    Note, NoteDraft, NoteId, NotePatch, NotesMap, Result,
};

/// Repository for note CRUD operations over a [`KeyValueStore`].
#[derive(Clone)]
pub struct NoteStore {
    store: Arc<dyn KeyValueStore>,
}

impl NoteStore {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn load_bucket(&self, key: &str) -> Result<NotesMap> {
        let mut result = self.store.get(&[key.to_string()]).await?;
        match result.remove(key) {
            // Absent bucket reads as empty; buckets come into existence on
            // first write.
            None => Ok(NotesMap::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    async fn persist_bucket(&self, key: &str, bucket: &NotesMap) -> Result<()> {
        let value = serde_json::to_value(bucket)?;
        self.store
            .set(HashMap::from([(key.to_string(), value)]))
            .await
    }

    /// Fetch notes, merged across buckets.
    ///
    /// With `locations`, only those buckets are read (merging cannot
    /// collide: ids are bucket-prefixed). Without `locations` — or with an
    /// empty list — the whole store is scanned for bucket keys.
    pub async fn get_notes(&self, locations: Option<&[BucketLocation]>) -> Result<NotesMap> {
        let raw = match locations {
            Some(locations) if !locations.is_empty() => {
                let keys: Vec<String> =
                    locations.iter().map(BucketLocation::storage_key).collect();
                self.store.get(&keys).await?
            }
            _ => self.store.get_all().await?,
        };

        let mut notes = NotesMap::new();
        for (key, value) in raw {
            if !is_bucket_key(&key) {
                continue;
            }
            let bucket: NotesMap = serde_json::from_value(value)?;
            notes.extend(bucket);
        }
        debug!(result_count = notes.len(), "fetched notes");
        Ok(notes)
    }

    /// Create a note from `draft` in the bucket resolved from `draft.url`.
    ///
    /// Assigns a fresh bucket-prefixed id, stamps both timestamps with the
    /// current time, and sanitizes the content before persisting.
    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note> {
        let location = resolve_bucket_location(&draft.url);
        let id = NoteId::generate(&location);
        let now = Utc::now().timestamp_millis();
        let note = Note {
            id: id.clone(),
            title: draft.title,
            content: sanitize_html(&draft.content),
            url: draft.url,
            icon: draft.icon,
            created_at: now,
            updated_at: now,
        };

        let key = location.storage_key();
        let mut bucket = self.load_bucket(&key).await?;
        bucket.insert(id.clone(), note.clone());
        self.persist_bucket(&key, &bucket).await?;

        debug!(note_id = %id, bucket = %location, "created note");
        Ok(note)
    }

    /// Merge `patch` over the note identified by `id`.
    ///
    /// The bucket is recovered from the id prefix alone; patching the url
    /// never moves a note between buckets. Fails with
    /// [`Error::NoteNotFound`] when the id is absent from its bucket.
    /// Content, when patched, is re-sanitized, and `updated_at` is stamped
    /// strictly greater than its previous value.
    pub async fn update_note(&self, id: &NoteId, patch: NotePatch) -> Result<Note> {
        let key = id.storage_key();
        let mut bucket = self.load_bucket(&key).await?;
        let current = bucket
            .get(id)
            .ok_or_else(|| Error::NoteNotFound(id.clone()))?;

        let mut updated = current.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(content) = patch.content {
            updated.content = sanitize_html(&content);
        }
        if let Some(url) = patch.url {
            updated.url = url;
        }
        if let Some(icon) = patch.icon {
            updated.icon = icon;
        }
        updated.updated_at = Utc::now().timestamp_millis().max(current.updated_at + 1);

        bucket.insert(id.clone(), updated.clone());
        self.persist_bucket(&key, &bucket).await?;

        debug!(note_id = %id, "updated note");
        Ok(updated)
    }

    /// Delete the note identified by `id`.
    ///
    /// Returns whether a deletion happened. A missing id is `Ok(false)` —
    /// the desired end state already holds — and issues no write.
    pub async fn delete_note(&self, id: &NoteId) -> Result<bool> {
        let key = id.storage_key();
        let mut bucket = self.load_bucket(&key).await?;
        if bucket.remove(id).is_none() {
            return Ok(false);
        }
        self.persist_bucket(&key, &bucket).await?;

        debug!(note_id = %id, "deleted note");
        Ok(true)
    }
}
