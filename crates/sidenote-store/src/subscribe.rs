//! Change-subscription broker for note collections.
//!
//! Bridges raw store change events to note-level callbacks: a spawned task
//! drains the store's broadcast channel, filters changed keys by storage
//! area and bucket interest, and on a qualifying change re-fetches the
//! full note set — no diffing — and hands it to the callback.

use std::collections::HashSet;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use sidenote_core::{is_bucket_key, BucketLocation, NotesMap, StorageArea};

use crate::notes::NoteStore;

/// Handle to an active note subscription.
///
/// The subscription stays live until [`unsubscribe`](Self::unsubscribe) or
/// drop; either aborts the listening task, so repeated subscribe/drop
/// cycles cannot leak listeners. Concurrent subscriptions are fully
/// independent: each owns its receiver and its interest filter.
pub struct NotesSubscription {
    handle: JoinHandle<()>,
}

impl NotesSubscription {
    /// Stop listening. Best-effort immediate: an event already being
    /// processed may still complete, but no callback fires after the
    /// listening task is torn down.
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    /// Whether the listening task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for NotesSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl NoteStore {
    /// Subscribe to changes of the note collection.
    ///
    /// With `locations`, only changes touching exactly those buckets wake
    /// the callback; without, any bucket-key change does. Non-`Local`
    /// areas and non-bucket keys never qualify. Each qualifying change
    /// re-invokes [`NoteStore::get_notes`] with the same `locations` and
    /// delivers the fresh map.
    pub fn subscribe_to_notes<F>(
        &self,
        callback: F,
        locations: Option<Vec<BucketLocation>>,
    ) -> NotesSubscription
    where
        F: Fn(NotesMap) + Send + Sync + 'static,
    {
        let interested: Option<HashSet<String>> = locations
            .as_ref()
            .map(|ls| ls.iter().map(BucketLocation::storage_key).collect());

        let notes = self.clone();
        let mut rx = self.store().subscribe();

        let handle = tokio::spawn(async move {
            loop {
                let qualifies = match rx.recv().await {
                    Ok(event) => {
                        if event.area != StorageArea::Local {
                            continue;
                        }
                        event.keys().any(|key| {
                            is_bucket_key(key)
                                && interested.as_ref().is_none_or(|set| set.contains(key))
                        })
                    }
                    // A lagged receiver missed events entirely; re-fetch
                    // rather than guess what changed.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "note subscription lagged, re-fetching");
                        true
                    }
                    Err(RecvError::Closed) => break,
                };
                if !qualifies {
                    continue;
                }

                match notes.get_notes(locations.as_deref()).await {
                    Ok(map) => {
                        debug!(result_count = map.len(), "delivering refreshed notes");
                        callback(map);
                    }
                    Err(e) => warn!(error = %e, "note re-fetch after change failed"),
                }
            }
        });

        NotesSubscription { handle }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::mpsc;

    use sidenote_core::{KeyValueStore, NoteDraft, StorageArea};

    use super::*;
    use crate::config::StoreConfig;
    use crate::memory::MemoryStore;

    fn draft(url: &str) -> NoteDraft {
        NoteDraft {
            title: "T".to_string(),
            content: "<p>C</p>".to_string(),
            url: url.to_string(),
            icon: None,
        }
    }

    async fn recv_soon(rx: &mut mpsc::UnboundedReceiver<NotesMap>) -> NotesMap {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("callback should fire")
            .expect("channel open")
    }

    async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<NotesMap>) {
        assert!(
            tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .is_err(),
            "callback fired unexpectedly"
        );
    }

    fn channel_callback() -> (impl Fn(NotesMap) + Send + Sync, mpsc::UnboundedReceiver<NotesMap>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            move |map: NotesMap| {
                let _ = tx.send(map);
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_interested_bucket_fires_exactly_once() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let (callback, mut rx) = channel_callback();
        let _sub =
            notes.subscribe_to_notes(callback, Some(vec![BucketLocation::from("a.com")]));

        let created = notes.create_note(draft("https://a.com/x")).await.unwrap();

        let delivered = recv_soon(&mut rx).await;
        assert!(delivered.contains_key(&created.id));
        assert_silent(&mut rx).await;
    }

    #[tokio::test]
    async fn test_other_bucket_does_not_fire() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let (callback, mut rx) = channel_callback();
        let _sub =
            notes.subscribe_to_notes(callback, Some(vec![BucketLocation::from("a.com")]));

        notes.create_note(draft("https://b.com/y")).await.unwrap();
        assert_silent(&mut rx).await;
    }

    #[tokio::test]
    async fn test_unfiltered_subscription_sees_any_bucket() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let (callback, mut rx) = channel_callback();
        let _sub = notes.subscribe_to_notes(callback, None);

        notes.create_note(draft("https://b.com/y")).await.unwrap();
        assert_eq!(recv_soon(&mut rx).await.len(), 1);
    }

    #[tokio::test]
    async fn test_non_bucket_keys_do_not_fire() {
        let store = Arc::new(MemoryStore::new());
        let notes = NoteStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        let (callback, mut rx) = channel_callback();
        let _sub = notes.subscribe_to_notes(callback, None);

        store
            .set(HashMap::from([("flag:welcome".to_string(), json!(true))]))
            .await
            .unwrap();
        assert_silent(&mut rx).await;
    }

    #[tokio::test]
    async fn test_session_area_does_not_fire() {
        let store = Arc::new(MemoryStore::with_config(
            StoreConfig::new().area(StorageArea::Session),
        ));
        let notes = NoteStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        let (callback, mut rx) = channel_callback();
        let _sub = notes.subscribe_to_notes(callback, None);

        notes.create_note(draft("https://a.com/x")).await.unwrap();
        assert_silent(&mut rx).await;
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let (callback, mut rx) = channel_callback();
        let sub = notes.subscribe_to_notes(callback, None);

        sub.unsubscribe();
        // Give the abort a turn to land.
        tokio::task::yield_now().await;

        notes.create_note(draft("https://a.com/x")).await.unwrap();
        assert_silent(&mut rx).await;
    }

    #[tokio::test]
    async fn test_concurrent_subscriptions_are_independent() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let (cb_a, mut rx_a) = channel_callback();
        let (cb_all, mut rx_all) = channel_callback();

        let sub_a = notes.subscribe_to_notes(cb_a, Some(vec![BucketLocation::from("a.com")]));
        let _sub_all = notes.subscribe_to_notes(cb_all, None);

        notes.create_note(draft("https://b.com/y")).await.unwrap();
        assert_eq!(recv_soon(&mut rx_all).await.len(), 1);
        assert_silent(&mut rx_a).await;

        // Dropping one subscription leaves the other live.
        sub_a.unsubscribe();
        notes.create_note(draft("https://b.com/z")).await.unwrap();
        assert_eq!(recv_soon(&mut rx_all).await.len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_subscribe_unsubscribe_does_not_leak() {
        let store = Arc::new(MemoryStore::new());
        let notes = NoteStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        for _ in 0..16 {
            let (callback, _rx) = channel_callback();
            let sub = notes.subscribe_to_notes(callback, None);
            sub.unsubscribe();
        }
        tokio::task::yield_now().await;

        // All receivers are gone; a write must not block or error.
        notes.create_note(draft("https://a.com/x")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_fires_with_refreshed_set() {
        let notes = NoteStore::new(Arc::new(MemoryStore::new()));
        let created = notes.create_note(draft("https://a.com/x")).await.unwrap();

        let (callback, mut rx) = channel_callback();
        let _sub =
            notes.subscribe_to_notes(callback, Some(vec![BucketLocation::from("a.com")]));

        notes.delete_note(&created.id).await.unwrap();
        assert!(recv_soon(&mut rx).await.is_empty());
    }
}
