//! Scope/filter projection: derives the visible note set from scope,
//! active-tab context, and free-text search.
//!
//! Derivation order is fixed: bucket selection by scope, Page-scope
//! narrowing by normalized URL, text filter, then a stable sort by recency.

use tracing::debug;

use sidenote_core::{
    normalize_url, resolve_bucket_location, BucketLocation, Note, NotesMap, Result, Scope,
};
use sidenote_store::{NoteStore, NotesSubscription};

/// The query-time state a projection derives from.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Visibility mode.
    pub scope: Scope,
    /// URL of the active browser tab, when one is known.
    pub active_tab_url: Option<String>,
    /// Free-text filter; trimmed and case-folded before matching.
    pub search_query: String,
}

impl Projection {
    /// Projection for `scope` with no tab context and an empty query.
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            active_tab_url: None,
            search_query: String::new(),
        }
    }

    /// Set the active tab URL.
    pub fn with_active_tab_url(mut self, url: impl Into<String>) -> Self {
        self.active_tab_url = Some(url.into());
        self
    }

    /// Set the search query.
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Buckets this projection reads: `None` (all buckets) for Global,
    /// the active tab's single bucket for Page and Domain.
    pub fn locations(&self) -> Option<Vec<BucketLocation>> {
        match self.scope {
            Scope::Global => None,
            Scope::Page | Scope::Domain => Some(vec![resolve_bucket_location(
                self.active_tab_url.as_deref().unwrap_or(""),
            )]),
        }
    }

    /// Apply narrowing, text filter, and ordering to a fetched collection.
    ///
    /// Page scope keeps only notes whose normalized URL equals the active
    /// tab's; Domain and Global skip that narrowing. A non-empty query
    /// keeps notes whose title or content contains it case-insensitively.
    /// Output is ordered by descending `updated_at`; ties keep the map's
    /// iteration order (the sort is stable).
    pub fn apply(&self, notes: &NotesMap) -> Vec<Note> {
        let page_identity = (self.scope == Scope::Page)
            .then(|| normalize_url(self.active_tab_url.as_deref().unwrap_or("")));
        let query = self.search_query.trim().to_lowercase();

        let mut visible: Vec<Note> = notes
            .values()
            .filter(|note| match &page_identity {
                Some(identity) => normalize_url(&note.url) == *identity,
                None => true,
            })
            .filter(|note| {
                query.is_empty()
                    || note.title.to_lowercase().contains(&query)
                    || note.content.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        debug!(
            result_count = visible.len(),
            scope = ?self.scope,
            "projected notes"
        );
        visible
    }
}

/// A projection bound to a repository.
///
/// `current` recomputes on every call, so mutating the scope, tab URL, or
/// query takes effect on the next read. `watch` snapshots the projection at
/// subscription time — after changing scope or tab URL, drop the old
/// subscription and `watch` again, exactly as the UI re-subscribes when its
/// inputs change.
pub struct NotesView {
    notes: NoteStore,
    projection: Projection,
}

impl NotesView {
    pub fn new(notes: NoteStore, scope: Scope) -> Self {
        Self {
            notes,
            projection: Projection::new(scope),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.projection.scope = scope;
    }

    pub fn set_active_tab_url(&mut self, url: Option<String>) {
        self.projection.active_tab_url = url;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.projection.search_query = query.into();
    }

    /// Fetch and project the currently visible notes.
    pub async fn current(&self) -> Result<Vec<Note>> {
        let locations = self.projection.locations();
        let notes = self.notes.get_notes(locations.as_deref()).await?;
        Ok(self.projection.apply(&notes))
    }

    /// Deliver the projected note list on every qualifying store change.
    pub fn watch<F>(&self, callback: F) -> NotesSubscription
    where
        F: Fn(Vec<Note>) + Send + Sync + 'static,
    {
        let projection = self.projection.clone();
        let locations = projection.locations();
        self.notes
            .subscribe_to_notes(move |map| callback(projection.apply(&map)), locations)
    }
}
