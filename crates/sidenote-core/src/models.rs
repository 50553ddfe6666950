//! Core data model for sidenote.
//!
//! Notes are persisted as keyed collections ("buckets") in a flat key-value
//! namespace. Each bucket holds every note attached to one resolved location
//! (a hostname, or the `*` sentinel for URLs with no resolvable host) and is
//! stored as a single JSON object under the key `notes_domain:<location>`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key prefix for domain-scoped note buckets. Keys outside this prefix
/// (feature flags, setup markers) share the namespace but are not buckets.
pub const STORAGE_PREFIX_DOMAIN: &str = "notes_domain";

/// Sentinel location used when a URL cannot be resolved to a hostname.
pub const GLOBAL_LOCATION: &str = "*";

// =============================================================================
// BUCKET LOCATION
// =============================================================================

/// Identifies the bucket a note belongs to: the hostname of the URL the note
/// was created against, or [`GLOBAL_LOCATION`] when no host was resolvable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketLocation(String);

impl BucketLocation {
    /// The sentinel location for unresolvable URLs and global notes.
    pub fn global() -> Self {
        Self(GLOBAL_LOCATION.to_string())
    }

    /// Whether this is the sentinel location.
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_LOCATION
    }

    /// The storage key this bucket persists under.
    pub fn storage_key(&self) -> String {
        format!("{}:{}", STORAGE_PREFIX_DOMAIN, self.0)
    }

    /// Recover a location from a bucket storage key. Returns `None` for keys
    /// outside the bucket namespace.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(STORAGE_PREFIX_DOMAIN)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(Self::from)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BucketLocation {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BucketLocation {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BucketLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a raw storage key addresses a note bucket.
pub fn is_bucket_key(key: &str) -> bool {
    key.strip_prefix(STORAGE_PREFIX_DOMAIN)
        .is_some_and(|rest| rest.starts_with(':'))
}

// =============================================================================
// NOTE IDENTIFIER
// =============================================================================

/// Globally unique note identifier of the form `<bucketLocation>:<uuid>`.
///
/// The bucket location is always recoverable by splitting on the first `:`,
/// which lets the repository find a note's bucket from its id alone without
/// a separate index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a fresh identifier scoped to `location`.
    pub fn generate(location: &BucketLocation) -> Self {
        Self(format!("{}:{}", location, Uuid::new_v4()))
    }

    /// The bucket this id belongs to: everything before the first `:`
    /// (the whole id when no separator is present).
    pub fn bucket(&self) -> BucketLocation {
        BucketLocation::from(self.0.split(':').next().unwrap_or(""))
    }

    /// The storage key of the bucket this id belongs to.
    pub fn storage_key(&self) -> String {
        self.bucket().storage_key()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A single note.
///
/// Persisted field names are camelCase: buckets written by earlier releases
/// of the product must deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Immutable identifier, bucket-prefixed.
    pub id: NoteId,
    /// User-supplied title; may be empty.
    pub title: String,
    /// Sanitized HTML body. Every write path sanitizes before persisting.
    pub content: String,
    /// The page URL the note was created against.
    pub url: String,
    /// Favicon URL of that page, if one was captured.
    pub icon: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Last modification time, epoch milliseconds. Never less than `created_at`.
    pub updated_at: i64,
}

/// A bucket's content and the merged result of multi-bucket reads: note id
/// to note, unique keys, deterministic (id-ordered) iteration.
pub type NotesMap = BTreeMap<NoteId, Note>;

/// Input for creating a note. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub url: String,
    pub icon: Option<String>,
}

/// Partial update for an existing note. `None` fields are left untouched;
/// `icon` uses a nested `Option` so it can be explicitly cleared.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub icon: Option<Option<String>>,
}

impl NotePatch {
    /// Patch that replaces only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces only the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

// =============================================================================
// SCOPE
// =============================================================================

/// Query-time visibility mode. Never stored on a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Notes whose normalized URL matches the active tab's page.
    Page,
    /// Every note in the active tab's bucket.
    Domain,
    /// Every note across all buckets.
    Global,
}
