//! # sidenote-core
//!
//! Core types, traits, and abstractions for the sidenote engine.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the storage and query crates depend on: the note data
//! model, bucket-location resolution, HTML sanitization, store change
//! events, and the key-value store abstraction.

pub mod error;
pub mod events;
pub mod location;
pub mod logging;
pub mod messages;
pub mod models;
pub mod sanitize;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{KeyChange, StorageArea, StoreEvent};
pub use location::{normalize_url, resolve_bucket_location};
pub use messages::AppMessage;
pub use models::{
    is_bucket_key, BucketLocation, Note, NoteDraft, NoteId, NotePatch, NotesMap, Scope,
    GLOBAL_LOCATION, STORAGE_PREFIX_DOMAIN,
};
pub use sanitize::{sanitize_html, strip_tags};
pub use traits::KeyValueStore;
