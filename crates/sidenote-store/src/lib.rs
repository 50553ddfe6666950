//! # sidenote-store
//!
//! Storage layer for sidenote.
//!
//! This crate provides:
//! - Key-value store backends (in-memory and JSON-file-backed) with change
//!   broadcast
//! - The note repository: bucket-scoped CRUD over the store
//! - The change-subscription broker bridging store events to note callbacks
//! - Feature-flag and one-time setup markers
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sidenote_core::NoteDraft;
//! use sidenote_store::{FileStore, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::open("notes.json").await?);
//!     let notes = NoteStore::new(store);
//!
//!     let note = notes.create_note(NoteDraft {
//!         title: "Hello".to_string(),
//!         content: "<p>world</p>".to_string(),
//!         url: "https://example.com/article".to_string(),
//!         icon: None,
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod file;
pub mod flags;
pub mod memory;
pub mod notes;
pub mod subscribe;

// Re-export core types
pub use sidenote_core::*;

pub use config::{StoreConfig, DEFAULT_EVENT_CAPACITY};
pub use file::FileStore;
pub use flags::{Flags, FLAG_PREFIX};
pub use memory::MemoryStore;
pub use notes::NoteStore;
pub use subscribe::NotesSubscription;
