//! # sidenote-query
//!
//! Consumer-facing query layer for sidenote: derives the visible note set
//! from scope, active-tab context, and free-text search over the
//! repository's output, and renders note lists for export.

pub mod export;
pub mod projection;

// Re-export core types
pub use sidenote_core::*;

pub use export::{display_title, export_file_name, notes_to_csv, FIELD_SEPARATOR};
pub use projection::{NotesView, Projection};
