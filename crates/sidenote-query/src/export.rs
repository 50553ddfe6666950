//! CSV export of note lists.
//!
//! Tab-separated to survive content full of commas; cells are quoted per
//! RFC 4180 when they contain the separator, quotes, or line breaks.
//! Content is reduced to plain text before export.

use chrono::{DateTime, Utc};

use sidenote_core::{strip_tags, Note};

/// Field separator used between CSV cells.
pub const FIELD_SEPARATOR: char = '\t';

const HEADERS: [&str; 5] = ["Title", "Content", "URL", "Created At", "Updated At"];

fn format_timestamp(ms: i64, fmt: &str) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}

/// Title shown for a note in exports and lists: the trimmed title, or a
/// timestamp-derived fallback when the user never set one.
pub fn display_title(note: &Note) -> String {
    let title = note.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    format!(
        "Note from {}",
        format_timestamp(note.updated_at, "%Y-%m-%d %H:%M")
    )
}

/// Quote a cell when it contains the separator, a quote, or a line break;
/// embedded quotes are doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains(['"', FIELD_SEPARATOR, '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Render `notes` as tab-separated CSV, header row first.
pub fn notes_to_csv(notes: &[Note]) -> String {
    let mut lines = Vec::with_capacity(notes.len() + 1);
    lines.push(
        HEADERS
            .map(escape_cell)
            .join(&FIELD_SEPARATOR.to_string()),
    );

    for note in notes {
        let row = [
            display_title(note),
            strip_tags(&note.content),
            note.url.clone(),
            format_timestamp(note.created_at, "%Y-%m-%d %H:%M:%S"),
            format_timestamp(note.updated_at, "%Y-%m-%d %H:%M:%S"),
        ];
        lines.push(
            row.map(|cell| escape_cell(&cell))
                .join(&FIELD_SEPARATOR.to_string()),
        );
    }

    lines.join("\n")
}

/// Suggested file name for an export produced now.
pub fn export_file_name() -> String {
    format!("sidenote_notes_{}.csv", Utc::now().format("%Y-%m-%d"))
}
