//! Structured logging field name constants for sidenote.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log output can be queried by the same names across every subsystem.

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "store", "notes", "subscribe", "query"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "get_notes", "create_note", "set", "project"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note identifier being operated on.
pub const NOTE_ID: &str = "note_id";

/// Bucket location being read or written.
pub const BUCKET: &str = "bucket";

/// Raw storage key affected.
pub const STORE_KEY: &str = "store_key";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of notes returned by a read or projection.
pub const RESULT_COUNT: &str = "result_count";

/// Number of keys written in a store batch.
pub const KEY_COUNT: &str = "key_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    /// Log aggregation queries key on these names; renaming one is a
    /// breaking change to dashboards, so the schema is pinned here.
    #[test]
    fn test_field_names_are_stable_and_unique() {
        let fields = [
            SUBSYSTEM,
            OPERATION,
            NOTE_ID,
            BUCKET,
            STORE_KEY,
            RESULT_COUNT,
            KEY_COUNT,
            ERROR_MSG,
        ];
        let unique: std::collections::HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
        for field in fields {
            assert!(field
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
