//! Runtime message types exchanged between the extension surfaces.
//!
//! Messages are a tagged union discriminated by an explicit `type` field.
//! Deserialization is the validation: unknown tags or missing fields fail
//! instead of being probed property by property.

use serde::{Deserialize, Serialize};

/// A message between the side panel and the background worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppMessage {
    /// Ask the background worker to open `url` in a new tab.
    #[serde(rename = "OPEN_URL")]
    OpenUrl { url: String },
}

impl AppMessage {
    /// Parse a raw JSON payload into a message, if it is one.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
