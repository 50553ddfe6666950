//! HTML sanitization for note content.
//!
//! Note content renders as live HTML in the editor and in export views, so
//! every write path must pass through [`sanitize_html`] before persisting.
//! Script-executing markup is removed; safe formatting tags survive.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;

/// Tags allowed to survive sanitization: basic rich-text formatting.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "i", "li", "ol", "p", "pre", "s", "strong", "u",
    "ul",
];

fn builder() -> Builder<'static> {
    let mut b = Builder::default();
    b.tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>());
    b.tag_attributes(HashMap::from([("a", HashSet::from(["href"]))]));
    b.url_schemes(HashSet::from(["http", "https", "mailto"]));
    b
}

/// Sanitize untrusted HTML, keeping only the formatting allowlist.
///
/// `<script>`/`<style>` elements are removed together with their content;
/// other disallowed tags are stripped while their text is kept. Event
/// handler attributes and non-http(s)/mailto link targets never survive.
pub fn sanitize_html(content: &str) -> String {
    builder().clean(content).to_string()
}

/// Reduce HTML to its text content. Tags are dropped, `<script>`/`<style>`
/// bodies are removed, and the entities the serializer emits for text nodes
/// are decoded back to characters.
pub fn strip_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let mut b = Builder::default();
    b.tags(HashSet::new());
    b.clean(html)
        .to_string()
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
