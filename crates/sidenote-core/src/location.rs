//! URL to bucket-location resolution and page-identity normalization.

use url::Url;

use crate::models::BucketLocation;

/// Resolve the storage bucket for `href`.
///
/// Total and deterministic: the hostname on success, the `*` sentinel for
/// anything unparseable or hostless. The hostname is taken as the parser
/// yields it; no additional case normalization is applied.
pub fn resolve_bucket_location(href: &str) -> BucketLocation {
    match Url::parse(href) {
        Ok(url) => match url.host_str() {
            Some(host) => BucketLocation::from(host),
            None => BucketLocation::global(),
        },
        Err(_) => BucketLocation::global(),
    }
}

/// Normalize a URL to its page identity: origin plus path, with the query
/// string, fragment, and a single trailing slash removed.
///
/// `https://x.com/a/`, `https://x.com/a?x=1`, and `https://x.com/a#y` all
/// normalize to `https://x.com/a`. Used by Page-scope filtering, not by
/// bucket resolution. Unparseable input is returned unchanged, so identity
/// comparison degrades to raw string equality.
pub fn normalize_url(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => {
            let path = url.path();
            let path = path.strip_suffix('/').unwrap_or(path);
            format!("{}{}", url.origin().ascii_serialization(), path)
        }
        Err(_) => href.to_string(),
    }
}
