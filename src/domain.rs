/// Lookup key derivation for the extension popup
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scheme prefixes removed from the start of a tab URL. Matching is anchored,
/// so `https://` can never be truncated by the `http://` entry.
const SCHEME_PREFIXES: [&str; 3] = ["file://", "http://", "https://"];

const FILE_SCHEME: &str = "file://";

/// The bare host a tab URL is reduced to before querying the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduce a tab URL to its lookup key
///
/// Algorithm:
/// 1. Strip at most one leading scheme (`file://`, `http://`, `https://`)
/// 2. Keep everything before the first `/`, `?` or `#`
///
/// `file://` URLs have no host, so their key is the whole path: only `?` and
/// `#` end it. Case and trailing dots are preserved.
///
/// Examples:
/// - https://example.com/login?x=1 → example.com
/// - http://a.b.com#frag → a.b.com
/// - file:///c:/x → /c:/x
///
/// Never fails: any input, including the empty string, yields a key.
pub fn normalize_url(raw_url: &str) -> LookupKey {
    let (rest, is_file) = strip_scheme(raw_url);

    let end = if is_file {
        rest.find(['?', '#'])
    } else {
        rest.find(['/', '?', '#'])
    };

    let key = match end {
        Some(index) => &rest[..index],
        None => rest,
    };

    LookupKey(key.to_string())
}

/// Remove the first matching scheme prefix, reporting whether it was `file://`
fn strip_scheme(url: &str) -> (&str, bool) {
    SCHEME_PREFIXES
        .iter()
        .find_map(|prefix| {
            url.strip_prefix(prefix)
                .map(|rest| (rest, *prefix == FILE_SCHEME))
        })
        .unwrap_or((url, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(url: &str) -> String {
        normalize_url(url).into_inner()
    }

    #[test]
    fn test_normalize_strips_scheme_and_path() {
        assert_eq!(key("https://example.com/login?x=1"), "example.com");
        assert_eq!(key("http://example.com/"), "example.com");
        assert_eq!(key("https://github.com/rust-lang/rust"), "github.com");
    }

    #[test]
    fn test_normalize_fragment_and_query() {
        assert_eq!(key("http://a.b.com#frag"), "a.b.com");
        assert_eq!(key("https://a.b.com?q=1#frag"), "a.b.com");
        assert_eq!(key("a.b.com#frag/x"), "a.b.com");
    }

    #[test]
    fn test_normalize_file_url_keeps_path() {
        assert_eq!(key("file:///c:/x"), "/c:/x");
        assert_eq!(key("file:///home/me/page.html#top"), "/home/me/page.html");
    }

    #[test]
    fn test_normalize_https_not_truncated_by_http() {
        assert_eq!(key("https://secure.example.org"), "secure.example.org");
    }

    #[test]
    fn test_normalize_scheme_only_stripped_at_start() {
        assert_eq!(key("example.com/redirect?to=https://other.com"), "example.com");
        assert_eq!(key("ftp://example.com/file"), "ftp:");
    }

    #[test]
    fn test_normalize_only_one_scheme_removed() {
        assert_eq!(key("http://https://example.com"), "https:");
    }

    #[test]
    fn test_normalize_preserves_case_and_port() {
        assert_eq!(key("https://Example.COM./Login"), "Example.COM.");
        assert_eq!(key("http://localhost:3625/logins/"), "localhost:3625");
    }

    #[test]
    fn test_normalize_edge_cases() {
        assert_eq!(key(""), "");
        assert_eq!(key("https://"), "");
        assert_eq!(key("not-a-url"), "not-a-url");
        assert_eq!(key("/"), "");
        assert!(normalize_url("").is_empty());
    }

    #[test]
    fn test_normalize_is_stable_on_bare_domains() {
        for url in [
            "https://example.com/login?x=1",
            "http://a.b.com#frag",
            "https://news.bbc.co.uk/article",
            "localhost:3000",
            "",
        ] {
            let once = key(url);
            assert_eq!(key(&once), once, "not stable for {url}");
        }
    }

    #[test]
    fn test_lookup_key_display() {
        let key = normalize_url("https://example.com/a");
        assert_eq!(key.to_string(), "example.com");
        assert_eq!(key.as_str(), "example.com");
    }
}
