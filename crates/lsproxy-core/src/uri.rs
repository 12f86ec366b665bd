//! Document URI translation between client and server viewpoints.
//!
//! The client addresses documents with paths rooted at `/` (the root of
//! its project); the wrapped language server sees the same documents
//! inside the session's workspace cache directory. Both directions are
//! pure functions of `(uri, cache_dir)`.
//!
//! Only empty-scheme and `file` URIs are translated. Everything else
//! (in-memory buffer schemes and the like) passes through untouched, as
//! does anything that fails to parse: a malformed URI is logged and
//! returned as-is rather than aborting the whole message.

use std::path::Path;

use url::Url;

use crate::paths::{path_has_prefix, path_trim_prefix};

/// Translate a client-side document URI to its server-side equivalent.
///
/// The client's path is always treated as relative to `/`, so the
/// translation joins the session cache directory (converted to URI path
/// separators) with it. Bare paths carry an implicit `file` scheme and
/// stay bare.
#[must_use]
pub fn to_server_uri(uri: &str, cache_dir: &Path) -> String {
    let cache = uri_cache_path(cache_dir);

    match Url::parse(uri) {
        Ok(mut parsed) => {
            if !is_file_url(&parsed) {
                return uri.to_owned();
            }
            let joined = join_rooted(&cache, parsed.path());
            parsed.set_path(&joined);
            parsed.to_string()
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Bare path: implicit file scheme.
            if uri.is_empty() {
                return uri.to_owned();
            }
            join_rooted(&cache, uri)
        }
        Err(err) => {
            tracing::warn!(uri, error = %err, "to_server_uri: unparseable uri, passing through");
            uri.to_owned()
        }
    }
}

/// Translate a server-side document URI back to the client's viewpoint.
///
/// Only URIs whose path lies inside the cache directory are rewritten
/// (directory-boundary prefix match, never a naive string prefix); the
/// cache segment is stripped and the remainder re-rooted at `/`. URIs
/// the server never touched are assumed to already be client-relative
/// and are returned unchanged.
#[must_use]
pub fn to_client_uri(uri: &str, cache_dir: &Path) -> String {
    let cache = uri_cache_path(cache_dir);

    match Url::parse(uri) {
        Ok(mut parsed) => {
            if !is_file_url(&parsed) {
                return uri.to_owned();
            }
            if path_has_prefix(parsed.path(), &cache) {
                let rest = path_trim_prefix(parsed.path(), &cache).to_owned();
                parsed.set_path(&format!("/{}", rest.trim_start_matches('/')));
            }
            parsed.to_string()
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if uri.is_empty() {
                return uri.to_owned();
            }
            if path_has_prefix(uri, &cache) {
                let rest = path_trim_prefix(uri, &cache);
                format!("/{}", rest.trim_start_matches('/'))
            } else {
                uri.to_owned()
            }
        }
        Err(err) => {
            tracing::warn!(uri, error = %err, "to_client_uri: unparseable uri, passing through");
            uri.to_owned()
        }
    }
}

/// Translatable URIs are `file`-scheme with a non-empty path.
fn is_file_url(candidate: &Url) -> bool {
    candidate.scheme() == "file" && !candidate.path().is_empty()
}

/// The cache directory as a URI path (`/`-separated).
fn uri_cache_path(cache_dir: &Path) -> String {
    let raw = cache_dir.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Join a `/`-rooted path onto a base path, collapsing the boundary.
fn join_rooted(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = path.trim_start_matches('/');
    if rel.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{rel}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn cache() -> PathBuf {
        PathBuf::from("/cache/S1")
    }

    #[test]
    fn test_to_server_file_uri() {
        assert_eq!(
            to_server_uri("file:///a/b.json", &cache()),
            "file:///cache/S1/a/b.json"
        );
    }

    #[test]
    fn test_to_client_file_uri() {
        assert_eq!(
            to_client_uri("file:///cache/S1/a/b.json", &cache()),
            "file:///a/b.json"
        );
    }

    #[test]
    fn test_round_trip_client_identifier() {
        let original = "file:///src/lib.rs";
        let server = to_server_uri(original, &cache());
        assert_eq!(to_client_uri(&server, &cache()), original);
    }

    #[test]
    fn test_round_trip_server_identifier() {
        let original = "file:///cache/S1/src/main.rs";
        let client = to_client_uri(original, &cache());
        assert_eq!(to_server_uri(&client, &cache()), original);
    }

    #[test]
    fn test_non_file_scheme_passes_through() {
        assert_eq!(
            to_server_uri("untitled:Untitled-1", &cache()),
            "untitled:Untitled-1"
        );
        assert_eq!(
            to_client_uri("untitled:Untitled-1", &cache()),
            "untitled:Untitled-1"
        );
        assert_eq!(
            to_server_uri("https://example.com/a", &cache()),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_bare_path_stays_bare() {
        assert_eq!(to_server_uri("/a/b.rs", &cache()), "/cache/S1/a/b.rs");
        assert_eq!(to_client_uri("/cache/S1/a/b.rs", &cache()), "/a/b.rs");
    }

    #[test]
    fn test_empty_uri_passes_through() {
        assert_eq!(to_server_uri("", &cache()), "");
        assert_eq!(to_client_uri("", &cache()), "");
    }

    #[test]
    fn test_unparseable_uri_passes_through() {
        // Spaces are not valid in a host, so parsing fails and the
        // original value survives untouched.
        let bad = "http://exa mple.com/a";
        assert_eq!(to_server_uri(bad, &cache()), bad);
        assert_eq!(to_client_uri(bad, &cache()), bad);
    }

    #[test]
    fn test_to_client_outside_cache_is_unchanged() {
        assert_eq!(
            to_client_uri("file:///somewhere/else.rs", &cache()),
            "file:///somewhere/else.rs"
        );
    }

    #[test]
    fn test_to_client_respects_directory_boundary() {
        let cache = PathBuf::from("/cache1");
        assert_eq!(to_client_uri("/cache12/x", &cache), "/cache12/x");
        assert_eq!(to_client_uri("/cache1/x", &cache), "/x");
    }

    #[test]
    fn test_root_uri_maps_to_cache_dir() {
        assert_eq!(to_server_uri("file:///", &cache()), "file:///cache/S1");
        assert_eq!(to_client_uri("file:///cache/S1", &cache()), "file:///");
    }
}
