//! Separator-aware path prefix tests.
//!
//! A naive `str::starts_with` would claim that `/cache1` is a prefix of
//! `/cache12/x`. The helpers here only match on directory boundaries:
//! the prefix matches exactly, or is followed by the separator.

/// Check whether `prefix` is a directory-boundary prefix of `s`.
///
/// True iff `s == prefix`, or `s` starts with `prefix` followed by
/// `sep` (a prefix already ending in `sep` also matches).
#[must_use]
pub fn has_prefix(s: &str, prefix: &str, sep: char) -> bool {
    if s == prefix {
        return true;
    }
    match s.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with(sep) || rest.starts_with(sep),
        None => false,
    }
}

/// Strip a directory-boundary `prefix` from `s`.
///
/// Returns `""` when `s == prefix`, the remainder after `prefix` and
/// its separator when the prefix matches, and `s` unchanged otherwise.
#[must_use]
pub fn trim_prefix<'a>(s: &'a str, prefix: &str, sep: char) -> &'a str {
    if s == prefix {
        return "";
    }
    match s.strip_prefix(prefix) {
        Some(rest) if prefix.ends_with(sep) => rest,
        Some(rest) => rest.strip_prefix(sep).unwrap_or(s),
        None => s,
    }
}

/// [`has_prefix`] over URI paths (`/`-separated).
#[must_use]
pub fn path_has_prefix(s: &str, prefix: &str) -> bool {
    has_prefix(s, prefix, '/')
}

/// [`trim_prefix`] over URI paths (`/`-separated).
#[must_use]
pub fn path_trim_prefix<'a>(s: &'a str, prefix: &str) -> &'a str {
    trim_prefix(s, prefix, '/')
}

/// [`has_prefix`] over OS paths (platform separator).
#[must_use]
pub fn filepath_has_prefix(s: &str, prefix: &str) -> bool {
    has_prefix(s, prefix, std::path::MAIN_SEPARATOR)
}

/// [`trim_prefix`] over OS paths (platform separator).
#[must_use]
pub fn filepath_trim_prefix<'a>(s: &'a str, prefix: &str) -> &'a str {
    trim_prefix(s, prefix, std::path::MAIN_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(path_has_prefix("/cache/S1", "/cache/S1"));
        assert_eq!(path_trim_prefix("/cache/S1", "/cache/S1"), "");
    }

    #[test]
    fn test_boundary_match() {
        assert!(path_has_prefix("/cache/S1/a/b.json", "/cache/S1"));
        assert_eq!(path_trim_prefix("/cache/S1/a/b.json", "/cache/S1"), "a/b.json");
    }

    #[test]
    fn test_partial_segment_is_not_a_prefix() {
        assert!(!path_has_prefix("/cache12/x", "/cache1"));
        assert_eq!(path_trim_prefix("/cache12/x", "/cache1"), "/cache12/x");
    }

    #[test]
    fn test_prefix_with_trailing_separator() {
        assert!(path_has_prefix("/cache/S1/a", "/cache/S1/"));
        assert_eq!(path_trim_prefix("/cache/S1/a", "/cache/S1/"), "a");
    }

    #[test]
    fn test_unrelated_paths() {
        assert!(!path_has_prefix("/other/place", "/cache"));
        assert_eq!(path_trim_prefix("/other/place", "/cache"), "/other/place");
    }

    #[test]
    fn test_custom_separator() {
        assert!(has_prefix("a.b.c", "a.b", '.'));
        assert!(!has_prefix("a.bc", "a.b", '.'));
        assert_eq!(trim_prefix("a.b.c", "a.b", '.'), "c");
    }
}
