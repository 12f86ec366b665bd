//! Structural walker over decoded protocol payloads.
//!
//! Protocol messages carry document URIs at wildly different depths and
//! under different shapes (a `Location`, a `TextDocumentIdentifier`, the
//! `initialize` request's `rootUri`, a workspace edit's `changes` map,
//! ...). Rather than enumerate every message kind, the walker traverses
//! the decoded [`serde_json::Value`] tree and matches the handful of
//! conventions under which URIs appear. `Value` is already a closed
//! tagged tree, so the dispatch is an exhaustive match: objects are
//! mappings (decoded records included), arrays are sequences, and every
//! other variant is an opaque scalar.
//!
//! The walker never fails. Unrecognized shapes are skipped silently so
//! that unknown message kinds are forwarded unmodified instead of
//! rejected.

use serde_json::Value;

/// Field names whose string values carry a document URI.
///
/// `uri`, `url`, and the `initialize` specials `rootUri`/`rootPath` are
/// the mapping conventions; `URI` is the conventional field name of
/// record-shaped values, which serialize their field names verbatim.
const URI_FIELDS: [&str; 5] = ["uri", "rootUri", "rootPath", "url", "URI"];

/// The one shape whose *keys* are URIs rather than its values: a
/// workspace edit's changes-by-document map.
const CHANGES_KEY: &str = "changes";

/// Rewrite every document URI in `payload` in place with `rewrite`.
///
/// Traversal is depth-first; sequence order is preserved, sibling order
/// within mappings is unspecified. In a `changes`-style map each key is
/// removed and its value re-inserted under the rewritten key; if two
/// distinct source keys rewrite to the same key (only possible when the
/// sources already aliased) the last one wins, which is a caller error,
/// not something the walker resolves.
pub fn rewrite_uris<F>(payload: &mut Value, mut rewrite: F)
where
    F: FnMut(&str) -> String,
{
    walk_mut(payload, None, &mut rewrite);
}

/// Locate every document URI in `payload` without mutating it.
///
/// The read-only counterpart of [`rewrite_uris`]; visits the same set
/// of identifiers, including the keys of `changes`-style maps.
#[must_use]
pub fn collect_uris(payload: &Value) -> Vec<String> {
    let mut found = Vec::new();
    walk_ref(payload, None, &mut found);
    found
}

fn walk_mut<F>(value: &mut Value, parent: Option<&str>, rewrite: &mut F)
where
    F: FnMut(&str) -> String,
{
    match value {
        Value::Object(map) => {
            if parent == Some(CHANGES_KEY) {
                let entries = std::mem::take(map);
                for (key, val) in entries {
                    map.insert(rewrite(&key), val);
                }
            }
            for (key, child) in map.iter_mut() {
                if URI_FIELDS.contains(&key.as_str()) {
                    if let Value::String(s) = child {
                        *s = rewrite(s);
                        continue;
                    }
                }
                walk_mut(child, Some(key.as_str()), rewrite);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                walk_mut(child, None, rewrite);
            }
        }
        // Scalars are opaque: numbers, booleans, null, and strings not
        // reached under a recognized field name.
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn walk_ref(value: &Value, parent: Option<&str>, found: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if parent == Some(CHANGES_KEY) {
                    found.push(key.clone());
                }
                if URI_FIELDS.contains(&key.as_str()) {
                    if let Value::String(s) = child {
                        found.push(s.clone());
                        continue;
                    }
                }
                walk_ref(child, Some(key.as_str()), found);
            }
        }
        Value::Array(items) => {
            for child in items {
                walk_ref(child, None, found);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}
