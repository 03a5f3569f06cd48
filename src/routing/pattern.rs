//! Pattern and path segmentation.
//!
//! Patterns and request paths are split by the same rules so that the trie
//! compares like with like:
//! - empty segments are dropped (`/a//b` == `/a/b`)
//! - a segment starting with `*` ends the list; anything after it is ignored

/// Split a pattern (or request path) into its effective segments.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// Returns true if `path` lies under `prefix` on a `/` boundary.
///
/// `/api` matches `/api` and `/api/x` but not `/apix`. An empty prefix
/// matches everything.
pub(crate) fn has_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Boundary-aware prefix test, exposed for middleware such as RBAC.
pub fn match_prefix(path: &str, prefix: &str) -> bool {
    has_prefix(path, prefix)
}
