//! JSON Pointer (RFC 6901) paths for locating values in validated documents
//! and in schema documents.
//!
//! `~` is escaped as `~0` and `/` as `~1`. The empty string is the root.

/// Appends one escaped reference token to `path`.
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Pointer to the member `key` of the object at `path`.
#[must_use]
pub fn child(path: &str, key: &str) -> String {
    let mut result: String = String::with_capacity(path.len() + key.len() + 1);
    result.push_str(path);
    push_segment(&mut result, key);
    result
}

/// Pointer to element `index` of the array at `path`.
#[must_use]
pub fn child_index(path: &str, index: usize) -> String {
    format!("{path}/{index}")
}
