//! Diagnostic path construction shared by the normalizer.
//!
//! Paths are JSON Pointers (RFC 6901) prefixed with the type they belong to,
//! e.g. `Person#/properties/pet/items`. The prefix restarts whenever the
//! normalizer descends into another named type.

use std::borrow::Cow;

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use raml2jsonschema_core::build_path;
/// assert_eq!(build_path("Person#", &["properties", "a/b"]), "Person#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

/// Root path of a named type.
pub fn type_root_path(name: &str) -> String {
    format!("{}#", name)
}

/// File name of the output document for a type. Cycle-break `$ref`s point
/// at this name, so it must stay in sync with what the writer produces.
pub fn document_file_name(name: &str) -> String {
    format!("{}.json", name)
}
