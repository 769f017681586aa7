//! Required-field derivation.
//!
//! RAML flags requiredness on each property (`required: true`); draft-04 lists
//! required property names on the parent object. The per-property flag is
//! consumed here and never copied to the child.

use serde_json::{Map, Value};

use crate::error::ConvertError;

/// Required names already present on a node.
///
/// A boolean is a per-property flag meant for the parent and yields nothing.
/// An array of strings is an already-normalized list and is kept, which keeps
/// re-normalization stable.
pub(crate) fn existing_required(
    raw: Option<&Value>,
    path: &str,
) -> Result<Vec<String>, ConvertError> {
    match raw {
        None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(Vec::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    ConvertError::malformed(path, "required array must contain only strings")
                })
            })
            .collect(),
        Some(_) => Err(ConvertError::malformed(
            path,
            "required must be a boolean flag or an array of property names",
        )),
    }
}

/// Whether a raw property node is flagged `required: true`.
pub(crate) fn is_flagged_required(property: &Value) -> bool {
    property.get("required").and_then(Value::as_bool) == Some(true)
}

/// Append the names of flagged properties to `required`, in property order,
/// skipping names already listed.
pub(crate) fn derive_required(
    mut required: Vec<String>,
    properties: &Map<String, Value>,
) -> Vec<String> {
    for (name, property) in properties {
        if is_flagged_required(property) && !required.contains(name) {
            required.push(name.clone());
        }
    }
    required
}
