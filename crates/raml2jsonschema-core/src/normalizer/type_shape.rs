//! Type-shape rewriting: RAML type expressions → JSON Schema `type` forms.
//!
//! Handles three notations:
//!
//! 1. Candidate arrays (`type: [Foo, Bar]`): only the first candidate is kept.
//! 2. Array suffix (`Foo[]`): becomes `type: array` with an element type.
//! 3. Unions (`A | B`): become the multi-type array form `["A", "B"]`.
//!
//! `|` binds looser than `[]`, so `string | Person[]` is a union whose second
//! member is an array. Union members are not rewritten further: array members
//! and arrays of unions (`(A | B)[]`) keep their written form.

use serde_json::Value;

use crate::error::ConvertError;

/// Classified form of a RAML type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeShape {
    /// A single type name, primitive or user-defined.
    Named(String),
    /// `Elem[]`; carries the element expression.
    ArrayOf(String),
    /// `A | B | ...`, whitespace stripped.
    Union(Vec<String>),
}

/// Read the working type string of a raw node.
///
/// Returns `None` when the node has no `type`.
pub(crate) fn read_type(raw: Option<&Value>, path: &str) -> Result<Option<String>, ConvertError> {
    let type_str = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Array(candidates)) => match candidates.first() {
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(ConvertError::malformed(
                    path,
                    format!("type candidate must be a string, found {}", value_kind(other)),
                ))
            }
            None => return Err(ConvertError::malformed(path, "type array is empty")),
        },
        Some(other) => {
            return Err(ConvertError::malformed(
                path,
                format!(
                    "type must be a string or an array of strings, found {}",
                    value_kind(other)
                ),
            ))
        }
    };

    let type_str = type_str.trim();
    if type_str.is_empty() {
        return Err(ConvertError::malformed(path, "type is empty"));
    }
    Ok(Some(type_str.to_string()))
}

/// Classify a (trimmed, non-empty) type expression found at `path`.
pub(crate) fn classify(type_str: &str, path: &str) -> Result<TypeShape, ConvertError> {
    let members = split_top_level_union(type_str);
    if members.len() > 1 {
        let members: Vec<String> = members
            .into_iter()
            .map(|member| member.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        if members.iter().any(String::is_empty) {
            return Err(ConvertError::malformed(
                path,
                format!("union `{type_str}` has an empty member"),
            ));
        }
        return Ok(TypeShape::Union(members));
    }

    if let Some(element) = type_str.strip_suffix("[]") {
        return Ok(TypeShape::ArrayOf(strip_group(element.trim()).to_string()));
    }

    Ok(TypeShape::Named(type_str.to_string()))
}

/// Whether a union member uses the `Foo[]` array notation, which has no
/// draft-04 multi-type equivalent.
pub(crate) fn is_array_expression(member: &str) -> bool {
    member.ends_with("[]")
}

/// Whether an element expression is a union, i.e. the unsupported
/// array-of-union form.
pub(crate) fn is_union_expression(expr: &str) -> bool {
    expr.contains('|')
}

/// Split on `|` occurring outside parentheses.
fn split_top_level_union(expr: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in expr.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                members.push(&expr[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    members.push(&expr[start..]);
    members
}

/// `(Foo)` → `Foo`. Grouped unions keep their parentheses so the caller can
/// recognise them.
fn strip_group(expr: &str) -> &str {
    match expr.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) if !is_union_expression(inner) => inner.trim(),
        _ => expr,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn read(raw: Value) -> Result<Option<String>, ConvertError> {
        read_type(Some(&raw), "T#")
    }

    fn shape(type_str: &str) -> TypeShape {
        classify(type_str, "T#").unwrap()
    }

    #[test]
    fn test_read_type_string_and_candidates() {
        assert_eq!(read(json!("string")).unwrap(), Some("string".to_string()));
        assert_eq!(read(json!(["Person"])).unwrap(), Some("Person".to_string()));
        // Extra candidates are dropped.
        assert_eq!(
            read(json!(["Person", "Animal"])).unwrap(),
            Some("Person".to_string())
        );
        assert_eq!(read_type(None, "T#").unwrap(), None);
        assert_eq!(read(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_read_type_malformed() {
        for raw in [json!(42), json!([]), json!([1]), json!({ "a": 1 }), json!("  ")] {
            match read(raw.clone()) {
                Err(ConvertError::MalformedTypeNode { path, .. }) => assert_eq!(path, "T#"),
                other => panic!("expected MalformedTypeNode for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_named() {
        assert_eq!(shape("string"), TypeShape::Named("string".to_string()));
    }

    #[test]
    fn test_classify_array_suffix() {
        assert_eq!(shape("Foo[]"), TypeShape::ArrayOf("Foo".to_string()));
        // Only one suffix is consumed; the element is rewritten again later.
        assert_eq!(
            shape("string[][]"),
            TypeShape::ArrayOf("string[]".to_string())
        );
        assert_eq!(shape("(Foo)[]"), TypeShape::ArrayOf("Foo".to_string()));
    }

    #[test]
    fn test_classify_union_strips_whitespace() {
        assert_eq!(
            shape("string | number"),
            TypeShape::Union(vec!["string".to_string(), "number".to_string()])
        );
        assert_eq!(
            shape("A|B |  C"),
            TypeShape::Union(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_union_binds_looser_than_array_suffix() {
        let classified = shape("string | Person[]");
        assert_eq!(
            classified,
            TypeShape::Union(vec!["string".to_string(), "Person[]".to_string()])
        );
        if let TypeShape::Union(members) = classified {
            assert!(!is_array_expression(&members[0]));
            assert!(is_array_expression(&members[1]));
        }
    }

    #[test]
    fn test_union_with_empty_member_is_malformed() {
        for type_str in ["A | ", "| A", "A || B"] {
            match classify(type_str, "T#/properties/p") {
                Err(ConvertError::MalformedTypeNode { path, message }) => {
                    assert_eq!(path, "T#/properties/p");
                    assert!(message.contains("empty member"), "got: {message}");
                }
                other => panic!("expected MalformedTypeNode for {type_str:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_array_of_union_keeps_group() {
        let classified = shape("(string | Person)[]");
        assert_eq!(classified, TypeShape::ArrayOf("(string | Person)".to_string()));
        if let TypeShape::ArrayOf(element) = classified {
            assert!(is_union_expression(&element));
        }
    }
}
