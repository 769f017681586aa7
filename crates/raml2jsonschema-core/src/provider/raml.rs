//! RAML 1.0 documents as a type graph source.
//!
//! Reads the `types` (and deprecated `schemas`) section of a RAML document and
//! expands each declaration into the serialized form a RAML parser emits:
//!
//! - `type` always becomes a one-element array (`schema` is a synonym),
//! - missing `type` defaults to `object` (with `properties`), `array` (with
//!   `items`) or `string`,
//! - every declaration and property gets `name` and `displayName`,
//! - every property gets a boolean `required`: `key?` is optional, an explicit
//!   `required:` wins, otherwise the property is required.
//!
//! `!include` and other tags, and `uses:` libraries, are rejected.

use serde_json::{json, Map, Value};
use serde_yaml::Value as YamlValue;

use super::TypeGraphProvider;
use crate::error::LoadError;
use crate::type_graph::{TypeGraph, TypeNode};

const RAML_HEADER: &str = "#%RAML 1.0";

/// Sections holding type declarations, in lookup order.
const TYPE_SECTIONS: &[&str] = &["types", "schemas"];

/// A parsed RAML 1.0 document.
#[derive(Debug, Clone)]
pub struct RamlDocument {
    root: serde_yaml::Mapping,
}

impl RamlDocument {
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        let header = source.lines().next().unwrap_or_default().trim();
        if !header.starts_with(RAML_HEADER) {
            return Err(parse_error(format!(
                "expected a `{RAML_HEADER}` header line, found `{header}`"
            )));
        }

        let root = match serde_yaml::from_str::<YamlValue>(source)? {
            YamlValue::Mapping(root) => root,
            YamlValue::Null => serde_yaml::Mapping::new(),
            _ => return Err(parse_error("document root must be a mapping")),
        };

        if root.contains_key("uses") {
            return Err(parse_error("`uses` libraries are not supported"));
        }

        Ok(Self { root })
    }
}

impl TypeGraphProvider for RamlDocument {
    fn type_graph(&self) -> Result<TypeGraph, LoadError> {
        let mut graph = TypeGraph::new();

        for section in TYPE_SECTIONS {
            let declarations = match self.root.get(*section) {
                None | Some(YamlValue::Null) => continue,
                Some(YamlValue::Mapping(declarations)) => declarations,
                Some(_) => return Err(parse_error(format!("`{section}` must be a mapping"))),
            };

            for (key, declaration) in declarations {
                let name = key_to_string(key, section)?;
                let path = format!("{section}/{name}");
                if graph.contains(&name) {
                    return Err(parse_error(format!("duplicate type declaration `{path}`")));
                }
                let tree = expand_declaration(Some(&name), declaration, &path)?;
                tracing::debug!(type_name = %name, "loaded RAML type declaration");
                graph.insert(TypeNode::new(name, tree));
            }
        }

        Ok(graph)
    }
}

/// Expand one type declaration (top-level, property or items) into its
/// serialized form.
fn expand_declaration(
    name: Option<&str>,
    declaration: &YamlValue,
    path: &str,
) -> Result<Value, LoadError> {
    let mut out = Map::new();
    if let Some(name) = name {
        out.insert("name".to_string(), json!(name));
    }

    match declaration {
        // `Email: string`, `Tags: string[]`, `Id: string | number`
        YamlValue::String(expr) => {
            out.insert("type".to_string(), json!([expr]));
        }
        // `nickname?:` declares a string.
        YamlValue::Null => {
            out.insert("type".to_string(), json!(["string"]));
        }
        YamlValue::Mapping(facets) => expand_facets(facets, path, &mut out)?,
        YamlValue::Tagged(tagged) => {
            return Err(parse_error(format!(
                "`{}` at {path} is not supported",
                tagged.tag
            )))
        }
        _ => {
            return Err(parse_error(format!(
                "type declaration at {path} must be a type expression or a mapping"
            )))
        }
    }

    if let Some(name) = name {
        if !out.contains_key("displayName") {
            out.insert("displayName".to_string(), json!(name));
        }
    }

    Ok(Value::Object(out))
}

fn expand_facets(
    facets: &serde_yaml::Mapping,
    path: &str,
    out: &mut Map<String, Value>,
) -> Result<(), LoadError> {
    for (key, value) in facets {
        let key = key_to_string(key, path)?;
        let facet_path = format!("{path}/{key}");
        match key.as_str() {
            "type" | "schema" => expand_type_facet(value, &facet_path, out)?,
            "properties" => {
                out.insert("properties".to_string(), expand_properties(value, &facet_path)?);
            }
            "items" => {
                let items = match value {
                    YamlValue::String(expr) => json!([expr]),
                    YamlValue::Mapping(_) => expand_declaration(None, value, &facet_path)?,
                    other => yaml_to_json(other, &facet_path)?,
                };
                out.insert("items".to_string(), items);
            }
            _ => {
                out.insert(key, yaml_to_json(value, &facet_path)?);
            }
        }
    }

    if !out.contains_key("type") {
        let default_type = if out.contains_key("properties") {
            "object"
        } else if out.contains_key("items") {
            "array"
        } else {
            "string"
        };
        out.insert("type".to_string(), json!([default_type]));
    }

    Ok(())
}

fn expand_type_facet(
    value: &YamlValue,
    path: &str,
    out: &mut Map<String, Value>,
) -> Result<(), LoadError> {
    match value {
        YamlValue::String(expr) => {
            out.insert("type".to_string(), json!([expr]));
        }
        // Inline declaration: `type: { type: object, properties: ... }`.
        // Its facets are merged under the outer ones.
        YamlValue::Mapping(_) => {
            if let Value::Object(inner) = expand_declaration(None, value, path)? {
                for (key, inner_value) in inner {
                    out.entry(key).or_insert(inner_value);
                }
            }
        }
        other => {
            out.insert("type".to_string(), yaml_to_json(other, path)?);
        }
    }
    Ok(())
}

fn expand_properties(value: &YamlValue, path: &str) -> Result<Value, LoadError> {
    let YamlValue::Mapping(properties) = value else {
        return Err(parse_error(format!("{path} must be a mapping")));
    };

    let mut out = Map::new();
    for (key, declaration) in properties {
        let key = key_to_string(key, path)?;
        let (name, optional) = match key.strip_suffix('?') {
            Some(stripped) => (stripped.to_string(), true),
            None => (key.clone(), false),
        };
        let property_path = format!("{path}/{key}");

        let mut expanded = expand_declaration(Some(&name), declaration, &property_path)?;
        if let Value::Object(facets) = &mut expanded {
            // An explicit `required:` overrides the `?` marker.
            if !facets.get("required").is_some_and(Value::is_boolean) {
                facets.insert("required".to_string(), json!(!optional));
            }
        }
        out.insert(name, expanded);
    }

    Ok(Value::Object(out))
}

/// Convert plain YAML data (facet values, examples) to JSON.
fn yaml_to_json(value: &YamlValue, path: &str) -> Result<Value, LoadError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => serde_json::to_value(n)?,
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(seq) => Value::Array(
            seq.iter()
                .map(|item| yaml_to_json(item, path))
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut out = Map::new();
            for (key, item) in map {
                let key = key_to_string(key, path)?;
                let item = yaml_to_json(item, path)?;
                out.insert(key, item);
            }
            Value::Object(out)
        }
        YamlValue::Tagged(tagged) => {
            return Err(parse_error(format!(
                "`{}` at {path} is not supported",
                tagged.tag
            )))
        }
    })
}

fn key_to_string(key: &YamlValue, path: &str) -> Result<String, LoadError> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        _ => Err(parse_error(format!("unsupported mapping key under {path}"))),
    }
}

fn parse_error(message: impl Into<String>) -> LoadError {
    LoadError::RamlParseError {
        message: message.into(),
    }
}
