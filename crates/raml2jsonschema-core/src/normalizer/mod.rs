//! Schema normalization: RAML type trees → JSON Schema (draft-04) documents.
//!
//! For each node of a type's tree the normalizer:
//!
//! 1. rewrites the RAML type expression (`type_shape`),
//! 2. drops RAML authoring metadata (`name`, `displayName`, `repeat`,
//!    `structuredExample`),
//! 3. derives `required` and descends into `properties` (`required`),
//! 4. hoists references to other declared types (`hoist`), inlining their
//!    normalized schema and excluding them from top-level output.
//!
//! All run state lives in [`Normalizer`]; nothing is shared between runs.

mod hoist;
mod required;
mod type_shape;

use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};

use crate::config::NormalizeOptions;
use crate::error::ConvertError;
use crate::schema_node::{SchemaNode, SchemaType};
use crate::schema_utils::build_path;
use crate::type_graph::TypeGraph;

use type_shape::TypeShape;

/// RAML authoring artifacts with no JSON Schema meaning.
const METADATA_KEYS: &[&str] = &["name", "displayName", "repeat", "structuredExample"];

/// Keywords the normalizer interprets itself; everything else passes through.
const STRUCTURAL_KEYS: &[&str] = &["type", "items", "properties", "required", "$schema", "$ref"];

/// Outcome of a normalization run.
#[derive(Debug, Default)]
pub struct NormalizeResult {
    /// Top-level documents keyed by type name, in declaration order, each
    /// stamped with `$schema`.
    pub documents: IndexMap<String, SchemaNode>,
    /// Types that could not be normalized. They have no document.
    pub failures: Vec<TypeFailure>,
}

/// A type skipped because normalization failed.
#[derive(Debug)]
pub struct TypeFailure {
    pub name: String,
    pub error: ConvertError,
}

/// Normalize every type of `graph`.
///
/// Each type is normalized once. Types referenced from another type's tree
/// are inlined there and do not get a document of their own, unless they are
/// the target of a cycle-break `$ref`. A failing type is recorded in
/// [`NormalizeResult::failures`] and the run continues.
pub fn normalize(graph: &TypeGraph, options: &NormalizeOptions) -> NormalizeResult {
    let mut normalizer = Normalizer::new(graph, options);
    let mut failures = Vec::new();

    for name in graph.names() {
        if normalizer.definition(name).is_some() {
            continue;
        }
        if let Err(error) = normalizer.normalize_type(name) {
            tracing::warn!(type_name = name, %error, "skipping type");
            failures.push(TypeFailure {
                name: name.to_string(),
                error,
            });
        }
    }

    NormalizeResult {
        documents: normalizer.into_documents(),
        failures,
    }
}

/// Working state of one normalization run.
pub struct Normalizer<'a> {
    graph: &'a TypeGraph,
    options: &'a NormalizeOptions,
    /// Normalized form of every completed type.
    definitions: IndexMap<String, SchemaNode>,
    /// Types inlined into another type's tree.
    nested: IndexSet<String>,
    /// Types currently being normalized, outermost first.
    in_progress: IndexSet<String>,
    /// Types referenced through a cycle-break `$ref`.
    cycle_targets: IndexSet<String>,
}

impl<'a> Normalizer<'a> {
    pub fn new(graph: &'a TypeGraph, options: &'a NormalizeOptions) -> Self {
        Self {
            graph,
            options,
            definitions: IndexMap::new(),
            nested: IndexSet::new(),
            in_progress: IndexSet::new(),
            cycle_targets: IndexSet::new(),
        }
    }

    /// Normalized form of `name`, if it has been completed.
    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    /// Whether `name` has been inlined into another type.
    pub fn is_nested(&self, name: &str) -> bool {
        self.nested.contains(name)
    }

    /// Whether `name` gets its own output document.
    pub fn is_top_level(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
            && (!self.nested.contains(name) || self.cycle_targets.contains(name))
    }

    /// Consume the run state and return the top-level documents.
    pub fn into_documents(mut self) -> IndexMap<String, SchemaNode> {
        let graph = self.graph;
        let mut documents = IndexMap::new();
        for name in graph.names() {
            if !self.is_top_level(name) {
                continue;
            }
            if let Some(mut document) = self.definitions.shift_remove(name) {
                document.schema = Some(self.options.schema_uri.clone());
                documents.insert(name.to_string(), document);
            }
        }
        documents
    }

    /// Normalize one raw node and everything below it.
    fn normalize_node(
        &mut self,
        raw: &Value,
        path: &str,
        depth: usize,
    ) -> Result<SchemaNode, ConvertError> {
        if depth > self.options.max_depth {
            return Err(ConvertError::RecursionDepthExceeded {
                path: path.to_string(),
                max_depth: self.options.max_depth,
            });
        }

        let Some(obj) = raw.as_object() else {
            return Err(ConvertError::malformed(
                path,
                format!("expected a mapping, found {}", type_shape::value_kind(raw)),
            ));
        };

        let properties = match obj.get("properties") {
            None | Some(Value::Null) => None,
            Some(Value::Object(props)) => Some(props),
            Some(other) => {
                return Err(ConvertError::malformed(
                    path,
                    format!(
                        "properties must be a mapping, found {}",
                        type_shape::value_kind(other)
                    ),
                ))
            }
        };

        // RAML: a declaration with properties and no type is an object.
        let declared = type_shape::read_type(obj.get("type"), path)?
            .or_else(|| properties.map(|_| "object".to_string()));

        let mut node = SchemaNode {
            reference: obj.get("$ref").and_then(Value::as_str).map(str::to_string),
            extra: passthrough_facets(obj),
            ..SchemaNode::default()
        };

        let items_path = build_path(path, &["items"]);
        let shape = declared
            .as_deref()
            .map(|type_str| type_shape::classify(type_str, path))
            .transpose()?;
        match shape {
            None => {}
            Some(TypeShape::Named(name)) => node.ty = Some(SchemaType::Single(name)),
            Some(TypeShape::Union(members)) => {
                for member in members.iter().filter(|m| type_shape::is_array_expression(m)) {
                    tracing::warn!(
                        path,
                        member = member.as_str(),
                        "array types inside a union are not supported; member left as written"
                    );
                }
                node.ty = Some(SchemaType::Union(members));
            }
            Some(TypeShape::ArrayOf(element)) => {
                node.ty = Some(SchemaType::Single("array".to_string()));
                node.items = Some(Box::new(self.normalize_element(
                    &element,
                    &items_path,
                    depth,
                )?));
            }
        }

        if node.items.is_none() {
            if let Some(items) = obj.get("items").filter(|v| !v.is_null()) {
                node.items = Some(Box::new(self.normalize_items(items, &items_path, depth)?));
            }
        }

        let mut required = required::existing_required(obj.get("required"), path)?;
        if let Some(props) = properties {
            if !props.is_empty() {
                if !self.is_object_like(&node) {
                    return Err(ConvertError::malformed(
                        path,
                        format!(
                            "properties declared on non-object type {}",
                            describe_type(&node)
                        ),
                    ));
                }
                required = required::derive_required(required, props);
            }

            let mut normalized = IndexMap::with_capacity(props.len());
            for (key, child) in props {
                let child_path = build_path(path, &["properties", key]);
                normalized.insert(key.clone(), self.normalize_node(child, &child_path, depth + 1)?);
            }
            node.properties = Some(normalized);
        }
        if !required.is_empty() {
            node.required = Some(required);
        }

        let referenced = node
            .type_name()
            .filter(|name| self.graph.contains(name))
            .map(str::to_string);
        if let Some(name) = referenced {
            let mut resolved = self.resolve_named(&name, path, depth)?;
            node.ty = None;
            resolved.overlay(node);
            return Ok(resolved);
        }

        Ok(node)
    }

    /// Element of a `Foo[]` expression.
    fn normalize_element(
        &mut self,
        element: &str,
        path: &str,
        depth: usize,
    ) -> Result<SchemaNode, ConvertError> {
        if type_shape::is_union_expression(element) {
            tracing::warn!(
                path,
                element,
                "array-of-union types are not supported; element type left as written"
            );
            return Ok(SchemaNode::of_type(element));
        }
        self.normalize_node(&json!({ "type": element }), path, depth + 1)
    }

    /// Explicit `items` facet: a type expression, candidate array or full node.
    fn normalize_items(
        &mut self,
        items: &Value,
        path: &str,
        depth: usize,
    ) -> Result<SchemaNode, ConvertError> {
        match items {
            Value::String(_) | Value::Array(_) => {
                self.normalize_node(&json!({ "type": items }), path, depth + 1)
            }
            Value::Object(_) => self.normalize_node(items, path, depth + 1),
            other => Err(ConvertError::malformed(
                path,
                format!(
                    "items must be a type expression or a mapping, found {}",
                    type_shape::value_kind(other)
                ),
            )),
        }
    }

    /// `object`, or a declared type (inheritance adds properties to it).
    fn is_object_like(&self, node: &SchemaNode) -> bool {
        node.is_object() || node.type_name().is_some_and(|name| self.graph.contains(name))
    }
}

/// Facets copied verbatim: everything except metadata and the keywords the
/// normalizer rebuilds.
fn passthrough_facets(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .filter(|(key, _)| {
            !METADATA_KEYS.contains(&key.as_str()) && !STRUCTURAL_KEYS.contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn describe_type(node: &SchemaNode) -> String {
    match &node.ty {
        Some(SchemaType::Single(name)) => name.clone(),
        Some(SchemaType::Union(members)) => members.join(" | "),
        None => "(none)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph(types: Value) -> TypeGraph {
        types
            .as_object()
            .unwrap()
            .iter()
            .map(|(name, tree)| (name.clone(), tree.clone()))
            .collect()
    }

    /// Normalize and return every document as JSON.
    fn run(types: Value) -> IndexMap<String, Value> {
        let graph = graph(types);
        let options = NormalizeOptions::default();
        let result = normalize(&graph, &options);
        assert!(result.failures.is_empty(), "unexpected failures: {:?}", result.failures);
        result
            .documents
            .into_iter()
            .map(|(name, doc)| (name, doc.to_value()))
            .collect()
    }

    fn run_err(types: Value) -> Vec<TypeFailure> {
        let graph = graph(types);
        let options = NormalizeOptions::default();
        normalize(&graph, &options).failures
    }

    #[test]
    fn test_metadata_is_stripped() {
        let docs = run(json!({
            "Tag": {
                "name": "Tag",
                "displayName": "Tag",
                "repeat": false,
                "structuredExample": { "value": "x" },
                "type": ["string"],
                "description": "A label"
            }
        }));

        assert_eq!(
            docs["Tag"],
            json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "type": "string",
                "description": "A label"
            })
        );
    }

    #[test]
    fn test_object_properties_and_required() {
        let docs = run(json!({
            "Person": {
                "type": ["object"],
                "properties": {
                    "a": { "name": "a", "type": ["string"], "required": true },
                    "b": { "name": "b", "type": ["integer"], "required": false }
                }
            }
        }));

        assert_eq!(
            docs["Person"],
            json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "type": "object",
                "properties": {
                    "a": { "type": "string" },
                    "b": { "type": "integer" }
                },
                "required": ["a"]
            })
        );
    }

    #[test]
    fn test_no_required_when_nothing_flagged() {
        let docs = run(json!({
            "Loose": {
                "type": ["object"],
                "properties": { "a": { "type": ["string"], "required": false } }
            }
        }));

        assert!(docs["Loose"].get("required").is_none());
    }

    #[test]
    fn test_missing_type_with_properties_is_object() {
        let docs = run(json!({
            "Implicit": { "properties": { "x": { "type": ["number"] } } }
        }));

        assert_eq!(docs["Implicit"]["type"], "object");
    }

    #[test]
    fn test_explicit_items_expression() {
        let docs = run(json!({
            "Names": { "type": ["array"], "items": ["string"] }
        }));

        assert_eq!(docs["Names"]["items"], json!({ "type": "string" }));
    }

    #[test]
    fn test_nested_array_suffix() {
        let docs = run(json!({ "Grid": { "type": ["number[][]"] } }));

        assert_eq!(
            docs["Grid"],
            json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "type": "array",
                "items": { "type": "array", "items": { "type": "number" } }
            })
        );
    }

    #[test]
    fn test_array_of_union_left_as_written() {
        let docs = run(json!({ "Mixed": { "type": ["(string | number)[]"] } }));

        assert_eq!(docs["Mixed"]["type"], "array");
        assert_eq!(docs["Mixed"]["items"], json!({ "type": "(string | number)" }));
    }

    #[test]
    fn test_union_with_array_member_left_as_written() {
        let docs = run(json!({
            "Mixed": { "type": ["string | Person[]"] },
            "Person": { "type": ["object"] }
        }));

        assert_eq!(docs["Mixed"]["type"], json!(["string", "Person[]"]));
        // Union members are not hoisted, so Person keeps its own document.
        assert!(docs.contains_key("Person"));
    }

    #[test]
    fn test_union_with_empty_member_is_malformed() {
        let failures = run_err(json!({
            "Dangling": { "type": ["A | "] },
            "A": { "type": ["string"] }
        }));

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "Dangling");
        match &failures[0].error {
            ConvertError::MalformedTypeNode { path, message } => {
                assert_eq!(path, "Dangling#");
                assert!(message.contains("empty member"), "got: {message}");
            }
            other => panic!("expected MalformedTypeNode, got {other:?}"),
        }
    }

    #[test]
    fn test_site_items_kept_on_hoisted_type() {
        let docs = run(json!({
            "Holder": {
                "type": ["object"],
                "properties": {
                    "ids": { "type": ["List"], "items": "integer" },
                    "any": { "type": ["Bag"], "items": "boolean" }
                }
            },
            "List": { "type": ["string[]"] },
            "Bag": { "type": ["array"] }
        }));

        assert_eq!(
            docs["Holder"]["properties"]["ids"],
            json!({ "type": "array", "items": { "type": "integer" } })
        );
        assert_eq!(
            docs["Holder"]["properties"]["any"],
            json!({ "type": "array", "items": { "type": "boolean" } })
        );
    }

    #[test]
    fn test_properties_on_primitive_is_malformed() {
        let failures = run_err(json!({
            "Odd": { "type": ["string"], "properties": { "x": { "type": ["string"] } } }
        }));

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "Odd");
        assert!(matches!(
            failures[0].error,
            ConvertError::MalformedTypeNode { .. }
        ));
    }

    #[test]
    fn test_malformed_shapes_report_path() {
        let failures = run_err(json!({
            "Broken": {
                "type": ["object"],
                "properties": { "bad": { "type": 7 } }
            },
            "NotAMap": "string",
            "BadProps": { "type": ["object"], "properties": ["a"] },
            "BadItems": { "type": ["array"], "items": 3 }
        }));

        let paths: Vec<String> = failures
            .iter()
            .map(|f| match &f.error {
                ConvertError::MalformedTypeNode { path, .. } => path.clone(),
                other => panic!("expected MalformedTypeNode, got {other:?}"),
            })
            .collect();
        assert_eq!(
            paths,
            vec![
                "Broken#/properties/bad",
                "NotAMap#",
                "BadProps#",
                "BadItems#/items"
            ]
        );
    }

    #[test]
    fn test_depth_guard() {
        let docs = json!({
            "Deep": {
                "type": ["object"],
                "properties": {
                    "a": {
                        "type": ["object"],
                        "properties": {
                            "b": {
                                "type": ["object"],
                                "properties": { "c": { "type": ["string"] } }
                            }
                        }
                    }
                }
            }
        });
        let graph = graph(docs);
        let options = NormalizeOptions {
            max_depth: 2,
            ..NormalizeOptions::default()
        };

        let result = normalize(&graph, &options);
        assert!(result.documents.is_empty());
        match &result.failures[0].error {
            ConvertError::RecursionDepthExceeded { max_depth, path } => {
                assert_eq!(*max_depth, 2);
                assert_eq!(path, "Deep#/properties/a/properties/b/properties/c");
            }
            other => panic!("expected RecursionDepthExceeded, got: {other:?}"),
        }
    }

    #[test]
    fn test_custom_schema_uri() {
        let graph = graph(json!({ "Id": { "type": ["string"] } }));
        let options = NormalizeOptions {
            schema_uri: "http://json-schema.org/draft-07/schema#".to_string(),
            ..NormalizeOptions::default()
        };

        let result = normalize(&graph, &options);
        assert_eq!(
            result.documents["Id"].schema.as_deref(),
            Some("http://json-schema.org/draft-07/schema#")
        );
    }
}
