//! The output side: JSON Schema (draft-04) shaped nodes.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema_utils::document_file_name;

/// `type` keyword: a single type name or the multi-type array form used for
/// unions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Union(Vec<String>),
}

impl SchemaType {
    /// The type name, if this is not a union.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            SchemaType::Single(name) => Some(name),
            SchemaType::Union(_) => None,
        }
    }
}

/// A normalized schema node.
///
/// Absent keywords are `None` and skipped on serialization. Facets the
/// normalizer does not interpret (`description`, `enum`, `pattern`, ...) are
/// carried through `extra` in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaNode {
    /// `{"type": <name>}`
    pub fn of_type(name: impl Into<String>) -> Self {
        Self {
            ty: Some(SchemaType::Single(name.into())),
            ..Self::default()
        }
    }

    /// `{"$ref": "<name>.json"}`, pointing at the sibling output document.
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(document_file_name(name)),
            ..Self::default()
        }
    }

    /// Single type name, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_ref().and_then(SchemaType::as_single)
    }

    pub fn is_object(&self) -> bool {
        self.type_name() == Some("object")
    }

    /// Serialize into a `serde_json::Value`.
    pub fn to_value(&self) -> Value {
        // A tree of strings, maps and vectors with string keys cannot fail
        // to serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Layer a referencing site's own keywords over this (referenced) schema.
    ///
    /// Site facets and site `items` replace the referenced ones, site
    /// properties are appended (replacing same-named ones), and site required
    /// names are appended without duplicates.
    pub(crate) fn overlay(&mut self, site: SchemaNode) {
        for (key, value) in site.extra {
            self.extra.insert(key, value);
        }

        if site.items.is_some() {
            self.items = site.items;
        }

        if let Some(site_props) = site.properties {
            let props = self.properties.get_or_insert_with(IndexMap::new);
            for (name, node) in site_props {
                props.insert(name, node);
            }
        }

        if let Some(site_required) = site.required {
            let required = self.required.get_or_insert_with(Vec::new);
            for name in site_required {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
    }
}
