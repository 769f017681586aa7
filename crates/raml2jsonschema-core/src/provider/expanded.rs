//! Already-expanded type graphs stored as JSON.
//!
//! The file is a single object mapping type names to their serialized
//! declarations, the same shape RAML parsers emit when asked for JSON.

use serde_json::{Map, Value};

use super::TypeGraphProvider;
use crate::error::LoadError;
use crate::type_graph::{TypeGraph, TypeNode};

/// A pre-expanded type graph.
#[derive(Debug, Clone)]
pub struct ExpandedGraph {
    types: Map<String, Value>,
}

impl ExpandedGraph {
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        let types: Map<String, Value> = serde_json::from_str(source)?;
        Ok(Self { types })
    }
}

impl TypeGraphProvider for ExpandedGraph {
    fn type_graph(&self) -> Result<TypeGraph, LoadError> {
        Ok(self
            .types
            .iter()
            .map(|(name, tree)| TypeNode::new(name.clone(), tree.clone()))
            .collect())
    }
}
