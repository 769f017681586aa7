//! The input side: named RAML type declarations in their serialized form.

use indexmap::IndexMap;
use serde_json::Value;

/// One named type declaration with its raw property tree.
///
/// The tree is the serialized shape RAML parsers produce: `type` is usually a
/// one-element array of strings, `properties` maps names to nested trees of the
/// same shape, and each property carries a boolean `required` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    name: String,
    tree: Value,
}

impl TypeNode {
    pub fn new(name: impl Into<String>, tree: Value) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }
}

/// Name-keyed set of type declarations, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeGraph {
    types: IndexMap<String, TypeNode>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, replacing any previous one with the same name.
    pub fn insert(&mut self, node: TypeNode) {
        self.types.insert(node.name.clone(), node);
    }

    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeNode> for TypeGraph {
    fn from_iter<I: IntoIterator<Item = TypeNode>>(iter: I) -> Self {
        let mut graph = TypeGraph::new();
        for node in iter {
            graph.insert(node);
        }
        graph
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for TypeGraph {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, tree)| TypeNode::new(name, tree))
            .collect()
    }
}
