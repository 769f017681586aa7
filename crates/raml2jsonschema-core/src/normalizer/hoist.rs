//! Named-type resolution: hoisting, caching and cycle breaking.
//!
//! A node whose type names another declared type is replaced by that type's
//! normalized schema. The referenced type is normalized at most once and
//! cached; later references clone the cached entry. A type reached again
//! while it is still in progress is a cycle and is broken per
//! [`CyclePolicy`].

use crate::config::CyclePolicy;
use crate::error::ConvertError;
use crate::schema_node::SchemaNode;
use crate::schema_utils::type_root_path;

use super::Normalizer;

impl Normalizer<'_> {
    /// Normalize the declared type `name` (or return its cached form).
    pub fn normalize_type(&mut self, name: &str) -> Result<SchemaNode, ConvertError> {
        self.normalize_named(name, 0)
    }

    fn normalize_named(&mut self, name: &str, depth: usize) -> Result<SchemaNode, ConvertError> {
        if let Some(cached) = self.definitions.get(name) {
            return Ok(cached.clone());
        }

        let graph = self.graph;
        let root = type_root_path(name);
        let Some(type_node) = graph.get(name) else {
            return Err(ConvertError::malformed(&root, "type is not declared"));
        };

        self.in_progress.insert(name.to_string());
        let result = self.normalize_node(type_node.tree(), &root, depth);
        // Unmark on failure too; the run continues with other types.
        self.in_progress.shift_remove(name);

        let node = result?;
        tracing::debug!(type_name = name, "normalized type");
        self.definitions.insert(name.to_string(), node.clone());
        Ok(node)
    }

    /// Resolve a reference to the declared type `name` found at `path`.
    pub(super) fn resolve_named(
        &mut self,
        name: &str,
        path: &str,
        depth: usize,
    ) -> Result<SchemaNode, ConvertError> {
        if self.in_progress.contains(name) {
            return self.break_cycle(name, path);
        }

        let node = self.normalize_named(name, depth + 1)?;
        if self.nested.insert(name.to_string()) {
            tracing::debug!(type_name = name, path, "hoisted nested type");
        }
        Ok(node)
    }

    fn break_cycle(&mut self, name: &str, path: &str) -> Result<SchemaNode, ConvertError> {
        match self.options.on_cycle {
            CyclePolicy::Reference => {
                tracing::debug!(type_name = name, path, "cyclic reference replaced with $ref");
                self.cycle_targets.insert(name.to_string());
                Ok(SchemaNode::reference_to(name))
            }
            CyclePolicy::Error => {
                let start = self.in_progress.get_index_of(name).unwrap_or(0);
                let mut cycle: Vec<String> = self.in_progress.iter().skip(start).cloned().collect();
                cycle.push(name.to_string());
                Err(ConvertError::CyclicTypeReference {
                    path: path.to_string(),
                    cycle,
                })
            }
        }
    }
}
