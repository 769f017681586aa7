//! Configuration for schema normalization.

use serde::{Deserialize, Serialize};

/// JSON Schema dialect stamped on every top-level document by default.
pub const DRAFT_04_SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";

/// What to do when a type reaches itself again while it is still being
/// normalized (directly or through other types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Emit `{"$ref": "<Name>.json"}` at the point of recursion and promote
    /// the target to a top-level document.
    Reference,
    /// Fail the type with `ConvertError::CyclicTypeReference`.
    Error,
}

/// Options for schema normalization.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `schema-uri`, `on-cycle`,
/// `max-depth`) so the same struct doubles as the CLI's `--config` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NormalizeOptions {
    /// Value of `$schema` on top-level documents.
    pub schema_uri: String,
    /// Cycle handling for types that reference themselves.
    pub on_cycle: CyclePolicy,
    /// Maximum node nesting (properties, items and hoisted types combined)
    /// before normalization gives up on a type.
    pub max_depth: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            schema_uri: DRAFT_04_SCHEMA_URI.to_string(),
            on_cycle: CyclePolicy::Reference,
            max_depth: 128,
        }
    }
}
