//! Convert RAML 1.0 type declarations into JSON Schema (draft-04) documents.
//!
//! A [`TypeGraph`] of named declarations (from a [`provider`]) is run through
//! [`normalize`], which rewrites RAML type notation (`Foo[]`, `A | B`),
//! derives `required`, strips RAML metadata and inlines references between
//! declared types. The result holds one document per top-level type.
//!
//! ```
//! use raml2jsonschema_core::{normalize, NormalizeOptions, TypeGraph};
//! use serde_json::json;
//!
//! let graph: TypeGraph = [
//!     ("Tags", json!({ "type": ["string[]"] })),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = normalize(&graph, &NormalizeOptions::default());
//! assert_eq!(result.documents["Tags"].to_value()["items"], json!({ "type": "string" }));
//! ```

pub mod config;
pub mod error;
pub mod normalizer;
pub mod provider;
pub mod schema_node;
pub mod schema_utils;
pub mod type_graph;

pub use config::{CyclePolicy, NormalizeOptions, DRAFT_04_SCHEMA_URI};
pub use error::{ConvertError, LoadError};
pub use normalizer::{normalize, NormalizeResult, Normalizer, TypeFailure};
pub use provider::{load_type_graph, ExpandedGraph, RamlDocument, TypeGraphProvider};
pub use schema_node::{SchemaNode, SchemaType};
pub use schema_utils::{build_path, document_file_name};
pub use type_graph::{TypeGraph, TypeNode};
