//! Type graph providers.
//!
//! The normalizer only needs a [`TypeGraph`]. Providers produce one from some
//! source: a RAML document ([`RamlDocument`]) or a JSON file holding an
//! already-expanded graph ([`ExpandedGraph`]).

mod expanded;
mod raml;

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::type_graph::TypeGraph;

pub use expanded::ExpandedGraph;
pub use raml::RamlDocument;

/// A source of named type declarations.
pub trait TypeGraphProvider {
    fn type_graph(&self) -> Result<TypeGraph, LoadError>;
}

/// Load a type graph from `path`, choosing the provider by extension:
/// `.json` is an expanded graph, anything else is read as RAML.
pub fn load_type_graph(path: &Path) -> Result<TypeGraph, LoadError> {
    let source = read_source(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        ExpandedGraph::parse(&source)?.type_graph()
    } else {
        RamlDocument::parse(&source)?.type_graph()
    }
}

/// Read an input file, separating "does not exist" from other I/O errors.
pub(crate) fn read_source(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
