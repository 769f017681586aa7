//! Error types for type graph loading and schema normalization.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while obtaining a type graph from a provider.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RAML parse error: {message}")]
    RamlParseError { message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<serde_yaml::Error> for LoadError {
    fn from(err: serde_yaml::Error) -> Self {
        LoadError::RamlParseError {
            message: err.to_string(),
        }
    }
}

/// Per-type errors raised by the normalizer. A failing type is skipped and
/// reported; the rest of the run continues.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Malformed type node at {path}: {message}")]
    MalformedTypeNode { path: String, message: String },

    #[error("Cyclic type reference at {path}: {}", cycle.join(" -> "))]
    CyclicTypeReference { path: String, cycle: Vec<String> },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },
}

impl ConvertError {
    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        ConvertError::MalformedTypeNode {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
