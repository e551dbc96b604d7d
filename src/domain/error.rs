//! Error types for schema extraction and value generation

use thiserror::Error;

/// Errors raised while generating a value from a schema node.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerateError {
    /// The node's shape matches no generation rule
    #[error("Unsupported shape at '{path}': {reason}")]
    UnsupportedShape { path: String, reason: String },

    /// The node's constraints cannot all be satisfied
    #[error("Contradictory constraints at '{path}': {reason}")]
    ContradictoryConstraint { path: String, reason: String },
}

impl GenerateError {
    pub fn unsupported(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn contradictory(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContradictoryConstraint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the field that caused the error
    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedShape { path, .. } | Self::ContradictoryConstraint { path, .. } => path,
        }
    }
}

/// Errors raised while turning a schema document into a [`crate::domain::ModelSchema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// `$ref` points at a definition that does not exist
    #[error("Schema reference '{0}' not found")]
    UnresolvedReference(String),

    /// `$ref` points back at a definition that is still being expanded
    #[error("Schema reference '{0}' is recursive")]
    RecursiveReference(String),

    /// Structurally invalid schema document
    #[error("Invalid schema at '{path}': {reason}")]
    Invalid { path: String, reason: String },

    /// Schema file has an extension we cannot parse
    #[error("Unsupported schema file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Either stage of the schema to example pipeline.
#[derive(Debug, Error)]
pub enum ExemplarError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}
