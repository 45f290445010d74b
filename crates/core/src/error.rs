use std::path::PathBuf;

use crate::diagnostics::Diagnostics;

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to parse schema: {0}")]
    SchemaParse(#[source] serde_json::Error),

    #[error("Failed to parse description table: {0}")]
    DescriptionParse(#[source] serde_json::Error),

    #[error("Invalid metadata on {node}.{property}: {message}")]
    InvalidMetadata {
        node: String,
        property: String,
        message: String,
    },

    #[error("Failed to parse config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Generation aborted with {} fatal diagnostic(s)", .0.num_fatal())]
    Fatal(Diagnostics),

    #[error("Documentation anchors in {}: {message}", path.display())]
    DocsAnchor { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GenerateError {
    pub fn internal(message: impl Into<String>) -> Self {
        GenerateError::Internal(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Diagnostics carried by a fatal run, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            GenerateError::Fatal(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}
