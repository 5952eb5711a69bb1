//! Error types for dataset operations.

use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

///
/// DatasetError
///

#[derive(Debug, ThisError)]
pub enum DatasetError {
    /// Query, record or collection failure from the engine.
    #[error(transparent)]
    Engine(#[from] cocoql_core::Error),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("section {section} entry {index}: {source}")]
    Entry {
        section: &'static str,
        index: usize,
        #[source]
        source: cocoql_core::Error,
    },

    #[error("expected a JSON object in section {section} at entry {index}")]
    NotAnObject { section: &'static str, index: usize },

    #[error("dataset has no image directory")]
    NoImageDir,
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the engine error, if this is one.
    pub fn engine(&self) -> Option<&cocoql_core::Error> {
        match self {
            Self::Engine(err) | Self::Entry { source: err, .. } => Some(err),
            _ => None,
        }
    }
}
