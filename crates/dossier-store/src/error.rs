use std::io;
use std::path::{Path, PathBuf};

/// Errors from loading or persisting documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced document does not exist.
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A document is not valid JSON.
    #[error("malformed input in {}: {message}", path.display())]
    MalformedInput {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Read, backup, or replace failed at the filesystem level.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The merged document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
