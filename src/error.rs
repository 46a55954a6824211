//! Error types for yaml-bump.

/// Errors that can occur when loading or updating YAML documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error when reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed YAML; fatal for the file
    #[error("parse error: {0}")]
    Parse(String),
    /// A path segment named a key that does not exist in the mapping
    #[error("key '{key}' not found in path '{path}'")]
    KeyNotFound {
        /// The missing key segment
        key: String,
        /// The full requested path
        path: String,
    },
    /// A path segment indexed a sequence with something other than an integer
    #[error("expected integer index for list, got '{segment}' in path '{path}'")]
    InvalidIndex {
        /// The offending segment
        segment: String,
        /// The full requested path
        path: String,
    },
    /// A sequence index was past the end of the sequence
    #[error("index {index} out of range in path '{path}'")]
    IndexOutOfRange {
        /// The out-of-range index
        index: usize,
        /// The full requested path
        path: String,
    },
    /// A path tried to descend through a scalar
    #[error("cannot traverse into scalar at '{segment}' in path '{path}'")]
    CannotTraverseScalar {
        /// The segment at which traversal stopped
        segment: String,
        /// The full requested path
        path: String,
    },
    /// A path resolved to a mapping or sequence instead of a scalar
    #[error("path '{path}' resolves to a collection, expected a scalar")]
    TypeMismatch {
        /// The full requested path
        path: String,
    },
    /// Invalid or inconsistent run configuration
    #[error("{0}")]
    Config(String),
    /// Failure serializing the change report
    #[error("serializing report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for yaml-bump operations.
pub type Result<T> = std::result::Result<T, Error>;
