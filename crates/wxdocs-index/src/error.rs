//! Article index error types.

use std::path::PathBuf;

/// Error returned when reading, parsing or writing an article index.
///
/// All variants are fatal to site generation: there is no degraded mode
/// that proceeds with a partial index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Index file does not exist.
    #[error("Article index not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Index file exists but is malformed or has the wrong shape.
    #[error("Failed to parse article index {}: {source}", .path.display())]
    Parse {
        /// Index file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// I/O error reading or writing index or article files.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Index could not be serialized.
    #[error("Failed to serialize article index: {0}")]
    Serialize(#[source] serde_json::Error),
}
