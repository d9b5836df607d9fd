//! CLI error types.

use wxdocs_config::ConfigError;
use wxdocs_index::IndexError;
use wxdocs_site::LoadError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize site configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}
