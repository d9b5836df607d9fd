//! Article index data model and loading.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::IndexError;

/// One archived article as listed in the index file.
///
/// Extra fields written by other tools are ignored on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleIndexEntry {
    /// Display title (e.g. "2025-12-08 - Title").
    pub text: String,
    /// Link target relative to the site base (e.g. "/articles/001_....md").
    pub link: String,
}

impl ArticleIndexEntry {
    /// Create a new index entry.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// Expected shape of an index file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// JSON array of entries.
    Flat,
    /// JSON object mapping account name to an array of entries.
    Grouped,
}

/// Parsed article index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArticleIndex {
    /// Entries in file order.
    Flat(Vec<ArticleIndexEntry>),
    /// Entries bucketed by source-account name, each bucket in file order.
    Grouped(BTreeMap<String, Vec<ArticleIndexEntry>>),
}

impl ArticleIndex {
    /// Parse index JSON as the given kind.
    ///
    /// The shape is never inferred: an object passed as [`IndexKind::Flat`]
    /// (or an array as [`IndexKind::Grouped`]) is an error.
    pub fn from_json(content: &str, kind: IndexKind) -> Result<Self, serde_json::Error> {
        match kind {
            IndexKind::Flat => serde_json::from_str(content).map(Self::Flat),
            IndexKind::Grouped => serde_json::from_str(content).map(Self::Grouped),
        }
    }

    /// Kind of this index.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Flat(_) => IndexKind::Flat,
            Self::Grouped(_) => IndexKind::Grouped,
        }
    }

    /// Total number of entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(entries) => entries.len(),
            Self::Grouped(buckets) => buckets.values().map(Vec::len).sum(),
        }
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read and parse the article index at `path`.
///
/// # Errors
///
/// Returns [`IndexError::NotFound`] if the file is missing,
/// [`IndexError::Parse`] if it is not valid JSON of the requested shape, and
/// [`IndexError::Io`] for other read failures.
pub fn load_article_index(path: &Path, kind: IndexKind) -> Result<ArticleIndex, IndexError> {
    let content = read_index_file(path)?;
    let index = ArticleIndex::from_json(&content, kind).map_err(|e| parse_error(path, e))?;

    tracing::debug!(path = %path.display(), entries = index.len(), "Loaded article index");
    Ok(index)
}

fn read_index_file(path: &Path) -> Result<String, IndexError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            IndexError::NotFound(path.to_path_buf())
        } else {
            IndexError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn parse_error(path: &Path, source: serde_json::Error) -> IndexError {
    IndexError::Parse {
        path: path.to_path_buf(),
        source,
    }
}
