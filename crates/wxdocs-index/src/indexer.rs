//! Article index generation by directory scanning.
//!
//! Archived articles are stored as markdown files named
//! `NNN_YYYY-MM-DD_<title>.md` (album downloads) or `YYYY-MM-DD_<title>.md`
//! (single-article imports). The scanner parses these names, orders the
//! articles newest first and turns each into an [`ArticleIndexEntry`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{ArticleIndex, ArticleIndexEntry, IndexError};

static ARTICLE_FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)_)?(\d{4}-\d{2}-\d{2})_(.+)\.md$").unwrap()
});

/// Files that are never articles.
const RESERVED_FILENAMES: &[&str] = &["index.md", "README.md"];

/// Article metadata parsed from a markdown filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleFile {
    /// Sequence number within the album, if present.
    pub num: Option<u64>,
    /// Publish date as `YYYY-MM-DD`.
    pub date: String,
    /// Title part of the filename.
    pub title: String,
    /// Filename on disk.
    pub filename: String,
    /// Site link (`link_prefix` + filename).
    pub link: String,
}

impl ArticleFile {
    /// Parse an article filename. Returns `None` if it doesn't follow the
    /// archive naming scheme.
    #[must_use]
    pub fn parse(filename: &str, link_prefix: &str) -> Option<Self> {
        let caps = ARTICLE_FILENAME_RE.captures(filename)?;
        Some(Self {
            num: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            date: caps[2].to_owned(),
            title: caps[3].to_owned(),
            filename: filename.to_owned(),
            link: format!("{link_prefix}{filename}"),
        })
    }

    /// Convert to an index entry labelled `"{date} - {title}"`.
    #[must_use]
    pub fn to_entry(&self) -> ArticleIndexEntry {
        ArticleIndexEntry::new(format!("{} - {}", self.date, self.title), self.link.clone())
    }
}

/// Scan `dir` for archived articles, newest first.
///
/// Articles are ordered by `(date, num)` descending. Ties keep filename
/// order. Reserved files, names in `exclude`, hidden files and files that
/// don't match the naming scheme are skipped.
///
/// # Errors
///
/// Returns [`IndexError::NotFound`] if `dir` doesn't exist and
/// [`IndexError::Io`] if it can't be read.
pub fn scan_articles(
    dir: &Path,
    link_prefix: &str,
    exclude: &[String],
) -> Result<Vec<ArticleFile>, IndexError> {
    if !dir.is_dir() {
        return Err(IndexError::NotFound(dir.to_path_buf()));
    }

    let read_dir = fs::read_dir(dir).map_err(|source| IndexError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut filenames: Vec<String> = read_dir
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.') && name.ends_with(".md"))
        .filter(|name| !RESERVED_FILENAMES.contains(&name.as_str()))
        .filter(|name| !exclude.iter().any(|x| x == name))
        .collect();
    filenames.sort();

    let mut articles: Vec<ArticleFile> = filenames
        .iter()
        .filter_map(|name| {
            let parsed = ArticleFile::parse(name, link_prefix);
            if parsed.is_none() {
                tracing::debug!(file = %name, "Skipping file outside article naming scheme");
            }
            parsed
        })
        .collect();

    articles.sort_by(|a, b| (&b.date, b.num).cmp(&(&a.date, a.num)));

    tracing::debug!(dir = %dir.display(), count = articles.len(), "Scanned articles");
    Ok(articles)
}

/// Build a flat index from the articles in `dir`.
///
/// # Errors
///
/// Propagates [`scan_articles`] errors.
pub fn generate_flat_index(
    dir: &Path,
    link_prefix: &str,
    exclude: &[String],
) -> Result<ArticleIndex, IndexError> {
    let entries = scan_articles(dir, link_prefix, exclude)?
        .iter()
        .map(ArticleFile::to_entry)
        .collect();
    Ok(ArticleIndex::Flat(entries))
}

/// Build a grouped index with one bucket per account directory under
/// `docs_root`.
///
/// Links are `/{account}/{filename}`. Accounts without a directory are
/// skipped with a warning and get no bucket.
///
/// # Errors
///
/// Propagates [`scan_articles`] errors for account directories that exist.
pub fn generate_grouped_index(
    docs_root: &Path,
    accounts: &[String],
    exclude: &[String],
) -> Result<ArticleIndex, IndexError> {
    let mut buckets = BTreeMap::new();

    for account in accounts {
        let dir = docs_root.join(account);
        if !dir.is_dir() {
            tracing::warn!(account = %account, dir = %dir.display(), "Account directory not found, skipping");
            continue;
        }

        let entries = scan_articles(&dir, &format!("/{account}/"), exclude)?
            .iter()
            .map(ArticleFile::to_entry)
            .collect();
        buckets.insert(account.clone(), entries);
    }

    Ok(ArticleIndex::Grouped(buckets))
}

/// Write `index` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns [`IndexError::Io`] on write failure.
pub fn write_article_index(index: &ArticleIndex, path: &Path) -> Result<(), IndexError> {
    let json = serde_json::to_string_pretty(index).map_err(IndexError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), entries = index.len(), "Wrote article index");
    Ok(())
}
