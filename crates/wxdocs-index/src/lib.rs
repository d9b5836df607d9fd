//! Article index for wxdocs.
//!
//! The article index (`sidebar_config.json`) lists archived articles as
//! `{text, link}` entries. It comes in two shapes, selected explicitly by the
//! caller through [`IndexKind`]:
//!
//! - [`ArticleIndex::Flat`]: a JSON array, newest article first
//! - [`ArticleIndex::Grouped`]: a JSON object keyed by source-account name
//!
//! This crate provides:
//! - [`load_article_index`]: read and parse an existing index file
//! - [`generate_flat_index`] / [`generate_grouped_index`]: build an index
//!   by scanning archived markdown files
//! - [`write_article_index`]: persist an index as pretty-printed JSON

mod entry;
mod error;
mod indexer;

pub use entry::{ArticleIndex, ArticleIndexEntry, IndexKind, load_article_index};
pub use error::IndexError;
pub use indexer::{
    ArticleFile, generate_flat_index, generate_grouped_index, scan_articles, write_article_index,
};
