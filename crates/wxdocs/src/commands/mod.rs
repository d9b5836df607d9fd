//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod index;

use std::path::Path;

use clap::ValueEnum;
use wxdocs_config::SidebarKind;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use index::IndexArgs;

/// Sidebar policy selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    /// Chronological list plus recent articles.
    Flat,
    /// One group per source account.
    Grouped,
}

impl From<KindArg> for SidebarKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Flat => Self::Flat,
            KindArg::Grouped => Self::Grouped,
        }
    }
}

/// Write `content` to `path`, creating parent directories.
fn write_file(path: &Path, content: &str) -> Result<(), CliError> {
    let to_err = |source: std::io::Error| CliError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, content).map_err(to_err)
}
