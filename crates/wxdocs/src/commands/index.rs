//! `wxdocs index` command implementation.

use std::path::PathBuf;

use clap::Args;
use wxdocs_config::{CliSettings, Config, SidebarKind};
use wxdocs_index::{ArticleIndex, generate_flat_index, generate_grouped_index, write_article_index};

use super::KindArg;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Path to configuration file (default: auto-discover wxdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index shape to generate (overrides config).
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Directory of archived articles for a flat index (overrides config).
    #[arg(short, long)]
    articles_dir: Option<PathBuf>,

    /// Where to write the index (default: index.path from config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl IndexArgs {
    /// Execute the index command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            articles_dir: self.articles_dir,
            sidebar_kind: self.kind.map(Into::into),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let index_config = &config.index_resolved;

        let index = match config.sidebar.kind {
            SidebarKind::Flat => {
                output.info(&format!(
                    "Scanning {}",
                    index_config.articles_dir.display()
                ));
                generate_flat_index(
                    &index_config.articles_dir,
                    &index_config.link_prefix,
                    &index_config.exclude,
                )?
            }
            SidebarKind::Grouped => {
                output.info(&format!(
                    "Scanning account directories in {}",
                    index_config.docs_root.display()
                ));
                generate_grouped_index(
                    &index_config.docs_root,
                    &config.sidebar.group_keys,
                    &index_config.exclude,
                )?
            }
        };

        if let ArticleIndex::Grouped(buckets) = &index {
            for key in config
                .sidebar
                .group_keys
                .iter()
                .filter(|key| !buckets.contains_key(*key))
            {
                output.warning(&format!("No articles directory for account {key}"));
            }
        }

        let out_path = self.output.unwrap_or_else(|| index_config.path.clone());
        write_article_index(&index, &out_path)?;

        output.success(&format!(
            "Article index written to {} ({} articles)",
            out_path.display(),
            index.len()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wxdocs_index::{ArticleIndexEntry, IndexKind, load_article_index};

    #[test]
    fn test_index_then_build_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let articles = dir.path().join("docs/articles");
        std::fs::create_dir_all(&articles).unwrap();
        std::fs::write(articles.join("001_2025-12-08_A.md"), "# A\n").unwrap();
        std::fs::write(articles.join("002_2025-12-09_B.md"), "# B\n").unwrap();
        let config_path = dir.path().join("wxdocs.toml");
        std::fs::write(&config_path, "").unwrap();

        IndexArgs {
            config: Some(config_path),
            kind: None,
            articles_dir: None,
            output: None,
            verbose: false,
        }
        .execute()
        .unwrap();

        let index =
            load_article_index(&dir.path().join("sidebar_config.json"), IndexKind::Flat).unwrap();
        assert_eq!(
            index,
            ArticleIndex::Flat(vec![
                ArticleIndexEntry::new("2025-12-09 - B", "/articles/002_2025-12-09_B.md"),
                ArticleIndexEntry::new("2025-12-08 - A", "/articles/001_2025-12-08_A.md"),
            ])
        );
    }

    #[test]
    fn test_index_grouped() {
        let dir = tempfile::tempdir().unwrap();
        let account = dir.path().join("docs/X");
        std::fs::create_dir_all(&account).unwrap();
        std::fs::write(account.join("2025-12-26_Note.md"), "# Note\n").unwrap();
        let config_path = dir.path().join("wxdocs.toml");
        std::fs::write(&config_path, "[sidebar]\nkind = \"grouped\"\ngroup_keys = [\"X\", \"Y\"]\n")
            .unwrap();
        let out = dir.path().join("grouped.json");

        IndexArgs {
            config: Some(config_path),
            kind: None,
            articles_dir: None,
            output: Some(out.clone()),
            verbose: false,
        }
        .execute()
        .unwrap();

        let ArticleIndex::Grouped(buckets) = load_article_index(&out, IndexKind::Grouped).unwrap()
        else {
            panic!("Expected grouped index");
        };
        assert_eq!(
            buckets["X"],
            vec![ArticleIndexEntry::new("2025-12-26 - Note", "/X/2025-12-26_Note.md")]
        );
        assert!(!buckets.contains_key("Y"));
    }

    #[test]
    fn test_index_missing_articles_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("wxdocs.toml");
        std::fs::write(&config_path, "").unwrap();

        let err = IndexArgs {
            config: Some(config_path),
            kind: None,
            articles_dir: None,
            output: None,
            verbose: false,
        }
        .execute()
        .unwrap_err();

        assert!(matches!(err, CliError::Index(_)));
    }
}
