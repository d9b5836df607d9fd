//! One-shot site configuration loading.
//!
//! [`load_configuration`] reads the article index, builds the sidebar and
//! assembles the [`SiteConfig`]. All inputs are passed explicitly; nothing is
//! cached between calls, so every build reads the index fresh.

use std::path::Path;

use wxdocs_config::{Config, SidebarKind};
use wxdocs_index::{ArticleIndex, IndexError, IndexKind, load_article_index};

use crate::sidebar::{
    FlatSidebarOptions, GroupedSidebarOptions, build_flat_sidebar, build_grouped_sidebar,
};
use crate::site_config::{BuildOptions, NavigationEntry, SiteConfig, ThemeFlags, assemble_config};

/// Error returned when the site configuration cannot be produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Article index missing or malformed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Sidebar prefix is not a `/`-delimited path.
    #[error("Invalid sidebar prefix {0:?}: must start and end with '/'")]
    InvalidPrefix(String),
    /// Two sidebar sections share a prefix, so one would replace the other.
    #[error("Duplicate sidebar prefix {0:?}")]
    DuplicatePrefix(String),
}

/// Sidebar policy and its parameters.
#[derive(Clone, Debug)]
pub enum SidebarOptions {
    /// Chronological list plus a recent-articles view.
    Flat(FlatSidebarOptions),
    /// One group per source account.
    Grouped {
        /// Account names, in display order.
        group_keys: Vec<String>,
        /// Layout options.
        options: GroupedSidebarOptions,
    },
}

impl SidebarOptions {
    /// Index shape this policy reads.
    #[must_use]
    pub fn index_kind(&self) -> IndexKind {
        match self {
            Self::Flat(_) => IndexKind::Flat,
            Self::Grouped { .. } => IndexKind::Grouped,
        }
    }

    fn prefixes(&self) -> Vec<&str> {
        match self {
            Self::Flat(flat) => vec![flat.all_prefix.as_str(), flat.recent_prefix.as_str()],
            Self::Grouped { options, .. } => vec![options.prefix.as_str()],
        }
    }
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self::Flat(FlatSidebarOptions::default())
    }
}

/// Everything [`load_configuration`] needs besides the index file.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Navigation bar links.
    pub navigation: Vec<NavigationEntry>,
    /// Sidebar policy.
    pub sidebar: SidebarOptions,
    /// Theme flags.
    pub theme: ThemeFlags,
    /// Scalar site options.
    pub build: BuildOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            navigation: vec![
                NavigationEntry::new("首页", "/"),
                NavigationEntry::new("文章列表", "/articles/"),
            ],
            sidebar: SidebarOptions::default(),
            theme: ThemeFlags::default(),
            build: BuildOptions::default(),
        }
    }
}

impl LoadOptions {
    /// Derive load options from a loaded [`Config`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let sidebar = &config.sidebar;
        let sidebar = match sidebar.kind {
            SidebarKind::Flat => SidebarOptions::Flat(FlatSidebarOptions {
                all_prefix: sidebar.all_prefix.clone(),
                all_text: sidebar.all_text.clone(),
                recent_prefix: sidebar.recent_prefix.clone(),
                recent_text: sidebar.recent_text.clone(),
                recent_limit: sidebar.recent_limit,
            }),
            SidebarKind::Grouped => SidebarOptions::Grouped {
                group_keys: sidebar.group_keys.clone(),
                options: GroupedSidebarOptions {
                    prefix: sidebar.group_prefix.clone(),
                    collapsible: sidebar.collapsible,
                },
            },
        };

        Self {
            navigation: config
                .navbar
                .iter()
                .map(|entry| NavigationEntry::new(entry.text.clone(), entry.link.clone()))
                .collect(),
            sidebar,
            theme: ThemeFlags {
                sidebar_depth: config.theme.sidebar_depth,
                edit_link: config.theme.edit_link,
                last_updated: config.theme.last_updated,
                last_updated_text: config.theme.last_updated_text.clone(),
                contributors: config.theme.contributors,
            },
            build: BuildOptions {
                lang: config.site.lang.clone(),
                title: config.site.title.clone(),
                description: config.site.description.clone(),
                base: config.site.base.clone(),
                dest: config.site.dest.clone(),
                port: config.site.port,
            },
        }
    }
}

/// Load the article index at `index_path` and produce the site configuration.
///
/// # Errors
///
/// Returns [`LoadError::Index`] if the index is missing or malformed,
/// [`LoadError::InvalidPrefix`] if a sidebar prefix is not `/`-delimited and
/// [`LoadError::DuplicatePrefix`] if two sidebar sections share a prefix.
pub fn load_configuration(index_path: &Path, options: &LoadOptions) -> Result<SiteConfig, LoadError> {
    let prefixes = options.sidebar.prefixes();
    if let Some(bad) = prefixes
        .iter()
        .find(|p| !p.starts_with('/') || !p.ends_with('/'))
    {
        return Err(LoadError::InvalidPrefix((*bad).to_owned()));
    }
    if let Some(dup) = prefixes
        .iter()
        .enumerate()
        .find_map(|(i, p)| prefixes[..i].contains(p).then_some(*p))
    {
        return Err(LoadError::DuplicatePrefix(dup.to_owned()));
    }

    let index = load_article_index(index_path, options.sidebar.index_kind())?;

    let sidebar = match (&options.sidebar, &index) {
        (SidebarOptions::Flat(flat), ArticleIndex::Flat(entries)) => {
            tracing::info!(articles = entries.len(), "Building flat sidebar");
            build_flat_sidebar(entries, flat)
        }
        (
            SidebarOptions::Grouped {
                group_keys,
                options: grouped,
            },
            ArticleIndex::Grouped(buckets),
        ) => {
            tracing::info!(groups = buckets.len(), "Building grouped sidebar");
            build_grouped_sidebar(buckets, group_keys, grouped)
        }
        _ => unreachable!("load_article_index returns the requested kind"),
    };

    Ok(assemble_config(
        options.navigation.clone(),
        sidebar,
        options.theme.clone(),
        options.build.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_index(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sidebar_config.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn grouped_options(keys: &[&str]) -> LoadOptions {
        LoadOptions {
            sidebar: SidebarOptions::Grouped {
                group_keys: keys.iter().map(|&k| k.to_owned()).collect(),
                options: GroupedSidebarOptions::default(),
            },
            ..LoadOptions::default()
        }
    }

    #[test]
    fn test_load_flat_configuration() {
        let (_dir, path) = write_index(r#"[{"text":"A","link":"/a"},{"text":"B","link":"/b"}]"#);

        let config = load_configuration(&path, &LoadOptions::default()).unwrap();

        let sidebar = &config.theme.sidebar;
        assert_eq!(sidebar.prefixes().collect::<Vec<_>>(), vec!["/articles/", "/"]);
        assert_eq!(sidebar.get("/articles/").unwrap()[0].children.len(), 2);
        assert_eq!(sidebar.get("/").unwrap()[0].children.len(), 2);
        assert_eq!(config.title, "微信文章集");
    }

    #[test]
    fn test_load_grouped_configuration_with_missing_key() {
        let (_dir, path) = write_index(r#"{"X":[{"text":"A","link":"/a"}],"Y":[]}"#);

        let config = load_configuration(&path, &grouped_options(&["X", "Y", "Z"])).unwrap();

        let groups = config.theme.sidebar.get("/").unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(groups[0].children.len(), 1);
        assert!(groups[1].children.is_empty());
    }

    #[test]
    fn test_load_twice_is_deterministic() {
        let (_dir, path) = write_index(r#"{"X":[{"text":"A","link":"/a"}],"Y":[{"text":"B","link":"/b"}]}"#);
        let options = grouped_options(&["Y", "X"]);

        let first = load_configuration(&path, &options).unwrap();
        let second = load_configuration(&path, &options).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_load_malformed_index_fails() {
        let (_dir, path) = write_index("not json");

        let err = load_configuration(&path, &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, LoadError::Index(IndexError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_index_fails() {
        let err = load_configuration(Path::new("/nonexistent/index.json"), &LoadOptions::default())
            .unwrap_err();

        assert!(matches!(err, LoadError::Index(IndexError::NotFound(_))));
    }

    #[test]
    fn test_load_wrong_shape_for_policy_fails() {
        let (_dir, path) = write_index(r#"[{"text":"A","link":"/a"}]"#);

        let err = load_configuration(&path, &grouped_options(&["X"])).unwrap_err();

        assert!(matches!(err, LoadError::Index(IndexError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_prefix() {
        let (_dir, path) = write_index("[]");
        let options = LoadOptions {
            sidebar: SidebarOptions::Flat(FlatSidebarOptions {
                all_prefix: "articles".to_owned(),
                ..FlatSidebarOptions::default()
            }),
            ..LoadOptions::default()
        };

        let err = load_configuration(&path, &options).unwrap_err();

        assert!(matches!(err, LoadError::InvalidPrefix(ref p) if p == "articles"));
    }

    #[test]
    fn test_load_rejects_shared_flat_prefix() {
        let entries: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"text":"A{i}","link":"/a{i}"}}"#))
            .collect();
        let (_dir, path) = write_index(&format!("[{}]", entries.join(",")));
        let options = LoadOptions {
            sidebar: SidebarOptions::Flat(FlatSidebarOptions {
                all_prefix: "/".to_owned(),
                ..FlatSidebarOptions::default()
            }),
            ..LoadOptions::default()
        };

        let err = load_configuration(&path, &options).unwrap_err();

        assert!(matches!(err, LoadError::DuplicatePrefix(ref p) if p == "/"));
    }

    #[test]
    fn test_from_default_config_matches_default_options() {
        let config = Config::default();

        let options = LoadOptions::from_config(&config);

        assert_eq!(options.navigation, LoadOptions::default().navigation);
        assert_eq!(options.theme, ThemeFlags::default());
        assert_eq!(options.build, BuildOptions::default());
        assert_eq!(options.sidebar.index_kind(), IndexKind::Flat);
    }

    #[test]
    fn test_from_grouped_config() {
        let mut config = Config::default();
        config.sidebar.kind = SidebarKind::Grouped;
        config.sidebar.group_keys = vec!["A".to_owned()];
        config.sidebar.collapsible = true;

        let options = LoadOptions::from_config(&config);

        let SidebarOptions::Grouped {
            group_keys,
            options,
        } = options.sidebar
        else {
            panic!("Expected grouped sidebar options");
        };
        assert_eq!(group_keys, vec!["A"]);
        assert!(options.collapsible);
    }
}
