//! Configuration management for wxdocs.
//!
//! Parses `wxdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. When no file is
//! found, the built-in defaults describe a WeChat article archive site.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields (free-text fields such as `site.title` are taken verbatim):
//! - `site.base`
//! - `site.dest`
//! - `index.path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base path.
    pub base: Option<String>,
    /// Override build output directory.
    pub dest: Option<String>,
    /// Override dev-server port.
    pub port: Option<u16>,
    /// Override article index file path.
    pub index_path: Option<PathBuf>,
    /// Override articles directory scanned by the indexer.
    pub articles_dir: Option<PathBuf>,
    /// Override sidebar construction policy.
    pub sidebar_kind: Option<SidebarKind>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wxdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-level options passed through to the site framework.
    pub site: SiteSection,
    /// Default theme flags.
    pub theme: ThemeSection,
    /// Top navigation bar entries.
    pub navbar: Vec<NavbarEntry>,
    /// Article index configuration (paths are relative strings from TOML).
    index: IndexConfigRaw,
    /// Sidebar construction policy.
    pub sidebar: SidebarConfig,

    /// Resolved index configuration (set after loading).
    #[serde(skip)]
    pub index_resolved: IndexConfig,
    /// Directory containing the config file, or the working directory.
    #[serde(skip)]
    pub project_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site-level options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Content language (e.g. `zh-CN`).
    pub lang: String,
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Base URL path the site is served under.
    pub base: String,
    /// Build output directory, relative to the framework's project root.
    pub dest: String,
    /// Dev-server port.
    pub port: u16,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            lang: "zh-CN".to_owned(),
            title: "微信文章集".to_owned(),
            description: "微信文章收藏与阅读".to_owned(),
            base: "/".to_owned(),
            dest: "dist".to_owned(),
            port: 8080,
        }
    }
}

/// Theme flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeSection {
    /// Heading depth shown in the sidebar.
    pub sidebar_depth: u32,
    /// Show "edit this page" links.
    pub edit_link: bool,
    /// Show last-updated timestamps.
    pub last_updated: bool,
    /// Label for the last-updated timestamp.
    pub last_updated_text: String,
    /// Show git contributors.
    pub contributors: bool,
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            sidebar_depth: 2,
            edit_link: false,
            last_updated: true,
            last_updated_text: "最后更新".to_owned(),
            contributors: false,
        }
    }
}

/// Navigation bar entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NavbarEntry {
    /// Display label.
    pub text: String,
    /// Link target.
    pub link: String,
}

impl NavbarEntry {
    fn new(text: &str, link: &str) -> Self {
        Self {
            text: text.to_owned(),
            link: link.to_owned(),
        }
    }
}

fn default_navbar() -> Vec<NavbarEntry> {
    vec![
        NavbarEntry::new("首页", "/"),
        NavbarEntry::new("文章列表", "/articles/"),
    ]
}

/// Sidebar construction policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarKind {
    /// One chronological list plus a recent-articles view.
    #[default]
    Flat,
    /// One group per source account.
    Grouped,
}

/// Sidebar configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Which sidebar shape to build (and which index shape to expect).
    pub kind: SidebarKind,
    /// Number of entries in the recent-articles view.
    pub recent_limit: usize,
    /// Path prefix for the full article list.
    pub all_prefix: String,
    /// Group label for the full article list.
    pub all_text: String,
    /// Path prefix for the recent-articles view.
    pub recent_prefix: String,
    /// Group label for the recent-articles view.
    pub recent_text: String,
    /// Path prefix for grouped sidebars.
    pub group_prefix: String,
    /// Source-account names, in display order.
    pub group_keys: Vec<String>,
    /// Render account groups as collapsible.
    pub collapsible: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            kind: SidebarKind::Flat,
            recent_limit: 20,
            all_prefix: "/articles/".to_owned(),
            all_text: "所有文章".to_owned(),
            recent_prefix: "/".to_owned(),
            recent_text: "最新文章".to_owned(),
            group_prefix: "/".to_owned(),
            group_keys: vec!["金渐层".to_owned(), "只做主升不做调整".to_owned()],
            collapsible: false,
        }
    }
}

/// Raw index configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct IndexConfigRaw {
    path: Option<String>,
    articles_dir: Option<String>,
    docs_root: Option<String>,
    link_prefix: Option<String>,
    exclude: Option<Vec<String>>,
}

/// Resolved article index configuration with absolute paths.
#[derive(Debug, Default)]
pub struct IndexConfig {
    /// Location of `sidebar_config.json`.
    pub path: PathBuf,
    /// Directory of articles for the flat index.
    pub articles_dir: PathBuf,
    /// Directory holding one subdirectory per account for the grouped index.
    pub docs_root: PathBuf,
    /// Link prefix for flat index entries.
    pub link_prefix: String,
    /// Extra filenames skipped by the indexer.
    pub exclude: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base`").
        field: String,
        /// Error message (e.g., "${`SITE_BASE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL path prefix to start and end with `/`.
fn require_slashed(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') || !value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start and end with '/' (got {value:?})"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wxdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base) = &settings.base {
            self.site.base.clone_from(base);
        }
        if let Some(dest) = &settings.dest {
            self.site.dest.clone_from(dest);
        }
        if let Some(port) = settings.port {
            self.site.port = port;
        }
        if let Some(index_path) = &settings.index_path {
            self.index_resolved.path.clone_from(index_path);
        }
        if let Some(articles_dir) = &settings.articles_dir {
            self.index_resolved.articles_dir.clone_from(articles_dir);
        }
        if let Some(kind) = settings.sidebar_kind {
            self.sidebar.kind = kind;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteSection::default(),
            theme: ThemeSection::default(),
            navbar: default_navbar(),
            index: IndexConfigRaw::default(),
            sidebar: SidebarConfig::default(),
            index_resolved: IndexConfig {
                path: base.join("sidebar_config.json"),
                articles_dir: base.join("docs/articles"),
                docs_root: base.join("docs"),
                link_prefix: "/articles/".to_owned(),
                exclude: Vec::new(),
            },
            project_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_navbar()?;
        self.validate_sidebar()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_slashed(&self.site.base, "site.base")?;
        require_non_empty(&self.site.dest, "site.dest")?;

        if self.site.port == 0 {
            return Err(ConfigError::Validation("site.port cannot be 0".to_owned()));
        }

        Ok(())
    }

    fn validate_navbar(&self) -> Result<(), ConfigError> {
        for (i, entry) in self.navbar.iter().enumerate() {
            require_non_empty(&entry.text, &format!("navbar[{i}].text"))?;
            require_non_empty(&entry.link, &format!("navbar[{i}].link"))?;
        }
        Ok(())
    }

    fn validate_sidebar(&self) -> Result<(), ConfigError> {
        let sidebar = &self.sidebar;
        match sidebar.kind {
            SidebarKind::Flat => {
                if sidebar.recent_limit == 0 {
                    return Err(ConfigError::Validation(
                        "sidebar.recent_limit must be greater than 0".to_owned(),
                    ));
                }
                require_slashed(&sidebar.all_prefix, "sidebar.all_prefix")?;
                require_slashed(&sidebar.recent_prefix, "sidebar.recent_prefix")?;
                if sidebar.all_prefix == sidebar.recent_prefix {
                    return Err(ConfigError::Validation(
                        "sidebar.all_prefix and sidebar.recent_prefix must differ".to_owned(),
                    ));
                }
            }
            SidebarKind::Grouped => {
                require_slashed(&sidebar.group_prefix, "sidebar.group_prefix")?;
                if sidebar.group_keys.is_empty() {
                    return Err(ConfigError::Validation(
                        "sidebar.group_keys cannot be empty for a grouped sidebar".to_owned(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base = expand::expand_env(&self.site.base, "site.base")?;
        self.site.dest = expand::expand_env(&self.site.dest, "site.dest")?;

        if let Some(ref path) = self.index.path {
            self.index.path = Some(expand::expand_env(path, "index.path")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.index_resolved = IndexConfig {
            path: resolve(self.index.path.as_deref(), "sidebar_config.json"),
            articles_dir: resolve(self.index.articles_dir.as_deref(), "docs/articles"),
            docs_root: resolve(self.index.docs_root.as_deref(), "docs"),
            link_prefix: self
                .index
                .link_prefix
                .clone()
                .unwrap_or_else(|| "/articles/".to_owned()),
            exclude: self.index.exclude.clone().unwrap_or_default(),
        };
        self.project_dir = config_dir.to_path_buf();
    }
}
