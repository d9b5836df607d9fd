//! Final site configuration handed to the site framework.

use serde::Serialize;

use crate::sidebar::SidebarTree;

/// Top navigation bar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Display label.
    pub text: String,
    /// Link target.
    pub link: String,
}

impl NavigationEntry {
    /// Create a new navigation entry.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }

    /// Whether the link points inside the site (as opposed to an external URL).
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.link.starts_with('/')
    }
}

/// Fixed theme flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeFlags {
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

impl Default for ThemeFlags {
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

/// Scalar site and build options, passed through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Content language.
    pub lang: String,
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Base URL path.
    pub base: String,
    /// Build output directory.
    pub dest: String,
    /// Dev-server port.
    pub port: u16,
}

impl Default for BuildOptions {
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

/// Theme section of [`SiteConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Navigation bar links.
    pub navbar: Vec<NavigationEntry>,
    /// Sidebar tree keyed by path prefix.
    pub sidebar: SidebarTree,
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

/// Complete configuration object consumed by the site framework.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Content language.
    pub lang: String,
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Base URL path.
    pub base: String,
    /// Build output directory.
    pub dest: String,
    /// Dev-server port.
    pub port: u16,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl SiteConfig {
    /// Internal navigation links that fall under no sidebar prefix.
    ///
    /// Such links render without a sidebar or resolve to a missing page.
    #[must_use]
    pub fn uncovered_nav_links(&self) -> Vec<&NavigationEntry> {
        self.theme
            .navbar
            .iter()
            .filter(|entry| entry.is_internal())
            .filter(|entry| self.theme.sidebar.scope_for(&entry.link).is_none())
            .collect()
    }
}

/// Merge navigation, sidebar, theme flags and build options into a
/// [`SiteConfig`].
///
/// Navigation links not covered by any sidebar prefix are logged as warnings.
#[must_use]
pub fn assemble_config(
    navigation: Vec<NavigationEntry>,
    sidebar: SidebarTree,
    theme: ThemeFlags,
    build: BuildOptions,
) -> SiteConfig {
    let config = SiteConfig {
        lang: build.lang,
        title: build.title,
        description: build.description,
        base: build.base,
        dest: build.dest,
        port: build.port,
        theme: ThemeConfig {
            navbar: navigation,
            sidebar,
            sidebar_depth: theme.sidebar_depth,
            edit_link: theme.edit_link,
            last_updated: theme.last_updated,
            last_updated_text: theme.last_updated_text,
            contributors: theme.contributors,
        },
    };

    for entry in config.uncovered_nav_links() {
        tracing::warn!(
            text = %entry.text,
            link = %entry.link,
            "Navigation link is not covered by any sidebar prefix"
        );
    }

    config
}
