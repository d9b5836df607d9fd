//! Sidebar construction and site configuration assembly for wxdocs.
//!
//! This crate provides:
//! - [`build_flat_sidebar`] / [`build_grouped_sidebar`]: [`SidebarTree`]
//!   construction from the article index
//! - [`assemble_config`]: merge navigation, sidebar and theme flags into a
//!   [`SiteConfig`]
//! - [`load_configuration`]: the full index-to-config pipeline
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use wxdocs_site::{LoadOptions, load_configuration};
//!
//! let config = load_configuration(Path::new("sidebar_config.json"), &LoadOptions::default())?;
//! let json = serde_json::to_string_pretty(&config)?;
//! # Ok(())
//! # }
//! ```

mod loader;
mod sidebar;
mod site_config;

pub use loader::{LoadError, LoadOptions, SidebarOptions, load_configuration};
pub use sidebar::{
    FlatSidebarOptions, GroupedSidebarOptions, SidebarGroup, SidebarItem, SidebarTree,
    build_flat_sidebar, build_grouped_sidebar,
};
pub use site_config::{
    BuildOptions, NavigationEntry, SiteConfig, ThemeConfig, ThemeFlags, assemble_config,
};
