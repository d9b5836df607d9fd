//! `wxdocs build` command implementation.

use std::path::PathBuf;

use clap::Args;
use wxdocs_config::{CliSettings, Config};
use wxdocs_site::{LoadOptions, SidebarOptions, SiteConfig, load_configuration};

use super::{KindArg, write_file};
use crate::error::CliError;
use crate::output::Output;

/// Default filename for the generated site configuration.
const SITE_CONFIG_FILENAME: &str = "site.config.json";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover wxdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Article index file (overrides config).
    #[arg(long)]
    index: Option<PathBuf>,

    /// Base URL path (overrides config).
    #[arg(long)]
    base: Option<String>,

    /// Build output directory (overrides config).
    #[arg(long)]
    dest: Option<String>,

    /// Dev-server port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Sidebar policy (overrides config).
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Where to write the site configuration (default: site.config.json
    /// next to wxdocs.toml).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base: self.base,
            dest: self.dest,
            port: self.port,
            index_path: self.index,
            sidebar_kind: self.kind.map(Into::into),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let index_path = &config.index_resolved.path;
        output.info(&format!("Article index: {}", index_path.display()));

        let options = LoadOptions::from_config(&config);
        let site = load_configuration(index_path, &options)?;

        for key in missing_groups(&options, &site) {
            output.warning(&format!("No articles in the index for account {key}"));
        }

        for entry in site.uncovered_nav_links() {
            output.warning(&format!(
                "Navigation link {} ({}) has no sidebar",
                entry.link, entry.text
            ));
        }

        let out_path = self
            .output
            .unwrap_or_else(|| config.project_dir.join(SITE_CONFIG_FILENAME));
        let json = serde_json::to_string_pretty(&site)?;
        write_file(&out_path, &json)?;

        output.success(&format!(
            "Site configuration written to {}",
            out_path.display()
        ));
        Ok(())
    }
}

/// Configured group keys that produced no sidebar group.
fn missing_groups<'a>(options: &'a LoadOptions, site: &SiteConfig) -> Vec<&'a str> {
    let SidebarOptions::Grouped {
        group_keys,
        options: grouped,
    } = &options.sidebar
    else {
        return Vec::new();
    };
    let groups = site.theme.sidebar.get(&grouped.prefix).unwrap_or_default();
    group_keys
        .iter()
        .map(String::as_str)
        .filter(|key| !groups.iter().any(|g| g.text == *key))
        .collect()
}
