pub mod build;
pub mod init;
pub mod new;
pub mod preview;
pub mod validate;

use anyhow::{Context, Result};
use newsdesk_core::{CONFIG_FILE, Collection, SiteConfig, parse_site_toml};
use newsdesk_validator::load_collection;
use std::path::Path;

/// Check the site directory exists and parse its newsdesk.toml
pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'newsdesk init {}' first",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'newsdesk init {}' first",
            CONFIG_FILE,
            path.display(),
            path.display()
        );
    }

    parse_site_toml(&config_path).with_context(|| format!("Failed to parse {}", CONFIG_FILE))
}

/// Fresh config and collection straight from disk
pub fn load_site(path: &Path) -> newsdesk_core::Result<(SiteConfig, Collection)> {
    let config = parse_site_toml(path.join(CONFIG_FILE))?;
    let collection = load_collection(path, &config)?;
    Ok((config, collection))
}
