use super::load_site_config;
use anyhow::{Context, Result};
use newsdesk_generator::generate_site;
use newsdesk_validator::load_collection;
use std::fs;
use std::path::{Path, PathBuf};

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let count = build_site(&path, &output)?;

    println!();
    println!("✅ Build complete!");
    println!("   {} files written to {}", count, output.display());
    println!();
    println!("To test locally:");
    println!("   newsdesk preview {}", path.display());
    println!();

    Ok(())
}

/// Load, validate and write the site. Nothing is written if loading fails.
pub fn build_site(path: &Path, output: &Path) -> Result<usize> {
    let config = load_site_config(path)?;

    let collection =
        load_collection(path, &config).context("Failed to load content collection")?;
    println!("✓ Loaded: {}", config.site.title);
    println!("  Schema: {}", config.content.schema);
    println!("  Posts: {}", collection.len());

    println!("📄 Generating pages and search index...");
    let site = generate_site(&config, &collection).context("Failed to generate site")?;

    fs::create_dir_all(output).context("Failed to create output directory")?;
    let written = site
        .write_to(output)
        .with_context(|| format!("Failed to write site to {}", output.display()))?;
    println!("   ✓ Generated {} pages", site.pages.len());
    println!("   ✓ Generated search.json");

    Ok(written)
}
