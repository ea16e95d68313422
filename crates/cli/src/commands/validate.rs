use super::load_site_config;
use newsdesk_validator::validate_collection;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let config = load_site_config(&path)?;
    println!("✓ newsdesk.toml valid");
    println!("  Site: {}", config.site.title);
    println!("  Content: {}", config.content.dir.display());

    let report = validate_collection(&path, &config);

    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!("{} content error(s) found", report.errors.len());
    }

    println!("\n✅ All posts valid");
    Ok(())
}
