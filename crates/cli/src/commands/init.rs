use anyhow::{Context, Result};
use chrono::Local;
use newsdesk_core::config::DEFAULT_CONTENT_DIR;
use newsdesk_core::{CONFIG_FILE, SchemaVariant, parse_site_toml};
use std::fs;
use std::path::{Path, PathBuf};

use super::new::yaml_quote;

const SAMPLE_POST: &str = "welcome.md";

/// Escape a string for safe inclusion in a TOML v1.0.0 basic string
///
/// Handles the required escape sequences for TOML basic strings:
/// backslash, quote, backspace, form feed, newline, carriage return, tab.
///
/// The config is written by hand rather than through the toml serializer
/// so the generated file keeps its explanatory comments.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a new site directory.
///
/// Creates `newsdesk.toml`, the content directory and one sample post that
/// passes the chosen schema. Existing files are left untouched, so running
/// it twice is harmless.
pub async fn run(path: PathBuf, schema: SchemaVariant, title: String) -> Result<()> {
    println!("📰 Initializing site at: {}", path.display());
    println!("   Schema: {}", schema);

    let created = init_site(&path, schema, &title)?;
    if created.is_empty() {
        println!("   Nothing to do, site already initialized");
    }
    for file in &created {
        println!("   ✓ Created {}", file.display());
    }

    println!();
    println!("Next steps:");
    println!("   newsdesk new {} --title \"...\" --category ...", path.display());
    println!("   newsdesk preview {}", path.display());

    Ok(())
}

/// Scaffold the site, returning the files that were actually written.
///
/// An existing newsdesk.toml wins: its content directory and schema decide
/// where the sample post goes and which fields it carries.
fn init_site(base: &Path, schema: SchemaVariant, title: &str) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    fs::create_dir_all(base).with_context(|| format!("Failed to create {}", base.display()))?;

    let config_path = base.join(CONFIG_FILE);
    let (content_dir, schema) = if config_path.exists() {
        let existing = parse_site_toml(&config_path)
            .with_context(|| format!("Failed to parse existing {}", CONFIG_FILE))?;
        (base.join(existing.content.dir), existing.content.schema)
    } else {
        fs::write(&config_path, generate_site_toml(title, schema))
            .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;
        created.push(config_path);
        (base.join(DEFAULT_CONTENT_DIR), schema)
    };

    fs::create_dir_all(&content_dir)
        .with_context(|| format!("Failed to create {}", content_dir.display()))?;

    let has_posts = fs::read_dir(&content_dir)?
        .flatten()
        .any(|e| e.path().extension().is_some_and(|ext| ext == "md"));
    if !has_posts {
        let sample = content_dir.join(SAMPLE_POST);
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        fs::write(&sample, generate_sample_post(schema, &today))
            .context("Failed to write sample post")?;
        created.push(sample);
    }

    Ok(created)
}

fn generate_site_toml(title: &str, schema: SchemaVariant) -> String {
    let defaults = match schema {
        SchemaVariant::AiModels => {
            r#"
# Values used when a post leaves these fields out
# [content.defaults]
# image = "/images/placeholder.jpg"
# reading_time = "5 Minutes"
# author = "AI News Team"
"#
        }
        SchemaVariant::Newsroom => "",
    };

    format!(
        r#"# newsdesk site configuration

[site]
title = "{}"
# url = "https://example.github.io"
# Path prefix when the site is not served from the domain root
base = "/"

[content]
dir = "{}"
# One of: newsroom, ai-models
schema = "{}"
# Bodies shorter than this draw a warning from 'newsdesk validate' (0 disables)
# min_body_chars = 800
{}"#,
        toml_escape_string(title),
        DEFAULT_CONTENT_DIR,
        schema,
        defaults
    )
}

fn generate_sample_post(schema: SchemaVariant, date: &str) -> String {
    match schema {
        SchemaVariant::Newsroom => format!(
            "---\ntitle: {}\ndate: {}\ncategory: \"Technology\"\nsource: \"Mixed\"\ntags: [\"welcome\"]\nsummary: {}\n---\n\nReplace this post with your first story.\n",
            yaml_quote("Welcome to the newsroom"),
            date,
            yaml_quote("How posts are organized on this site.")
        ),
        SchemaVariant::AiModels => format!(
            "---\ntitle: {}\ndescription: {}\ndate: {}\ncategory: \"ModelEval\"\ntags: [\"welcome\"]\n---\n\nReplace this post with your first model report.\n",
            yaml_quote("Welcome to AI News"),
            yaml_quote("How model coverage is organized on this site."),
            date
        ),
    }
}
