use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-site configuration
pub const CONFIG_FILE: &str = "newsdesk.toml";

/// Collection directory used when `content.dir` is omitted
pub const DEFAULT_CONTENT_DIR: &str = "src/content/posts";

/// Editorial minimum body length used when `content.min_body_chars` is omitted
pub const DEFAULT_MIN_BODY_CHARS: usize = 800;

/// Raw TOML configuration structure
/// This matches the newsdesk.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    content: RawContent,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    title: String,
    url: Option<String>,
    base: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    dir: Option<String>, // Convert to PathBuf
    schema: SchemaVariant,
    min_body_chars: Option<usize>,
    #[serde(default)]
    defaults: RawDefaults,
}

#[derive(Debug, Default, Deserialize)]
struct RawDefaults {
    image: Option<String>,
    reading_time: Option<String>,
    author: Option<String>,
}

/// Parse newsdesk.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse newsdesk.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.site.title.trim().is_empty() {
        return Err(Error::ConfigParse("site.title must not be empty".to_string()));
    }

    let base = normalize_base(raw.site.base.as_deref().unwrap_or("/"));

    let dir = validate_path(
        raw.content.dir.as_deref().unwrap_or(DEFAULT_CONTENT_DIR),
        "content.dir",
    )?;

    let fallback = PostDefaults::default();
    let defaults = PostDefaults {
        image: raw.content.defaults.image.unwrap_or(fallback.image),
        reading_time: raw
            .content
            .defaults
            .reading_time
            .unwrap_or(fallback.reading_time),
        author: raw.content.defaults.author.unwrap_or(fallback.author),
    };

    Ok(SiteConfig {
        site: SiteMetadata {
            title: raw.site.title,
            url: raw.site.url,
            base,
        },
        content: ContentConfig {
            dir,
            schema: raw.content.schema,
            defaults,
            min_body_chars: raw
                .content
                .min_body_chars
                .unwrap_or(DEFAULT_MIN_BODY_CHARS),
        },
    })
}

/// Force a base path into `/segment/` form. `""` and `"/"` both become `"/"`.
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so a
/// newsdesk.toml cannot point the loader outside the site directory.
///
/// ```text
/// validate_path("src/content/posts", "content.dir")  → Ok(PathBuf)
/// validate_path("/etc", "content.dir")               → Err("Absolute paths not allowed...")
/// validate_path("../other-site", "content.dir")      → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
