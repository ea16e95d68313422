use super::load_site_config;
use anyhow::{Context, Result};
use chrono::Local;
use newsdesk_core::{Category, SchemaVariant, SiteConfig, join_labels, parse_entry};
use newsdesk_validator::{slug::slugify, validate_collection, validate_entry};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, clap::Args)]
pub struct NewPost {
    /// Post title
    #[arg(long)]
    pub title: String,

    /// Category label, must belong to the site schema
    #[arg(long)]
    pub category: String,

    /// Description (stored as `summary` on newsroom sites)
    #[arg(long)]
    pub description: Option<String>,

    /// Tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Provenance: Google, OpenAI, Anthropic or Mixed
    #[arg(long)]
    pub source: Option<String>,

    /// Publication date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

/// Quote a string as a YAML double-quoted scalar
pub fn yaml_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn yaml_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| yaml_quote(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Render the markdown file for a new post
fn render_post(schema: SchemaVariant, post: &NewPost, date: &str) -> String {
    let mut fm = String::from("---\n");
    fm.push_str(&format!("title: {}\n", yaml_quote(&post.title)));

    let description_key = match schema {
        SchemaVariant::Newsroom => "summary",
        SchemaVariant::AiModels => "description",
    };
    if let Some(description) = &post.description {
        fm.push_str(&format!("{}: {}\n", description_key, yaml_quote(description)));
    }

    fm.push_str(&format!("date: {}\n", yaml_quote(date)));
    fm.push_str(&format!("category: {}\n", yaml_quote(&post.category)));

    if schema == SchemaVariant::Newsroom || !post.tags.is_empty() {
        fm.push_str(&format!("tags: {}\n", yaml_list(&post.tags)));
    }
    if let Some(source) = &post.source {
        fm.push_str(&format!("source: {}\n", yaml_quote(source)));
    }
    fm.push_str("---\n\n");
    fm
}

/// Validate and write a new post, returning its path. Never overwrites.
fn create_post(site: &Path, config: &SiteConfig, post: &NewPost) -> Result<PathBuf> {
    let schema = config.content.schema;
    if !Category::from_label(&post.category).is_some_and(|c| schema.accepts(c)) {
        anyhow::bail!(
            "category must be one of {}, got '{}'",
            join_labels(schema.categories().iter().map(|c| c.as_str())),
            post.category
        );
    }

    let date = match &post.date {
        Some(d) => d.clone(),
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let slug = slugify(&post.title);
    if slug.is_empty() {
        anyhow::bail!("title '{}' does not produce a usable file name", post.title);
    }
    let relative = PathBuf::from(format!("{}.md", slug));
    let target = site.join(&config.content.dir).join(&relative);
    if target.exists() {
        anyhow::bail!("{} already exists", target.display());
    }

    let content = render_post(schema, post, &date);
    let raw = parse_entry(&content).context("Generated frontmatter did not parse")?;
    validate_entry(schema, &config.content.defaults, &relative, &raw)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, content).with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::debug!(path = %target.display(), "wrote new post");

    Ok(target)
}

pub async fn run(path: PathBuf, post: NewPost) -> Result<()> {
    let config = load_site_config(&path)?;
    let target = create_post(&path, &config, &post)?;
    println!("📝 Created {}", target.display());

    let report = validate_collection(&path, &config);
    if !report.is_ok() {
        println!(
            "   ⚠ collection has {} other error(s), run 'newsdesk validate {}'",
            report.errors.len(),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::Source;
    use newsdesk_core::config::parse_site_toml_str;
    use newsdesk_validator::load_collection;
    use tempfile::TempDir;

    fn site(schema: &str) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = parse_site_toml_str(&format!(
            "[site]\ntitle = \"T\"\n\n[content]\nschema = \"{}\"\n",
            schema
        ))
        .unwrap();
        (dir, config)
    }

    fn new_post(title: &str, category: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            category: category.to_string(),
            description: Some("What happened: \"a lot\"\nand more".to_string()),
            tags: vec!["ai".to_string(), "it's".to_string()],
            source: None,
            date: Some("2024-03-01".to_string()),
        }
    }

    #[test]
    fn test_yaml_quote() {
        assert_eq!(yaml_quote("plain"), "\"plain\"");
        assert_eq!(yaml_quote("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(yaml_quote("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(yaml_quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(yaml_quote("bell\u{7}"), "\"bell\\u0007\"");
    }

    #[test]
    fn test_create_post_round_trips_through_loader() {
        let (dir, config) = site("ai-models");
        let path = create_post(dir.path(), &config, &new_post("Grok 3: First Look", "Grok")).unwrap();
        assert!(path.ends_with("grok-3-first-look.md"));

        let collection = load_collection(dir.path(), &config).unwrap();
        let post = &collection.posts[0];
        assert_eq!(post.slug, "grok-3-first-look");
        assert_eq!(post.title, "Grok 3: First Look");
        assert_eq!(post.description, "What happened: \"a lot\"\nand more");
        assert_eq!(post.tags(), ["ai", "it's"]);
        assert_eq!(post.reading_time.as_deref(), Some("5 Minutes"));
    }

    #[test]
    fn test_create_post_newsroom_writes_summary() {
        let (dir, config) = site("newsroom");
        let mut post = new_post("Cup final", "Sports");
        post.source = Some("Mixed".to_string());
        let path = create_post(dir.path(), &config, &post).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("summary: "));
        let collection = load_collection(dir.path(), &config).unwrap();
        assert_eq!(collection.posts[0].source, Some(Source::Mixed));
    }

    #[test]
    fn test_create_post_rejects_bad_category() {
        let (dir, config) = site("ai-models");
        let err = create_post(dir.path(), &config, &new_post("X", "World")).unwrap_err();
        assert!(err.to_string().contains("category must be one of"));
        assert!(!dir.path().join(&config.content.dir).join("x.md").exists());
    }

    #[test]
    fn test_create_post_rejects_missing_required_field() {
        let (dir, config) = site("newsroom");
        // newsroom requires a source
        let err = create_post(dir.path(), &config, &new_post("Y", "World")).unwrap_err();
        assert!(err.to_string().contains("source is required"));
        assert!(!dir.path().join(&config.content.dir).join("y.md").exists());
    }

    #[test]
    fn test_create_post_rejects_bad_date() {
        let (dir, config) = site("ai-models");
        let mut post = new_post("Z", "Claude");
        post.date = Some("not a date".to_string());
        let err = create_post(dir.path(), &config, &post).unwrap_err();
        assert!(err.to_string().contains("date could not be parsed"));
    }

    #[test]
    fn test_create_post_never_overwrites() {
        let (dir, config) = site("ai-models");
        create_post(dir.path(), &config, &new_post("Same", "Claude")).unwrap();
        let err = create_post(dir.path(), &config, &new_post("Same", "Claude")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
