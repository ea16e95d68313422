//! Content schema validation and collection loading

pub mod date;
pub mod loader;
pub mod schema;
pub mod slug;

pub use loader::{collection_dir, discover_entries, load_collection, load_entry};
pub use schema::validate_entry;

use chrono::Utc;
use newsdesk_core::{SchemaVariant, SiteConfig};
use std::path::Path;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every entry of a site and collect all findings.
///
/// Unlike [`load_collection`], this keeps going after the first failure so
/// an author sees every broken entry at once.
pub fn validate_collection(site_root: &Path, config: &SiteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let dir = collection_dir(site_root, config);

    if !dir.is_dir() {
        report
            .errors
            .push(format!("Content directory not found: {}", dir.display()));
        return report;
    }

    let entries = match discover_entries(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    let now = Utc::now();
    let mut slugs = loader::SlugRegistry::default();
    let mut valid = 0;

    for relative in &entries {
        let post = match load_entry(&dir, relative, config) {
            Ok(post) => post,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };

        if let Err(e) = slugs.claim(&post, relative) {
            report.errors.push(e.to_string());
            continue;
        }

        if config.content.schema == SchemaVariant::AiModels && post.tags().is_empty() {
            report
                .warnings
                .push(format!("{}: no tags", relative.display()));
        }
        if post.date > now {
            report.warnings.push(format!(
                "{}: dated in the future ({})",
                relative.display(),
                post.date.format("%Y-%m-%d")
            ));
        }
        let body_chars = post.body.trim().chars().count();
        if body_chars == 0 {
            report
                .warnings
                .push(format!("{}: empty body", relative.display()));
        } else if body_chars < config.content.min_body_chars {
            report.warnings.push(format!(
                "{}: short body ({} characters, minimum {})",
                relative.display(),
                body_chars,
                config.content.min_body_chars
            ));
        }
        valid += 1;
    }

    report.info.push(format!(
        "Schema: {} ({} categories)",
        config.content.schema,
        config.content.schema.categories().len()
    ));
    report
        .info
        .push(format!("{} of {} entries valid", valid, entries.len()));

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::config::parse_site_toml_str;
    use std::fs;
    use tempfile::TempDir;

    fn site_with(posts: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = parse_site_toml_str(
            "[site]\ntitle = \"T\"\n\n[content]\ndir = \"posts\"\nschema = \"ai-models\"\n",
        )
        .unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_report_collects_every_error() {
        let (dir, config) = site_with(&[
            (
                "good.md",
                "---\ntitle: G\ndescription: d\ndate: 2024-01-01\ncategory: Grok\ntags: [x]\n---\nbody\n",
            ),
            (
                "bad-category.md",
                "---\ntitle: B\ndescription: d\ndate: 2024-01-01\ncategory: Bard\n---\nbody\n",
            ),
            (
                "bad-date.md",
                "---\ntitle: B\ndescription: d\ndate: someday\ncategory: Grok\n---\nbody\n",
            ),
        ]);

        let report = validate_collection(dir.path(), &config);
        assert!(!report.is_ok());
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.contains("bad-category.md")));
        assert!(report.errors.iter().any(|e| e.contains("date could not be parsed")));
        assert!(report.info.iter().any(|i| i == "1 of 3 entries valid"));
    }

    #[test]
    fn test_report_warnings() {
        let long_post = format!(
            "---\ntitle: L\ndescription: d\ndate: 2024-01-01\ncategory: Claude\ntags: [x]\n---\n{}\n",
            "word ".repeat(200)
        );
        let (dir, mut config) = site_with(&[
            (
                "future.md",
                "---\ntitle: F\ndescription: d\ndate: 2999-01-01\ncategory: Claude\n---\n",
            ),
            (
                "short.md",
                "---\ntitle: S\ndescription: d\ndate: 2024-01-01\ncategory: Claude\ntags: [x]\n---\nToo brief.\n",
            ),
            ("long.md", long_post.as_str()),
        ]);

        let report = validate_collection(dir.path(), &config);
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("no tags")));
        assert!(report.warnings.iter().any(|w| w.contains("dated in the future")));
        assert!(report.warnings.iter().any(|w| w.contains("future.md: empty body")));
        assert!(
            report
                .warnings
                .contains(&"short.md: short body (10 characters, minimum 800)".to_string())
        );
        assert!(!report.warnings.iter().any(|w| w.starts_with("long.md")));
        assert!(!report.warnings.iter().any(|w| w.starts_with("future.md: short body")));

        config.content.min_body_chars = 0;
        let report = validate_collection(dir.path(), &config);
        assert!(!report.warnings.iter().any(|w| w.contains("short body")));
    }

    #[test]
    fn test_report_missing_directory() {
        let (dir, config) = site_with(&[]);
        fs::remove_dir_all(dir.path().join("posts")).unwrap();
        let report = validate_collection(dir.path(), &config);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Content directory not found"));
    }
}
