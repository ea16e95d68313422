//! Post schema enforcement
//!
//! Turns a [`RawEntry`] into a typed [`Post`] for the site's [`SchemaVariant`].
//! Unknown frontmatter keys are ignored. A `null` value counts as absent.

use crate::date::coerce_date;
use crate::slug::{slug_from_path, slugify};
use newsdesk_core::{
    Category, Error, Post, PostDefaults, RawEntry, Result, SchemaVariant, Source, join_labels,
};
use serde_yaml::Value;
use std::path::Path;

/// Frontmatter accessor that reports failures against one entry
struct Fields<'a> {
    entry: &'a str,
    raw: &'a RawEntry,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.raw.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn fail(&self, field: &str, message: impl Into<String>) -> Error {
        Error::schema(self.entry, field, message)
    }

    fn optional_text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.fail(
                key,
                format!("{} must be a string, got {}", key, describe(other)),
            )),
        }
    }

    fn required_text(&self, key: &str) -> Result<String> {
        let text = self
            .optional_text(key)?
            .ok_or_else(|| self.fail(key, format!("{} is required", key)))?;
        if text.trim().is_empty() {
            return Err(self.fail(key, format!("{} must not be empty", key)));
        }
        Ok(text)
    }

    fn required_category(&self, variant: SchemaVariant) -> Result<Category> {
        let allowed = || join_labels(variant.categories().iter().map(|c| c.as_str()));
        let label = self.optional_text("category")?.ok_or_else(|| {
            self.fail(
                "category",
                format!("category is required, one of {}", allowed()),
            )
        })?;

        Category::from_label(&label)
            .filter(|c| variant.accepts(*c))
            .ok_or_else(|| {
                self.fail(
                    "category",
                    format!("category must be one of {}, got '{}'", allowed(), label),
                )
            })
    }

    fn optional_source(&self) -> Result<Option<Source>> {
        let Some(label) = self.optional_text("source")? else {
            return Ok(None);
        };
        Source::from_label(&label).map(Some).ok_or_else(|| {
            self.fail(
                "source",
                format!(
                    "source must be one of {}, got '{}'",
                    join_labels(Source::ALL.iter().map(|s| s.as_str())),
                    label
                ),
            )
        })
    }

    fn optional_tags(&self) -> Result<Option<Vec<String>>> {
        let Some(value) = self.get("tags") else {
            return Ok(None);
        };
        let Value::Sequence(items) = value else {
            return Err(self.fail(
                "tags",
                format!("tags must be a list of strings, got {}", describe(value)),
            ));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.fail(
                    "tags",
                    format!("tags[{}] must be a string, got {}", i, describe(other)),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn required_date(&self) -> Result<chrono::DateTime<chrono::Utc>> {
        let value = self
            .get("date")
            .ok_or_else(|| self.fail("date", "date is required"))?;
        coerce_date(value).ok_or_else(|| {
            self.fail(
                "date",
                format!("date could not be parsed from {}", describe(value)),
            )
        })
    }

    fn slug(&self, relative: &Path) -> Result<String> {
        let slug = match self.optional_text("slug")? {
            Some(explicit) => self.explicit_slug(&explicit)?,
            None => slug_from_path(relative),
        };
        if slug.is_empty() {
            return Err(self.fail("slug", "slug must not be empty"));
        }
        Ok(slug)
    }

    /// A frontmatter slug becomes an output path, so every segment must
    /// stay a plain name after slugifying.
    fn explicit_slug(&self, explicit: &str) -> Result<String> {
        let trimmed = explicit.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            let segment = segment.trim();
            if segment == "." || segment == ".." {
                return Err(self.fail(
                    "slug",
                    format!("slug '{}' must not contain '{}' segments", explicit, segment),
                ));
            }
            let cleaned = slugify(segment);
            if cleaned.is_empty() {
                return Err(self.fail(
                    "slug",
                    format!("slug '{}' contains an empty segment", explicit),
                ));
            }
            segments.push(cleaned);
        }
        Ok(segments.join("/"))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("'{}'", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(t) => format!("tagged value {}", t.tag),
    }
}

/// Validate one raw entry against the site schema.
///
/// `relative` is the entry's path under the collection directory; it names
/// the entry in errors and seeds the slug.
pub fn validate_entry(
    variant: SchemaVariant,
    defaults: &PostDefaults,
    relative: &Path,
    raw: &RawEntry,
) -> Result<Post> {
    let entry = relative.display().to_string();
    let fields = Fields { entry: &entry, raw };

    let title = fields.required_text("title")?;
    let date = fields.required_date()?;
    let category = fields.required_category(variant)?;
    let slug = fields.slug(relative)?;

    let post = match variant {
        SchemaVariant::Newsroom => {
            let source = fields
                .optional_source()?
                .ok_or_else(|| fields.fail("source", "source is required"))?;
            let tags = fields
                .optional_tags()?
                .ok_or_else(|| fields.fail("tags", "tags is required"))?;
            let description = if fields.get("summary").is_some() {
                fields.required_text("summary")?
            } else if fields.get("description").is_some() {
                fields.required_text("description")?
            } else {
                return Err(fields.fail("summary", "summary is required"));
            };

            Post {
                slug,
                title,
                description,
                category,
                date,
                source: Some(source),
                tags: Some(tags),
                image: fields.optional_text("heroImage")?,
                reading_time: fields.optional_text("readingTime")?,
                author: None,
                body: raw.body.clone(),
            }
        }
        SchemaVariant::AiModels => Post {
            slug,
            title,
            description: fields.required_text("description")?,
            category,
            date,
            source: fields.optional_source()?,
            tags: fields.optional_tags()?,
            image: Some(
                fields
                    .optional_text("image")?
                    .unwrap_or_else(|| defaults.image.clone()),
            ),
            reading_time: Some(
                fields
                    .optional_text("readingTime")?
                    .unwrap_or_else(|| defaults.reading_time.clone()),
            ),
            author: Some(
                fields
                    .optional_text("author")?
                    .unwrap_or_else(|| defaults.author.clone()),
            ),
            body: raw.body.clone(),
        },
    };

    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use newsdesk_core::parse_entry;

    fn validate(variant: SchemaVariant, path: &str, content: &str) -> Result<Post> {
        let raw = parse_entry(content).unwrap();
        validate_entry(variant, &PostDefaults::default(), Path::new(path), &raw)
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::SchemaValidation { field, .. } => field,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    const AI_POST: &str = r#"---
title: "Claude ships a new model"
description: "What changed"
date: 2024-01-01
category: "Claude"
---

Body text.
"#;

    const NEWSROOM_POST: &str = r#"---
title: "Markets rally"
date: 2024-02-03
category: "Business"
source: "Mixed"
tags: ["markets", "stocks"]
summary: "Stocks are up"
heroImage: "/img/rally.jpg"
---
Body
"#;

    #[test]
    fn test_ai_models_applies_defaults() {
        let post = validate(SchemaVariant::AiModels, "claude-new.md", AI_POST).unwrap();
        assert_eq!(post.slug, "claude-new");
        assert_eq!(post.category, Category::Claude);
        assert_eq!(post.date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(post.reading_time.as_deref(), Some("5 Minutes"));
        assert_eq!(post.image.as_deref(), Some(PostDefaults::IMAGE));
        assert_eq!(post.author.as_deref(), Some(PostDefaults::AUTHOR));
        assert_eq!(post.tags, None);
        assert_eq!(post.source, None);
        assert_eq!(post.body, "Body text.\n");
    }

    #[test]
    fn test_ai_models_explicit_values_beat_defaults() {
        let content = r#"---
title: "T"
description: "D"
date: "2024-05-05"
category: "ModelEval"
readingTime: "12 Minutes"
author: "Lin"
image: "/img/x.png"
source: "OpenAI"
tags: []
---
"#;
        let post = validate(SchemaVariant::AiModels, "x.md", content).unwrap();
        assert_eq!(post.reading_time.as_deref(), Some("12 Minutes"));
        assert_eq!(post.author.as_deref(), Some("Lin"));
        assert_eq!(post.image.as_deref(), Some("/img/x.png"));
        assert_eq!(post.source, Some(Source::OpenAi));
        assert_eq!(post.tags, Some(vec![]));
    }

    #[test]
    fn test_configured_defaults_are_used() {
        let raw = parse_entry(AI_POST).unwrap();
        let defaults = PostDefaults {
            image: "/og.png".to_string(),
            reading_time: "1 Minute".to_string(),
            author: "Bot".to_string(),
        };
        let post = validate_entry(SchemaVariant::AiModels, &defaults, Path::new("a.md"), &raw)
            .unwrap();
        assert_eq!(post.reading_time.as_deref(), Some("1 Minute"));
        assert_eq!(post.author.as_deref(), Some("Bot"));
        assert_eq!(post.image.as_deref(), Some("/og.png"));
    }

    #[test]
    fn test_newsroom_maps_summary_and_hero_image() {
        let post = validate(SchemaVariant::Newsroom, "markets.md", NEWSROOM_POST).unwrap();
        assert_eq!(post.description, "Stocks are up");
        assert_eq!(post.image.as_deref(), Some("/img/rally.jpg"));
        assert_eq!(post.source, Some(Source::Mixed));
        assert_eq!(post.tags(), ["markets", "stocks"]);
        assert_eq!(post.reading_time, None);
        assert_eq!(post.author, None);
    }

    #[test]
    fn test_newsroom_accepts_description_alias() {
        let content = NEWSROOM_POST.replace("summary:", "description:");
        let post = validate(SchemaVariant::Newsroom, "m.md", &content).unwrap();
        assert_eq!(post.description, "Stocks are up");
    }

    #[test]
    fn test_newsroom_requires_source_and_tags() {
        let no_source = NEWSROOM_POST.replace("source: \"Mixed\"\n", "");
        let err = validate(SchemaVariant::Newsroom, "m.md", &no_source).unwrap_err();
        assert_eq!(field_of(err), "source");

        let no_tags = NEWSROOM_POST.replace("tags: [\"markets\", \"stocks\"]\n", "");
        let err = validate(SchemaVariant::Newsroom, "m.md", &no_tags).unwrap_err();
        assert_eq!(field_of(err), "tags");

        let no_summary = NEWSROOM_POST.replace("summary: \"Stocks are up\"\n", "");
        let err = validate(SchemaVariant::Newsroom, "m.md", &no_summary).unwrap_err();
        assert_eq!(field_of(err), "summary");
    }

    #[test]
    fn test_invalid_category_rejected() {
        let content = AI_POST.replace("\"Claude\"", "\"InvalidCategory\"");
        let err = validate(SchemaVariant::AiModels, "bad.md", &content).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.md"));
        assert!(msg.contains(
            "category must be one of [Google, Claude, ChatGPT, Grok, Qianwen, ModelEval]"
        ));
        assert!(msg.contains("'InvalidCategory'"));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let content = AI_POST.replace("\"Claude\"", "\"claude\"");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert_eq!(field_of(err), "category");
    }

    #[test]
    fn test_category_from_other_variant_rejected() {
        let content = AI_POST.replace("\"Claude\"", "\"World\"");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert_eq!(field_of(err), "category");

        let content = NEWSROOM_POST.replace("\"Business\"", "\"Grok\"");
        let err = validate(SchemaVariant::Newsroom, "a.md", &content).unwrap_err();
        assert_eq!(field_of(err), "category");
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let content = AI_POST.replace("date: 2024-01-01", "date: \"sometime soon\"");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert!(err.to_string().contains("date could not be parsed"));
    }

    #[test]
    fn test_missing_title_and_empty_title() {
        let content = AI_POST.replace("title: \"Claude ships a new model\"\n", "");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert!(err.to_string().contains("title is required"));

        let content = AI_POST.replace("\"Claude ships a new model\"", "\"  \"");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert!(err.to_string().contains("title must not be empty"));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let content = AI_POST.replace("title: \"Claude ships a new model\"", "title: 42");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert!(err.to_string().contains("title must be a string, got number 42"));

        let content = AI_POST.replace("---\n\nBody", "tags: [\"ok\", 3]\n---\n\nBody");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert!(err.to_string().contains("tags[1] must be a string"));
    }

    #[test]
    fn test_invalid_source_rejected() {
        let content = AI_POST.replace("---\n\nBody", "source: \"Meta\"\n---\n\nBody");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert_eq!(field_of(err), "source");
    }

    #[test]
    fn test_unknown_fields_ignored_and_null_is_absent() {
        let content = AI_POST.replace(
            "---\n\nBody",
            "draft: true\nimage: ~\nextra:\n  nested: 1\n---\n\nBody",
        );
        let post = validate(SchemaVariant::AiModels, "a.md", &content).unwrap();
        assert_eq!(post.image.as_deref(), Some(PostDefaults::IMAGE));
    }

    #[test]
    fn test_slug_override_from_frontmatter() {
        let content = AI_POST.replace("---\n\nBody", "slug: \"custom/path/\"\n---\n\nBody");
        let post = validate(SchemaVariant::AiModels, "ignored.md", &content).unwrap();
        assert_eq!(post.slug, "custom/path");

        let content = AI_POST.replace("---\n\nBody", "slug: \"/\"\n---\n\nBody");
        let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
        assert_eq!(field_of(err), "slug");
    }

    #[test]
    fn test_slug_override_is_slugified_per_segment() {
        let content = AI_POST.replace("---\n\nBody", "slug: \"News/Big Day\"\n---\n\nBody");
        let post = validate(SchemaVariant::AiModels, "a.md", &content).unwrap();
        assert_eq!(post.slug, "news/big-day");
    }

    #[test]
    fn test_slug_override_rejects_traversal() {
        for bad in ["../../escaped", "a/../b", "./here", "a//b", "a/!!!/b"] {
            let content = AI_POST.replace(
                "---\n\nBody",
                &format!("slug: \"{}\"\n---\n\nBody", bad),
            );
            let err = validate(SchemaVariant::AiModels, "a.md", &content).unwrap_err();
            assert_eq!(field_of(err), "slug", "slug {:?} should be rejected", bad);
        }
    }
}
