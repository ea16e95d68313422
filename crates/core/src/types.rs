use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Post category. Which values a site accepts depends on its [`SchemaVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    // newsroom
    World,
    Business,
    Technology,
    Health,
    Sports,
    Culture,
    Podcast,
    // ai-models
    Google,
    Claude,
    #[serde(rename = "ChatGPT")]
    ChatGpt,
    Grok,
    Qianwen,
    ModelEval,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::World,
        Category::Business,
        Category::Technology,
        Category::Health,
        Category::Sports,
        Category::Culture,
        Category::Podcast,
        Category::Google,
        Category::Claude,
        Category::ChatGpt,
        Category::Grok,
        Category::Qianwen,
        Category::ModelEval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::World => "World",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Culture => "Culture",
            Category::Podcast => "Podcast",
            Category::Google => "Google",
            Category::Claude => "Claude",
            Category::ChatGpt => "ChatGPT",
            Category::Grok => "Grok",
            Category::Qianwen => "Qianwen",
            Category::ModelEval => "ModelEval",
        }
    }

    /// Exact, case-sensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance tag for a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Google,
    #[serde(rename = "OpenAI")]
    OpenAi,
    Anthropic,
    Mixed,
}

impl Source {
    pub const ALL: &'static [Source] = &[
        Source::Google,
        Source::OpenAi,
        Source::Anthropic,
        Source::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Google => "Google",
            Source::OpenAi => "OpenAI",
            Source::Anthropic => "Anthropic",
            Source::Mixed => "Mixed",
        }
    }

    pub fn from_label(label: &str) -> Option<Source> {
        Source::ALL.iter().copied().find(|s| s.as_str() == label)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field set a deployment validates its posts against.
///
/// The two variants are independent; a site picks exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaVariant {
    /// General news desk: `summary`, required `source` and `tags`, optional `heroImage`
    Newsroom,
    /// AI model coverage: `description`, defaulted `image`/`readingTime`/`author`
    AiModels,
}

impl SchemaVariant {
    pub const ALL: &'static [SchemaVariant] = &[SchemaVariant::Newsroom, SchemaVariant::AiModels];

    pub fn name(&self) -> &'static str {
        match self {
            SchemaVariant::Newsroom => "newsroom",
            SchemaVariant::AiModels => "ai-models",
        }
    }

    /// The closed category set for this variant
    pub fn categories(&self) -> &'static [Category] {
        match self {
            SchemaVariant::Newsroom => &[
                Category::World,
                Category::Business,
                Category::Technology,
                Category::Health,
                Category::Sports,
                Category::Culture,
                Category::Podcast,
            ],
            SchemaVariant::AiModels => &[
                Category::Google,
                Category::Claude,
                Category::ChatGpt,
                Category::Grok,
                Category::Qianwen,
                Category::ModelEval,
            ],
        }
    }

    pub fn accepts(&self, category: Category) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SchemaVariant::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown schema '{}', expected one of: {}",
                    s,
                    join_labels(SchemaVariant::ALL.iter().map(|v| v.name()))
                )
            })
    }
}

/// Render labels as `[a, b, c]` for error messages
pub fn join_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = labels.into_iter().collect();
    format!("[{}]", joined.join(", "))
}

/// A validated content entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// `description`, or `summary` on newsroom sites
    pub description: String,
    pub category: Category,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// `image`, or `heroImage` on newsroom sites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Markdown after the frontmatter block
    #[serde(skip)]
    pub body: String,
}

impl Post {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

/// All posts of a site, in loader order
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub posts: Vec<Post>,
}

impl Collection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

/// Complete site configuration (newsdesk.toml)
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site: SiteMetadata,
    pub content: ContentConfig,
}

#[derive(Debug, Clone)]
pub struct SiteMetadata {
    pub title: String,
    pub url: Option<String>,
    /// Always starts and ends with `/`
    pub base: String,
}

impl SiteMetadata {
    /// Join a site-relative path onto the base path
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Collection directory, relative to the site root
    pub dir: PathBuf,
    pub schema: SchemaVariant,
    pub defaults: PostDefaults,
    /// Bodies shorter than this many characters draw a validation warning; 0 disables
    pub min_body_chars: usize,
}

/// Values filled in for absent optional-with-default fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDefaults {
    pub image: String,
    pub reading_time: String,
    pub author: String,
}

impl PostDefaults {
    pub const IMAGE: &'static str = "/images/placeholder.jpg";
    pub const READING_TIME: &'static str = "5 Minutes";
    pub const AUTHOR: &'static str = "AI News Team";
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            image: Self::IMAGE.to_string(),
            reading_time: Self::READING_TIME.to_string(),
            author: Self::AUTHOR.to_string(),
        }
    }
}
