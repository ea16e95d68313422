use std::path::{Component, Path};

/// Derive a post slug from its path relative to the collection directory.
///
/// `2024/Hello World.md` → `2024/hello-world`, `guides/index.md` → `guides`
pub fn slug_from_path(relative: &Path) -> String {
    let stem = relative.with_extension("");
    let mut segments: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    segments.join("/")
}

/// Get a URL-safe slug from free text
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
