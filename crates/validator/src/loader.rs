use crate::schema::validate_entry;
use newsdesk_core::{Collection, Error, Post, Result, SiteConfig, parse_entry};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Names starting with `_` or `.` are drafts, partials, or editor droppings
fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('_') || name.starts_with('.'))
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// List content files under `dir` as relative paths, sorted by path
pub fn discover_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e))
    {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if !entry.file_type().is_file() || !is_content_file(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| Error::InvalidData(e.to_string()))?;
        entries.push(relative.to_path_buf());
    }

    entries.sort();
    Ok(entries)
}

/// Absolute collection directory for a site
pub fn collection_dir(site_root: &Path, config: &SiteConfig) -> PathBuf {
    site_root.join(&config.content.dir)
}

/// Read and validate a single content file
pub fn load_entry(dir: &Path, relative: &Path, config: &SiteConfig) -> Result<Post> {
    let content = fs::read_to_string(dir.join(relative))?;
    let raw = parse_entry(&content).map_err(|e| match e {
        Error::InvalidData(msg) => Error::schema(relative.display().to_string(), "frontmatter", msg),
        other => other,
    })?;
    let post = validate_entry(
        config.content.schema,
        &config.content.defaults,
        relative,
        &raw,
    )?;
    tracing::debug!(entry = %relative.display(), slug = %post.slug, "validated post");
    Ok(post)
}

/// Tracks slugs already handed out during one load
#[derive(Default)]
pub(crate) struct SlugRegistry {
    seen: HashMap<String, PathBuf>,
}

impl SlugRegistry {
    pub(crate) fn claim(&mut self, post: &Post, relative: &Path) -> Result<()> {
        if let Some(first) = self.seen.get(&post.slug) {
            return Err(Error::schema(
                relative.display().to_string(),
                "slug",
                format!(
                    "slug '{}' is already used by '{}'",
                    post.slug,
                    first.display()
                ),
            ));
        }
        self.seen.insert(post.slug.clone(), relative.to_path_buf());
        Ok(())
    }
}

/// Load the full validated collection for a site.
///
/// All-or-nothing: the first invalid entry aborts the load and no partial
/// collection is returned.
pub fn load_collection(site_root: &Path, config: &SiteConfig) -> Result<Collection> {
    let dir = collection_dir(site_root, config);
    if !dir.is_dir() {
        return Err(Error::CollectionUnavailable(format!(
            "content directory not found: {}",
            dir.display()
        )));
    }

    let mut slugs = SlugRegistry::default();
    let mut posts = Vec::new();
    for relative in discover_entries(&dir)? {
        let post = load_entry(&dir, &relative, config)?;
        slugs.claim(&post, &relative)?;
        posts.push(post);
    }

    tracing::info!(
        dir = %dir.display(),
        schema = %config.content.schema,
        posts = posts.len(),
        "loaded collection"
    );
    Ok(Collection::new(posts))
}
