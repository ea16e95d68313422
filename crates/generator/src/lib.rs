//! Static output for a newsdesk site: search index and HTML pages

pub mod endpoint;
pub mod pages;
pub mod search;

pub use endpoint::{JSON_CONTENT_TYPE, JsonResponse, search_json, serve_search_index};
pub use search::{SearchIndexEntry, build_search_index, render_search_index};

use newsdesk_core::{Collection, Error, Result, SiteConfig};
use std::fs;
use std::path::{Component, Path};

/// Site-relative path of the search index
pub const SEARCH_INDEX_PATH: &str = "search.json";

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

impl GeneratedSite {
    /// Write every page and asset below `output`, creating directories as needed.
    ///
    /// Nothing is written if any path would land outside `output`.
    pub fn write_to(&self, output: &Path) -> Result<usize> {
        let files: Vec<(&String, &[u8])> = self
            .pages
            .iter()
            .map(|(path, html)| (path, html.as_bytes()))
            .chain(self.assets.iter().map(|(path, data)| (path, data.as_slice())))
            .collect();

        for (path, _) in &files {
            let contained = Path::new(path.as_str())
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if !contained {
                return Err(Error::InvalidData(format!(
                    "output path '{}' escapes the output directory",
                    path
                )));
            }
        }

        let mut written = 0;
        for (path, data) in files {
            let target = output.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, data)?;
            written += 1;
        }
        Ok(written)
    }
}

/// Generate the whole site from a validated collection
pub fn generate_site(config: &SiteConfig, collection: &Collection) -> Result<GeneratedSite> {
    let search = search_json(collection)?;

    let mut rendered = Vec::with_capacity(collection.len() + 1);
    rendered.push((
        "index.html".to_string(),
        pages::render_index_page(&config.site, collection),
    ));
    for post in collection {
        rendered.push((
            format!("{}index.html", pages::post_path(post)),
            pages::render_post_page(&config.site, post),
        ));
    }

    Ok(GeneratedSite {
        pages: rendered,
        assets: vec![(SEARCH_INDEX_PATH.to_string(), search.body.into_bytes())],
    })
}
