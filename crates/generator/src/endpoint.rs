use crate::search::{build_search_index, render_search_index};
use newsdesk_core::{Collection, Error, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport-neutral response for a generated endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl JsonResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status: 200,
            content_type: JSON_CONTENT_TYPE,
            body,
        }
    }
}

/// `GET search.json` over an already loaded collection
pub fn search_json(collection: &Collection) -> Result<JsonResponse> {
    let entries = build_search_index(collection);
    let body = render_search_index(&entries)?;
    tracing::info!(entries = entries.len(), bytes = body.len(), "built search index");
    Ok(JsonResponse::ok(body))
}

/// `GET search.json` that loads the collection first.
///
/// Any load failure surfaces as [`Error::CollectionUnavailable`] and the
/// index is never built from a partial collection.
pub fn serve_search_index<F>(load: F) -> Result<JsonResponse>
where
    F: FnOnce() -> Result<Collection>,
{
    let collection = load().map_err(|e| match e {
        Error::CollectionUnavailable(_) => e,
        other => Error::CollectionUnavailable(other.to_string()),
    })?;
    search_json(&collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use newsdesk_core::{Category, Post};

    fn collection() -> Collection {
        Collection::new(vec![Post {
            slug: "a-slug".to_string(),
            title: "A".to_string(),
            description: "B".to_string(),
            category: Category::World,
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            source: None,
            tags: None,
            image: None,
            reading_time: None,
            author: None,
            body: String::new(),
        }])
    }

    #[test]
    fn test_search_json_response() {
        let response = search_json(&collection()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(
            response.body,
            r#"[{"title":"A","description":"B","slug":"a-slug","category":"World","date":"2024-01-01T00:00:00.000Z"}]"#
        );
    }

    #[test]
    fn test_serve_wraps_load_failure() {
        let result = serve_search_index(|| {
            Err(Error::schema("bad.md", "category", "category must be one of [World]"))
        });
        match result {
            Err(Error::CollectionUnavailable(msg)) => assert!(msg.contains("bad.md")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_serve_is_idempotent() {
        let first = serve_search_index(|| Ok(collection())).unwrap();
        let second = serve_search_index(|| Ok(collection())).unwrap();
        assert_eq!(first, second);
    }
}
