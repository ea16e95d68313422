use super::{load_site, load_site_config};
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use newsdesk_generator::pages::{render_index_page, render_post_page};
use newsdesk_generator::serve_search_index;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

const RELOAD_SCRIPT: &str = r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => location.reload();
        eventSource.onerror = () => eventSource.close();
    </script>"#;

/// Start preview server with hot reload for local development.
///
/// Every request reloads newsdesk.toml and the collection from disk, so
/// edits show up on the next refresh and schema errors surface immediately.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📰 Starting preview server...");
    println!("   Site: {}", path.display());

    let config = load_site_config(&path)?;
    let (_, collection) = load_site(&path).context("Failed to load content collection")?;

    println!("   ✓ Loaded: {}", config.site.title);
    println!("   ✓ Schema: {}", config.content.schema);
    println!("   ✓ Posts: {}", collection.len());

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };
    let app = router(state, &config.site.base);

    // Start file watcher
    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            tracing::error!(error = %e, "file watcher stopped");
            eprintln!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!(
        "\n🚀 Preview ready at: http://localhost:{}{}",
        port, config.site.base
    );
    println!(
        "   Search index: http://localhost:{}{}search.json",
        port, config.site.base
    );
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Site routes, mounted at `/` and, when configured, under the base path too
fn router(state: AppState, base: &str) -> Router {
    let mut prefixes = vec!["/".to_string()];
    if base != "/" {
        prefixes.push(base.to_string());
    }

    let mut app = Router::new().route("/_reload", get(sse_handler));
    for prefix in &prefixes {
        app = app
            .route(prefix, get(index_handler))
            .route(&format!("{}search.json", prefix), get(search_handler))
            .route(&format!("{}posts/{{*slug}}", prefix), get(post_handler));
    }

    let public = state.site_path.join("public");
    app.fallback_service(ServeDir::new(public))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn with_reload(html: String) -> Html<String> {
    Html(html.replacen("</body>", &format!("{}\n</body>", RELOAD_SCRIPT), 1))
}

fn error_page(error: &newsdesk_core::Error) -> Response {
    tracing::warn!(error = %error, "preview render failed");
    let html = format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Content Error</h1>
<pre>{}</pre>
</body></html>"#,
        newsdesk_generator::pages::html_escape(&error.to_string())
    );
    (StatusCode::INTERNAL_SERVER_ERROR, with_reload(html)).into_response()
}

/// Search index endpoint
async fn search_handler(State(state): State<AppState>) -> Response {
    match serve_search_index(|| load_site(&state.site_path).map(|(_, collection)| collection)) {
        Ok(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK),
            [(header::CONTENT_TYPE, response.content_type)],
            response.body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "search index request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Main index page handler
async fn index_handler(State(state): State<AppState>) -> Response {
    match load_site(&state.site_path) {
        Ok((config, collection)) => {
            with_reload(render_index_page(&config.site, &collection)).into_response()
        }
        Err(e) => error_page(&e),
    }
}

async fn post_handler(State(state): State<AppState>, UrlPath(slug): UrlPath<String>) -> Response {
    let (config, collection) = match load_site(&state.site_path) {
        Ok(site) => site,
        Err(e) => return error_page(&e),
    };

    match collection.get(slug.trim_matches('/')) {
        Some(post) => with_reload(render_post_page(&config.site, post)).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No post with slug '{}'", slug)).into_response(),
    }
}
