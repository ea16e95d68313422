use newsdesk_core::{Collection, Post, SiteMetadata};
use pulldown_cmark::{Options, Parser, html};

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Render a post body from markdown to HTML
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Site-relative path of a post page
pub fn post_path(post: &Post) -> String {
    format!("posts/{}/", post.slug)
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: "Microsoft JhengHei", "Inter", system-ui, sans-serif;
            line-height: 1.8;
            color: #1a1a1a;
            background: #f4f4f4;
            padding: 2rem;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 2rem;
            border-radius: 8px;
        }
        h1, h2, h3 { font-family: "Playfair Display", Georgia, serif; margin: 1.5em 0 0.75em; }
        a { color: #d93025; }
        .meta { color: #666; font-size: 0.9rem; }
        .category {
            background: #d93025;
            color: white;
            padding: 0.1rem 0.5rem;
            border-radius: 4px;
            font-size: 0.8rem;
        }
        .post-list { list-style: none; }
        .post-list li { padding: 1rem 0; border-bottom: 1px solid #eee; }
        .tags span { margin-right: 0.5rem; color: #999; }
        article p { margin-bottom: 1.25em; }
        #search { width: 100%; padding: 0.5rem; margin: 1rem 0; }
"#;

fn layout(site: &SiteMetadata, title: &str, content: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
        <header><a href="{}">{}</a></header>
        {}
    </div>
    {}
</body>
</html>"#,
        html_escape(title),
        STYLE,
        html_escape(&site.href("")),
        html_escape(&site.title),
        content,
        script
    )
}

/// Render one post page
pub fn render_post_page(site: &SiteMetadata, post: &Post) -> String {
    let tags_html: String = post
        .tags()
        .iter()
        .map(|t| format!("<span>#{}</span>", html_escape(t)))
        .collect();

    let byline = [post.author.as_deref(), post.reading_time.as_deref()]
        .into_iter()
        .flatten()
        .map(html_escape)
        .collect::<Vec<_>>()
        .join(" · ");

    let hero = post
        .image
        .as_deref()
        .map(|src| format!(r#"<img src="{}" alt="" class="hero">"#, html_escape(src)))
        .unwrap_or_default();

    let content = format!(
        r#"<article>
            <span class="category">{}</span>
            <h1>{}</h1>
            <div class="meta"><time datetime="{}">{}</time> {}</div>
            {}
            <p><em>{}</em></p>
            {}
            <div class="tags">{}</div>
        </article>"#,
        post.category,
        html_escape(&post.title),
        post.date.to_rfc3339(),
        post.date.format("%Y-%m-%d"),
        byline,
        hero,
        html_escape(&post.description),
        render_markdown(&post.body),
        tags_html
    );

    layout(
        site,
        &format!("{} | {}", post.title, site.title),
        &content,
        "",
    )
}

/// JSON-encode a string for an inline script, keeping `</script>` from closing the tag
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace("</", "<\\/")
}

/// Render the front page: every post plus a search box fed by search.json
pub fn render_index_page(site: &SiteMetadata, collection: &Collection) -> String {
    let items: String = collection
        .iter()
        .map(|post| {
            format!(
                r#"<li>
                <span class="category">{}</span>
                <a href="{}">{}</a>
                <div class="meta">{}</div>
                <p>{}</p>
            </li>"#,
                post.category,
                html_escape(&site.href(&post_path(post))),
                html_escape(&post.title),
                post.date.format("%Y-%m-%d"),
                html_escape(&post.description)
            )
        })
        .collect();

    let content = format!(
        r#"<h1>{}</h1>
        <input id="search" type="search" placeholder="Search">
        <ul id="results" class="post-list"></ul>
        <ul id="posts" class="post-list">{}</ul>"#,
        html_escape(&site.title),
        items
    );

    let script = format!(
        r#"<script>
        const base = {};
        const input = document.getElementById('search');
        const results = document.getElementById('results');
        const posts = document.getElementById('posts');
        let index = null;
        input.addEventListener('input', async () => {{
            const q = input.value.trim().toLowerCase();
            if (!q) {{ results.innerHTML = ''; posts.hidden = false; return; }}
            if (!index) {{ index = await (await fetch(base + 'search.json')).json(); }}
            posts.hidden = true;
            results.replaceChildren(...index
                .filter(e => (e.title + ' ' + e.description + ' ' + e.category).toLowerCase().includes(q))
                .map(e => {{
                    const li = document.createElement('li');
                    const a = document.createElement('a');
                    a.href = base + 'posts/' + e.slug + '/';
                    a.textContent = e.title;
                    li.append(a);
                    return li;
                }}));
        }});
    </script>"#,
        js_string(&site.base)
    );

    layout(site, &site.title, &content, &script)
}
