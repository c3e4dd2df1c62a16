//! View composition
//!
//! Plain HTML rendering for each route's view, using the original site's
//! tachyons class vocabulary. Views take immutable inputs already composed
//! from the registry; a registry miss shows up here as empty fields, never
//! as a failure.

use crate::content::html_escape;
use crate::content::registry::PostEntry;
use crate::content::renderer::RenderPhase;

/// Wrap a view body in the application shell
pub fn page(site_title: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<div id="app">
<nav class="flex items-center pa3"><a class="near-black no-underline" href="/">{}</a></nav>
{}
</div>
<script>
if ('serviceWorker' in navigator) {{
  navigator.serviceWorker.register('/service-worker.js');
}}
</script>
</body>
</html>
"#,
        html_escape(title),
        html_escape(site_title),
        body
    )
}

/// Home view: site heading, the most recent posts, the work list
pub fn home(site_title: &str, copyright: &str, work: &[String], recent: &[PostEntry]) -> String {
    let mut items = String::new();
    for post in recent {
        items.push_str(&format!(
            r#"<a class="f3 fw5 near-black mv4 animate hover-primary-color grow" href="/blog/{}">{}</a>
"#,
            post.id,
            html_escape(&post.title.to_lowercase())
        ));
    }

    let mut work_items = String::new();
    for place in work {
        work_items.push_str(&format!(
            r#"<p class="f3 fw5 near-black mb4">{}</p>
"#,
            html_escape(place)
        ));
    }

    format!(
        r#"<div class="flex flex-column items-center justify-between vh-100">
<h1 class="primary-color f1">{}</h1>
</div>
<div class="flex flex-column items-center mt5">
<div class="bb bw1 b-near-black w-40 flex justify-center mb4"><h3 class="f3 near-black">Recent</h3></div>
{}</div>
<div class="flex flex-column items-center mt5">
<div class="bb bw1 b-near-black w-40 flex justify-center mb4"><h3 class="f3 near-black">Work</h3></div>
{}</div>
<div class="flex flex-column items-center mt7 mb5">
<p class="f4 near-black">&copy; {}</p>
</div>
"#,
        html_escape(site_title),
        items,
        work_items,
        html_escape(copyright)
    )
}

/// Blog list view: every registry entry in display order
pub fn blog_list(posts: &[PostEntry]) -> String {
    let mut items = String::new();
    for post in posts {
        items.push_str(&format!(
            r#"<div class="mv4">
<a class="f3 fw5 near-black animate hover-primary-color" href="/blog/{}">{}</a>
<p class="f5 gray mv2">{}</p>
<p class="f5 near-black">{}</p>
</div>
"#,
            post.id,
            html_escape(&post.title),
            display_date(post),
            html_escape(&post.description)
        ));
    }

    format!(
        r#"<div class="flex flex-column items-center justify-between">
<div class="w-60">
{}</div>
</div>
"#,
        items
    )
}

/// Post detail view. A missing registry entry renders empty title/date;
/// the content area reflects the render phase (loading placeholder until
/// the document resolves, the failure state if it never does).
pub fn post_detail(entry: Option<&PostEntry>, phase: &RenderPhase) -> String {
    let title = entry.map(|e| e.title.as_str()).unwrap_or("");
    let date = entry.map(display_date).unwrap_or_default();

    let content = match phase {
        RenderPhase::Idle | RenderPhase::Loading => {
            r#"<div loading class="f4 gray">Loading&hellip;</div>"#.to_string()
        }
        RenderPhase::Ready(html) => html.clone(),
        RenderPhase::Failed(_) => {
            r#"<div class="f4 gray">This post could not be loaded.</div>"#.to_string()
        }
    };

    format!(
        r#"<div class="flex flex-column items-center justify-between">
<div class="w-60">
<h1 class="f2 near-black">{}</h1>
<p class="f5 gray">{}</p>
<div class="post-content">
{}
</div>
</div>
</div>
"#,
        html_escape(title),
        date,
        content
    )
}

/// Profile view
pub fn profile(user: &str) -> String {
    format!(
        r#"<div class="flex flex-column items-center">
<h1 class="f2 near-black">@{}</h1>
</div>
"#,
        html_escape(user)
    )
}

/// Generic not-found view for unmatched routes
pub fn not_found(path: &str) -> String {
    format!(
        r#"<div class="flex flex-column items-center">
<h1 class="f2 near-black">Page not found</h1>
<p class="f5 gray">Nothing lives at {}.</p>
<a class="near-black" href="/">Back home</a>
</div>
"#,
        html_escape(path)
    )
}

/// Human-readable publication date, raw string when not ISO-8601
fn display_date(post: &PostEntry) -> String {
    post.published()
        .map(|d| d.format("%B %e, %Y").to_string())
        .unwrap_or_else(|| html_escape(&post.date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PostEntry {
        PostEntry {
            id: "thinking-prpl".to_string(),
            title: "Thinking PRPL - A Progressive Web Pattern".to_string(),
            date: "2018-06-18T13:37:27+00:00".to_string(),
            description: "A methodology...".to_string(),
        }
    }

    #[test]
    fn test_post_detail_with_entry() {
        let html = post_detail(
            Some(&entry()),
            &RenderPhase::Ready("<h1>Hello</h1>".to_string()),
        );
        assert!(html.contains("Thinking PRPL"));
        assert!(html.contains("June 18, 2018"));
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_post_detail_registry_miss_renders_empty_title() {
        let html = post_detail(None, &RenderPhase::Loading);
        assert!(html.contains("<h1 class=\"f2 near-black\"></h1>"));
        assert!(html.contains("Loading"));
    }

    #[test]
    fn test_post_detail_failure_state() {
        let html = post_detail(Some(&entry()), &RenderPhase::Failed("boom".to_string()));
        assert!(html.contains("could not be loaded"));
        assert!(!html.contains("boom"), "internal error detail stays out of markup");
    }

    #[test]
    fn test_home_links_recent_posts() {
        let html = home("houssein.", "MMXVIII Houssein Djirdeh", &[], &[entry()]);
        assert!(html.contains(r#"href="/blog/thinking-prpl""#));
        assert!(html.contains("thinking prpl - a progressive web pattern"));
        assert!(html.contains("&copy; MMXVIII Houssein Djirdeh"));
    }

    #[test]
    fn test_home_renders_work_section() {
        let work = vec!["rangle.io".to_string(), "onramp".to_string()];
        let html = home("houssein.", "MMXVIII", &work, &[entry()]);
        assert!(html.contains(">Work</h3>"));
        assert!(html.contains("rangle.io"));
        assert!(html.contains("onramp"));
    }

    #[test]
    fn test_not_found_escapes_path() {
        let html = not_found("/<script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_page_shell_registers_service_worker() {
        let html = page("houssein.", "Blog", "<p>body</p>");
        assert!(html.contains("serviceWorker"));
        assert!(html.contains("<p>body</p>"));
    }
}
