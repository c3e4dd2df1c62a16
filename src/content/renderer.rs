//! Post rendering pipeline and view state machine
//!
//! `PostRenderer` resolves a post id to sanitized HTML: a timeout-bounded
//! document fetch, a single fallback to the designated `404` document, then
//! the markdown pipeline. `PostView` is the explicit state machine a view
//! drives through `navigate`/`complete`; it replaces the fetch-on-mount
//! lifecycle of the original UI components and guarantees that a superseded
//! in-flight fetch can never clobber a newer navigation.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::content::fetcher::{DocumentFetcher, FetchError};
use crate::content::markdown::MarkdownRenderer;

/// Name of the document fetched when a post document is unavailable
pub const FALLBACK_DOC: &str = "404";

/// Rendering failures surfaced to views
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to fetch document `{name}`: {source}")]
    DocumentFetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("document `{id}` and the fallback document both failed to load")]
    FallbackFailed { id: String },

    #[error("document fetch for `{name}` timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },
}

/// Renders post documents to HTML
pub struct PostRenderer {
    fetcher: Arc<dyn DocumentFetcher>,
    markdown: MarkdownRenderer,
    fetch_timeout: Duration,
}

impl PostRenderer {
    /// Create a renderer over the given document source
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        markdown: MarkdownRenderer,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            markdown,
            fetch_timeout,
        }
    }

    /// Render the post addressed by `id`. A failed primary fetch is
    /// recovered once through the fallback document; a failed fallback is
    /// terminal. Same id + same document bytes yields identical output.
    pub async fn render(&self, id: &str) -> Result<String, RenderError> {
        let doc = self.retrieve(id).await?;
        Ok(self.markdown.render(&doc))
    }

    async fn retrieve(&self, id: &str) -> Result<String, RenderError> {
        match self.fetch_bounded(id).await {
            Ok(doc) => Ok(doc),
            Err(primary) => {
                tracing::debug!("fetch for `{}` failed ({}), trying fallback", id, primary);
                self.fetch_bounded(FALLBACK_DOC)
                    .await
                    .map_err(|fallback| match fallback {
                        RenderError::Timeout { .. } => fallback,
                        _ => RenderError::FallbackFailed { id: id.to_string() },
                    })
            }
        }
    }

    async fn fetch_bounded(&self, name: &str) -> Result<String, RenderError> {
        match timeout(self.fetch_timeout, self.fetcher.fetch(name)).await {
            Ok(Ok(doc)) => Ok(doc),
            Ok(Err(source)) => Err(RenderError::DocumentFetch {
                name: name.to_string(),
                source,
            }),
            Err(_) => Err(RenderError::Timeout {
                name: name.to_string(),
                seconds: self.fetch_timeout.as_secs(),
            }),
        }
    }
}

/// Lifecycle of a mounted post view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPhase {
    /// No post requested yet
    Idle,
    /// A fetch is in flight; the view shows a loading placeholder
    Loading,
    /// Rendered HTML is available
    Ready(String),
    /// Terminal failure; no further retries
    Failed(String),
}

/// Token tying a render completion to the navigation that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Explicit `Idle -> Loading -> Ready | Failed` machine, re-entered on
/// every id change
#[derive(Debug)]
pub struct PostView {
    id: Option<String>,
    generation: u64,
    phase: RenderPhase,
}

impl PostView {
    pub fn new() -> Self {
        Self {
            id: None,
            generation: 0,
            phase: RenderPhase::Idle,
        }
    }

    /// Begin loading a post. The returned ticket must be presented to
    /// `complete`; a ticket from an earlier navigation is ignored there.
    pub fn navigate(&mut self, id: impl Into<String>) -> FetchTicket {
        self.generation += 1;
        self.id = Some(id.into());
        self.phase = RenderPhase::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a finished render. Stale completions, superseded by a later
    /// `navigate`, leave the view untouched.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<String, RenderError>) {
        if ticket.generation != self.generation {
            tracing::debug!(
                "ignoring stale render completion (generation {} != {})",
                ticket.generation,
                self.generation
            );
            return;
        }
        self.phase = match result {
            Ok(html) => RenderPhase::Ready(html),
            Err(e) => RenderPhase::Failed(e.to_string()),
        };
    }

    /// Currently requested post id
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn phase(&self) -> &RenderPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RenderPhase::Loading
    }
}

impl Default for PostView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapFetcher {
        docs: HashMap<String, String>,
    }

    impl MapFetcher {
        fn new(docs: &[(&str, &str)]) -> Self {
            Self {
                docs: docs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl DocumentFetcher for MapFetcher {
        async fn fetch(&self, name: &str) -> Result<String, FetchError> {
            self.docs
                .get(name)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(name.to_string()))
        }
    }

    /// Serves the given documents immediately; stalls forever on any
    /// other name.
    struct StallingFetcher {
        docs: HashMap<String, String>,
    }

    impl StallingFetcher {
        fn new(docs: &[(&str, &str)]) -> Self {
            Self {
                docs: docs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl DocumentFetcher for StallingFetcher {
        async fn fetch(&self, name: &str) -> Result<String, FetchError> {
            match self.docs.get(name) {
                Some(doc) => Ok(doc.clone()),
                None => {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                    Err(FetchError::NotFound(name.to_string()))
                }
            }
        }
    }

    fn renderer(docs: &[(&str, &str)]) -> PostRenderer {
        PostRenderer::new(
            Arc::new(MapFetcher::new(docs)),
            MarkdownRenderer::new("bash"),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_render_successful_fetch() {
        let renderer = renderer(&[("thinking-prpl", "# Hello")]);
        let html = renderer.render("thinking-prpl").await.unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back() {
        let renderer = renderer(&[("404", "# Post not found")]);
        let html = renderer.render("missing-post").await.unwrap();
        assert!(html.contains("<h1>Post not found</h1>"));
    }

    #[tokio::test]
    async fn test_failed_fallback_is_terminal() {
        let renderer = renderer(&[]);
        let err = renderer.render("missing-post").await.unwrap_err();
        assert!(matches!(err, RenderError::FallbackFailed { id } if id == "missing-post"));
    }

    #[tokio::test]
    async fn test_stalled_fetch_recovers_via_fallback() {
        let renderer = PostRenderer::new(
            Arc::new(StallingFetcher::new(&[("404", "# Post not found")])),
            MarkdownRenderer::new("bash"),
            Duration::from_millis(20),
        );
        let html = renderer.render("stalled-post").await.unwrap();
        assert!(html.contains("<h1>Post not found</h1>"));
    }

    #[tokio::test]
    async fn test_stalled_fallback_surfaces_timeout() {
        let renderer = PostRenderer::new(
            Arc::new(StallingFetcher::new(&[])),
            MarkdownRenderer::new("bash"),
            Duration::from_millis(20),
        );
        let err = renderer.render("stalled-post").await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout { name, .. } if name == FALLBACK_DOC));
    }

    #[tokio::test]
    async fn test_render_is_idempotent() {
        let renderer = renderer(&[("post", "# Title\n\n```js\nlet x = 1;\n```")]);
        let first = renderer.render("post").await.unwrap();
        let second = renderer.render("post").await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_view_starts_idle() {
        let view = PostView::new();
        assert_eq!(*view.phase(), RenderPhase::Idle);
        assert!(view.id().is_none());
    }

    #[test]
    fn test_view_happy_path() {
        let mut view = PostView::new();
        let ticket = view.navigate("thinking-prpl");
        assert!(view.is_loading());

        view.complete(ticket, Ok("<h1>Hello</h1>".to_string()));
        assert_eq!(*view.phase(), RenderPhase::Ready("<h1>Hello</h1>".to_string()));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut view = PostView::new();
        let first = view.navigate("first-post");
        let _second = view.navigate("second-post");

        // The fetch for the superseded navigation finishes late.
        view.complete(first, Ok("<p>stale</p>".to_string()));
        assert!(view.is_loading());
        assert_eq!(view.id(), Some("second-post"));
    }

    #[test]
    fn test_failure_is_terminal_state() {
        let mut view = PostView::new();
        let ticket = view.navigate("oops");
        view.complete(ticket, Err(RenderError::FallbackFailed { id: "oops".into() }));
        assert!(matches!(view.phase(), RenderPhase::Failed(_)));
    }
}
