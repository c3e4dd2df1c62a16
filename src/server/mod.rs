//! SPA dev server
//!
//! Every request path goes through the route resolver via a fallback
//! handler, mirroring client-side navigation; static assets and the raw
//! markdown documents are served alongside, and the generated service
//! worker is exposed at the root.

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cache::ServiceWorkerConfig;
use crate::content::fetcher::FsFetcher;
use crate::content::renderer::{PostRenderer, PostView};
use crate::content::MarkdownRenderer;
use crate::router::{self, View};
use crate::views;
use crate::Portfolio;

/// Server state
struct ServerState {
    portfolio: Portfolio,
    renderer: PostRenderer,
    service_worker: String,
}

/// Start the server
pub async fn start(portfolio: &Portfolio, ip: &str, port: u16) -> Result<()> {
    let service_worker = ServiceWorkerConfig::build(&portfolio.registry, &portfolio.config)?
        .render_service_worker();

    let fetcher = FsFetcher::with_ext(&portfolio.docs_dir, &portfolio.config.doc_ext);
    let renderer = PostRenderer::new(
        Arc::new(fetcher),
        MarkdownRenderer::new(&portfolio.config.highlight.default_language),
        Duration::from_secs(portfolio.config.fetch_timeout_secs),
    );

    let state = Arc::new(ServerState {
        portfolio: portfolio.clone(),
        renderer,
        service_worker,
    });

    let app = Router::new()
        .route("/service-worker.js", get(service_worker_handler))
        .nest_service(
            &format!("/{}", portfolio.config.doc_root),
            ServeDir::new(&portfolio.docs_dir),
        )
        .nest_service("/assets", ServeDir::new(&portfolio.assets_dir))
        .fallback(view_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve the generated service worker
async fn service_worker_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        state.service_worker.clone(),
    )
}

/// Resolve the request path to a view and render it
async fn view_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let site = &state.portfolio.config;

    let route = router::resolve(&path);
    let view = router::compose(&route, &state.portfolio.registry);

    match view {
        View::Home { recent } => Html(views::page(
            &site.title,
            &site.title,
            &views::home(&site.title, &site.copyright, &site.work, &recent),
        ))
        .into_response(),

        View::BlogList { posts } => Html(views::page(
            &site.title,
            "Blog",
            &views::blog_list(&posts),
        ))
        .into_response(),

        View::PostDetail { id, entry } => {
            // One full pass of the view machine per request: navigate,
            // await the render, complete with the matching ticket.
            let mut view = PostView::new();
            let ticket = view.navigate(&id);
            let result = state.renderer.render(&id).await;
            view.complete(ticket, result);

            let title = entry
                .as_ref()
                .map(|e| e.title.clone())
                .unwrap_or_else(|| site.title.clone());
            Html(views::page(
                &site.title,
                &title,
                &views::post_detail(entry.as_ref(), view.phase()),
            ))
            .into_response()
        }

        View::Profile { user } => Html(views::page(
            &site.title,
            &user,
            &views::profile(&user),
        ))
        .into_response(),

        View::NotFound => (
            StatusCode::NOT_FOUND,
            Html(views::page(
                &site.title,
                "Not found",
                &views::not_found(&path),
            )),
        )
            .into_response(),
    }
}
