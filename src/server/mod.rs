//! Development server for the Thoughts section
//!
//! The list and detail routes read the content directory on every request,
//! so edits to `.mdx` files show up on the next reload. Anything else is
//! served from the generated public directory.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{render_body, ContentError, PostRepository};
use crate::helpers::url_for;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Server state
struct ServerState {
    repository: PostRepository,
    renderer: TemplateRenderer,
    public_dir: PathBuf,
}

/// Build the application router for a site
pub fn router(site: &Site) -> Router {
    let state = Arc::new(ServerState {
        repository: site.repository(),
        renderer: TemplateRenderer::new(site.config.clone()),
        public_dir: site.public_dir.clone(),
    });

    let base = thoughts_base(&site.config);
    let mut app = Router::new();
    if base.is_empty() {
        app = app.route("/", get(list_handler));
    } else {
        app = app
            .route(&base, get(list_handler))
            .route(&format!("{}/", base), get(list_handler));
    }

    app.route(&format!("{}/:slug", base), get(post_handler))
        .route(&format!("{}/:slug/", base), get(post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Path the listing is served under, without the trailing slash
fn thoughts_base(config: &SiteConfig) -> String {
    url_for(config, &config.thoughts_path())
        .trim_end_matches('/')
        .to_string()
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Server running at http://{}:{}{}/",
        ip,
        port,
        thoughts_base(&site.config)
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_handler(State(state): State<Arc<ServerState>>) -> Response {
    let repo = state.repository.clone();
    let listed = tokio::task::spawn_blocking(move || repo.list()).await;

    match listed {
        Ok(Ok(posts)) => Html(state.renderer.index(&posts)).into_response(),
        Ok(Err(e)) => server_error(&e),
        Err(e) => server_error(&e),
    }
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let repo = state.repository.clone();
    let id = slug.clone();
    let loaded = tokio::task::spawn_blocking(move || repo.get(&id)).await;

    let post = match loaded {
        Ok(Ok(Some(post))) => post,
        Ok(Ok(None)) => return not_found(&state),
        Ok(Err(e)) => return server_error(&e),
        Err(e) => return server_error(&e),
    };

    match render_body(&post.body) {
        Ok(body) => Html(state.renderer.post(&post, &body)).into_response(),
        Err(ContentError::MalformedBody { line, message }) => {
            tracing::warn!(
                "Thought {:?} has a malformed body (line {}): {}",
                slug,
                line,
                message
            );
            Html(state.renderer.unavailable(&post)).into_response()
        }
        Err(e) => server_error(&e),
    }
}

/// Serve generated files, answering misses with the not-found page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state),
        Ok(response) => response.into_response(),
        Err(e) => server_error(&e),
    }
}

fn not_found(state: &ServerState) -> Response {
    (StatusCode::NOT_FOUND, Html(state.renderer.not_found())).into_response()
}

fn server_error(e: &dyn std::fmt::Display) -> Response {
    tracing::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
