//! HTTP server rendering pages on demand

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::BlogError;
use crate::markup::{MarkupRenderer, Overrides};
use crate::pages::{self, nav_links};
use crate::templates::{SiteData, TemplateRenderer};
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    templates: TemplateRenderer,
    markup: MarkupRenderer,
    overrides: Overrides,
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        templates: TemplateRenderer::new()?,
        markup: blog.renderer(),
        overrides: Overrides::default(),
    });

    Ok(Router::new()
        .route("/", get(list_handler))
        .route("/blog", get(list_handler))
        .route("/blog/", get(list_handler))
        .route("/blog/:slug", get(post_handler))
        .nest_service("/static", ServeDir::new(&blog.static_dir))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Failure while serving a page
enum PageError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for PageError {
    fn from(e: anyhow::Error) -> Self {
        PageError::Internal(e)
    }
}

type PageResult = std::result::Result<Html<String>, PageError>;

/// Render every post; listings and pagers only show the ones that rendered
fn render_posts(state: &ServerState) -> anyhow::Result<pages::RenderedPosts> {
    let index = state.blog.posts()?;
    let config = &state.blog.config;
    Ok(pages::render_posts(
        &index,
        &state.markup,
        &state.overrides,
        config,
        config.now(),
    ))
}

async fn list_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    respond(state.clone(), path.clone(), move |state| {
        let rendered = render_posts(state)?;
        let nav = nav_links(&state.blog.config.nav, &path);
        let html = state
            .templates
            .render_list(
                &SiteData::from(&state.blog.config),
                &nav,
                &rendered.list_view(),
            )
            .map_err(anyhow::Error::from)?;
        Ok(Html(html))
    })
    .await
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Response {
    let path = uri.path().to_string();
    respond(state.clone(), path.clone(), move |state| {
        let rendered = render_posts(state)?;
        let view = rendered.detail(&slug).map_err(|e| match e {
            BlogError::NotFound { .. } => PageError::NotFound(path.clone()),
            other => PageError::Internal(other.into()),
        })?;
        let config = &state.blog.config;
        let nav = nav_links(&config.nav, &path);
        let html = state
            .templates
            .render_post(&SiteData::from(config), &nav, view)
            .map_err(anyhow::Error::from)?;
        Ok(Html(html))
    })
    .await
}

async fn not_found_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    not_found_page(&state, &path)
}

/// Render a page off the async runtime; scanning and highlighting block
async fn respond<F>(state: Arc<ServerState>, path: String, render: F) -> Response
where
    F: FnOnce(&ServerState) -> PageResult + Send + 'static,
{
    let worker = state.clone();
    match tokio::task::spawn_blocking(move || render(&worker)).await {
        Ok(Ok(html)) => html.into_response(),
        Ok(Err(PageError::NotFound(path))) => not_found_page(&state, &path),
        Ok(Err(PageError::Internal(e))) => {
            tracing::error!("Failed to render {}: {:#}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
        Err(e) => {
            tracing::error!("Render task for {} panicked: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found_page(state: &ServerState, path: &str) -> Response {
    let config = &state.blog.config;
    let nav = nav_links(&config.nav, path);
    match state
        .templates
        .render_not_found(&SiteData::from(config), &nav, path)
    {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
