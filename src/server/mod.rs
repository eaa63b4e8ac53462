//! HTTP surface: the contact endpoint, page views and uploads.

mod contact;
mod pages;
mod request_tracing;
mod uploads;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::SiteConfig;
use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub site: Arc<SiteConfig>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(store: Store, site: SiteConfig, max_body_bytes: usize) -> Self {
        Self {
            store,
            site: Arc::new(site),
            max_body_bytes,
        }
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/pages/home", get(pages::home))
        .route("/api/pages/about", get(pages::about))
        .route("/api/pages/portfolio", get(pages::portfolio))
        .route("/api/pages/portfolio/{slug}", get(pages::project))
        .route("/api/pages/blog", get(pages::blog))
        .route("/api/pages/gallery", get(pages::gallery))
        .route("/api/pages/contact", get(pages::contact))
        .route("/api/gallery", post(uploads::upload_gallery))
        .route("/api/profile/avatar", put(uploads::upload_avatar))
        .layer(middleware::from_fn(request_tracing::request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!(%addr, backend = state.store.backend_name(), "Serving");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
