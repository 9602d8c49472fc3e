//! HTTP surface: the single-page UI, the conversion endpoint, and
//! per-job download routes backed by an in-memory results map.

mod handlers;
mod types;

use crate::config::Config;
use crate::engine::Engine;
use crate::pipeline::Converter;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use types::*;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub converter: Arc<Converter<Box<dyn Engine>>>,
    /// Converted documents by job id, retained for the download routes.
    pub results: Arc<RwLock<HashMap<String, StoredJob>>>,
}

impl AppState {
    pub fn new(cfg: &Config, engine: Box<dyn Engine>) -> Self {
        Self {
            cfg: Arc::new(cfg.clone()),
            converter: Arc::new(Converter::new(cfg, engine)),
            results: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_upload = state.cfg.server.max_upload_bytes as usize;
    let enable_cors = state.cfg.server.enable_cors;

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/v1/convert", post(handlers::convert_documents))
        .route("/api/v1/jobs/{job_id}", get(handlers::get_job))
        .route(
            "/api/v1/jobs/{job_id}/download/markdown",
            get(handlers::download_markdown),
        )
        .route(
            "/api/v1/jobs/{job_id}/download/text",
            get(handlers::download_text),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_upload));

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

pub async fn start_server(addr: &str, state: AppState) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app)
        .await
        .with_context(|| "serving HTTP")
}
