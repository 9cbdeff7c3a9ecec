//! HTTP upload-and-display service.
//!
//! The loaded pipeline lives in shared state for the lifetime of the process
//! and is only read by handlers.

pub mod http;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::error::Result;
use crate::pipeline::PredictionPipeline;

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub pipeline: PredictionPipeline,
}

impl AppState {
    #[must_use]
    pub const fn new(pipeline: PredictionPipeline) -> Self {
        Self { pipeline }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.pipeline.config().max_upload_bytes;

    Router::new()
        .route("/health", get(http::health))
        .route("/features", get(http::features))
        .route("/predict", post(http::predict))
        .route("/predict/download", post(http::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving attrition predictions on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
