//! HTTP endpoint handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::AppState;
use crate::error::AttritionError;
use crate::pipeline::DisplayRow;
use crate::utils::logging::log_request_failure;

/// Error body returned for a failed upload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failed request, rendered as one generic message
#[derive(Debug)]
pub struct ApiError(AttritionError);

impl From<AttritionError> for ApiError {
    fn from(error: AttritionError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_user_input() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Response for a scored upload
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Identifier, label and probability per employee
    pub rows: Vec<DisplayRow>,
    /// The full downloadable table
    pub csv: String,
}

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// The ordered feature list the model was trained on
pub async fn features(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.pipeline.config().expected_features.clone())
}

/// Run parsing, alignment and scoring off the async worker threads
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AttritionError::Io(e.into()))?;
    Ok(outcome?)
}

/// Score an uploaded CSV and return the result view plus the download file
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let (rows, csv) = run_blocking(move || {
        let pipeline = &state.pipeline;
        let scored = pipeline.score_csv(&body)?;
        let rows = scored.display_rows().inspect_err(log_request_failure)?;
        let csv = scored.to_csv(pipeline.config().delimiter_byte())?;
        Ok((rows, csv))
    })
    .await?;

    Ok(Json(PredictResponse {
        rows,
        csv: String::from_utf8_lossy(&csv).into_owned(),
    }))
}

/// Score an uploaded CSV and return the result table as an attachment
pub async fn download(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let filename = state
        .pipeline
        .config()
        .output_path
        .file_name()
        .map_or_else(
            || "prediksi_attrition.csv".to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
    let disposition = format!("attachment; filename=\"{filename}\"");

    let csv = run_blocking(move || {
        let pipeline = &state.pipeline;
        pipeline
            .score_csv(&body)?
            .to_csv(pipeline.config().delimiter_byte())
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
