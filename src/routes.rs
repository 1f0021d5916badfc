use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::cache::SnapshotCache;

pub struct AppState {
    pub cache: Arc<SnapshotCache>,
}

/// Maps any internal failure to a generic 500 body; the detail goes to
/// the log, never to the client.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to load news" })),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

// Route handlers
pub async fn news(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.cache.get_or_refresh().await?;
    Ok(Json((*snapshot).clone()))
}

pub async fn index() -> impl IntoResponse {
    "Daily Brief backend is running"
}
