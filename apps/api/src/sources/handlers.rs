//! Axum route handlers for the media-source API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::source::{MediaSource, NewMediaSource};
use crate::state::AppState;

/// GET /api/v1/sources
pub async fn handle_list_sources(
    State(state): State<AppState>,
) -> Result<Json<Vec<MediaSource>>, AppError> {
    Ok(Json(state.sources.list().await?))
}

/// POST /api/v1/sources
///
/// Shape errors in the body (missing or mistyped `name`/`url`) surface as
/// 400 validation errors, same as rule violations in the store.
pub async fn handle_add_source(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<MediaSource>), AppError> {
    let req: NewMediaSource =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let source = state.sources.add(req).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

/// DELETE /api/v1/sources/:id
pub async fn handle_remove_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sources.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
