use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use runway_core::{InputRecord, ResolvedInput};

use super::CreatedResponse;
use crate::error::AppError;
use crate::AppState;

async fn list_inputs(State(state): State<AppState>) -> Json<Vec<InputRecord>> {
    let snapshot = state.db.snapshot().await;
    Json(snapshot.inputs().cloned().collect())
}

async fn create_input(
    State(state): State<AppState>,
    Json(input): Json<InputRecord>,
) -> Result<Json<CreatedResponse>, AppError> {
    let number = state.db.create_input(&input).await?;
    Ok(Json(CreatedResponse { number }))
}

/// Get an input with its curves resolved
async fn get_input(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<ResolvedInput>, AppError> {
    let snapshot = state.db.snapshot().await;
    if snapshot.input(number).is_none() {
        return Err(AppError::NotFound(format!("Input {} not found", number)));
    }
    Ok(Json(snapshot.deref_input(number)?))
}

async fn update_input(
    State(state): State<AppState>,
    Path(number): Path<usize>,
    Json(input): Json<InputRecord>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.update_input(number, &input).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

async fn delete_input(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_input(number).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

async fn link_curve(
    State(state): State<AppState>,
    Path((input, curve)): Path<(usize, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.link_curve(input, curve).await?;
    Ok(Json(serde_json::json!({ "linked": true })))
}

async fn unlink_curve(
    State(state): State<AppState>,
    Path((input, curve)): Path<(usize, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.unlink_curve(input, curve).await?;
    Ok(Json(serde_json::json!({ "unlinked": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inputs", get(list_inputs).post(create_input))
        .route(
            "/api/inputs/{number}",
            get(get_input).put(update_input).delete(delete_input),
        )
        .route(
            "/api/inputs/{number}/curves/{curve}",
            post(link_curve).delete(unlink_curve),
        )
}
