use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
struct ReloadResponse {
    models: usize,
    inputs: usize,
    curves: usize,
}

/// Re-read every entity sheet into a fresh snapshot
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let snapshot = state.db.reload().await?;
    let (models, inputs, curves) = snapshot.counts();
    Ok(Json(ReloadResponse {
        models,
        inputs,
        curves,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reload", post(reload))
}
