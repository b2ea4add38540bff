use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use runway_core::{Curve, CurveRecord};

use super::CreatedResponse;
use crate::error::AppError;
use crate::AppState;

fn validate(curve: &CurveRecord) -> Result<(), AppError> {
    if curve.period == 0 {
        return Err(AppError::BadRequest(
            "Curve period must be at least one day".to_string(),
        ));
    }
    Ok(())
}

/// List curves, already resampled to their periods
async fn list_curves(State(state): State<AppState>) -> Json<Vec<Curve>> {
    let snapshot = state.db.snapshot().await;
    Json(snapshot.curves().cloned().collect())
}

async fn create_curve(
    State(state): State<AppState>,
    Json(curve): Json<CurveRecord>,
) -> Result<Json<CreatedResponse>, AppError> {
    validate(&curve)?;
    let number = state.db.create_curve(&curve).await?;
    Ok(Json(CreatedResponse { number }))
}

async fn get_curve(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<Curve>, AppError> {
    let snapshot = state.db.snapshot().await;
    snapshot
        .curve(number)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Curve {} not found", number)))
}

async fn update_curve(
    State(state): State<AppState>,
    Path(number): Path<usize>,
    Json(curve): Json<CurveRecord>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate(&curve)?;
    state.db.update_curve(number, &curve).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

async fn delete_curve(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_curve(number).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/curves", get(list_curves).post(create_curve))
        .route(
            "/api/curves/{number}",
            get(get_curve).put(update_curve).delete(delete_curve),
        )
}
