use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use runway_core::{ModelRecord, ResolvedModel};
use runway_sim::{simulate, Projection, RunParams, ScenarioSummary};
use serde::Serialize;

use super::CreatedResponse;
use crate::error::AppError;
use crate::AppState;

/// List raw model records from the current snapshot
async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelRecord>> {
    let snapshot = state.db.snapshot().await;
    Json(snapshot.models().cloned().collect())
}

async fn create_model(
    State(state): State<AppState>,
    Json(model): Json<ModelRecord>,
) -> Result<Json<CreatedResponse>, AppError> {
    let number = state.db.create_model(&model).await?;
    Ok(Json(CreatedResponse { number }))
}

/// Load a model from the snapshot with inputs and curves resolved
async fn resolve(state: &AppState, number: usize) -> Result<ResolvedModel, AppError> {
    let snapshot = state.db.snapshot().await;
    if snapshot.model(number).is_none() {
        return Err(AppError::NotFound(format!("Model {} not found", number)));
    }
    Ok(snapshot.deref_model(number)?)
}

async fn get_model(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<ResolvedModel>, AppError> {
    Ok(Json(resolve(&state, number).await?))
}

async fn update_model(
    State(state): State<AppState>,
    Path(number): Path<usize>,
    Json(model): Json<ModelRecord>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.update_model(number, &model).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

async fn delete_model(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_model(number).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

async fn link_input(
    State(state): State<AppState>,
    Path((model, input)): Path<(usize, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.link_input(model, input).await?;
    Ok(Json(serde_json::json!({ "linked": true })))
}

async fn unlink_input(
    State(state): State<AppState>,
    Path((model, input)): Path<(usize, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.unlink_input(model, input).await?;
    Ok(Json(serde_json::json!({ "unlinked": true })))
}

/// All three scenarios plus derived figures for the selected one
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    #[serde(flatten)]
    pub projection: Projection,
    pub summary: ScenarioSummary,
}

/// Run low/mid/high projections of a model
async fn simulate_model(
    State(state): State<AppState>,
    Path(number): Path<usize>,
    Json(params): Json<RunParams>,
) -> Result<Json<SimulationResponse>, AppError> {
    let model = resolve(&state, number).await?;
    let projection = simulate(&model, &params)?;
    let summary = projection.summary();
    tracing::debug!(
        model = number,
        scenario = %params.scenario,
        days = projection.mid.totals.len(),
        net = summary.net,
        "simulated model"
    );
    Ok(Json(SimulationResponse {
        projection,
        summary,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/models", get(list_models).post(create_model))
        .route(
            "/api/models/{number}",
            get(get_model).put(update_model).delete(delete_model),
        )
        .route(
            "/api/models/{number}/inputs/{input}",
            post(link_input).delete(unlink_input),
        )
        .route("/api/models/{number}/simulate", post(simulate_model))
}
