use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Entity counts in the current snapshot
    snapshot: [usize; 3],
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (models, inputs, curves) = state.db.snapshot().await.counts();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        snapshot: [models, inputs, curves],
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
