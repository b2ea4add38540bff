mod curves;
mod health;
mod inputs;
mod models;
mod reload;

use axum::Router;

use crate::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(reload::router())
        .merge(models::router())
        .merge(inputs::router())
        .merge(curves::router())
}

/// Response for row-creating operations
#[derive(Debug, serde::Serialize)]
pub struct CreatedResponse {
    pub number: usize,
}
