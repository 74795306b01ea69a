pub mod products;
pub mod stats;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

pub async fn hello() -> &'static str {
    "Hello World"
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let products = state.store.read().await.len();
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "catalog-service", "products": products })),
    )
}
