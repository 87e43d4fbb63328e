pub mod identify;
pub mod sessions;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};
use shared::Product;

use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The catalog product
pub async fn catalog(State(state): State<AppState>) -> Json<Product> {
    Json(state.catalog.product().clone())
}
