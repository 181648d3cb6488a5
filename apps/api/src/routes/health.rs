use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the size of the loaded catalog.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let catalog = state.catalog.read().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "forceevent",
        "categories": catalog.categories.len(),
        "events": catalog.events.len()
    }))
}
