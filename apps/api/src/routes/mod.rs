pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::panel::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog (pushed by the game server)
        .route(
            "/api/v1/catalog",
            get(handlers::handle_get_catalog).put(handlers::handle_replace_catalog),
        )
        // Panel
        .route("/api/v1/panel", get(handlers::handle_get_panel))
        .route("/api/v1/events/fire", post(handlers::handle_fire_event))
        .with_state(state)
}
