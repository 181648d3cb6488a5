use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::dispatch::{DispatchReceipt, ForceEventRequest};
use crate::errors::AppError;
use crate::models::catalog::Catalog;
use crate::panel::{build_panel_view, PanelSelection, PanelView};
use crate::state::AppState;

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.read().await.clone())
}

/// PUT /api/v1/catalog
pub async fn handle_replace_catalog(
    State(state): State<AppState>,
    Json(catalog): Json<Catalog>,
) -> Result<StatusCode, AppError> {
    if let Some(pos) = catalog.events.iter().position(|e| e.event_type.is_empty()) {
        return Err(AppError::Validation(format!(
            "Event at index {pos} has an empty type"
        )));
    }

    info!(
        "Catalog replaced: {} categories, {} events",
        catalog.categories.len(),
        catalog.events.len()
    );
    *state.catalog.write().await = catalog;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/panel
pub async fn handle_get_panel(
    State(state): State<AppState>,
    Query(selection): Query<PanelSelection>,
) -> Result<Json<PanelView>, AppError> {
    let catalog = state.catalog.read().await;
    let view = build_panel_view(&catalog, &selection, &state.limits)?;
    Ok(Json(view))
}

/// POST /api/v1/events/fire
pub async fn handle_fire_event(
    State(state): State<AppState>,
    Json(req): Json<ForceEventRequest>,
) -> Result<(StatusCode, Json<DispatchReceipt>), AppError> {
    let known = state
        .catalog
        .read()
        .await
        .event_by_type(&req.event_type)
        .is_some();
    if !known {
        return Err(AppError::NotFound(format!(
            "Event type '{}' not found",
            req.event_type
        )));
    }

    info!(
        event_type = %req.event_type,
        announce = req.announce,
        "Forcing event"
    );
    let receipt = state.dispatcher.fire(&req).await?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
