use std::sync::Arc;

use tokio::sync::RwLock;

use crate::dispatch::DispatchSink;
use crate::models::catalog::Catalog;
use crate::panel::PanelLimits;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Latest catalog pushed by the game server. Replaced wholesale on refresh.
    pub catalog: Arc<RwLock<Catalog>>,
    /// Pluggable dispatch backend. Default: HttpDispatchSink pointed at DISPATCH_URL.
    pub dispatcher: Arc<dyn DispatchSink>,
    /// Row limits for category tabs and event buttons.
    pub limits: PanelLimits,
}

impl AppState {
    pub fn new(catalog: Catalog, dispatcher: Arc<dyn DispatchSink>, limits: PanelLimits) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            dispatcher,
            limits,
        }
    }
}
