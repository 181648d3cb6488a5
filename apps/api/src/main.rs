mod config;
mod dispatch;
mod errors;
mod layout;
mod models;
mod panel;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dispatch::HttpDispatchSink;
use crate::layout::PageLimits;
use crate::models::catalog::Catalog;
use crate::panel::PanelLimits;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Force Event API v{}", env!("CARGO_PKG_VERSION"));

    // Row limits are validated once here; zero limits never reach the paginator.
    let limits = PanelLimits {
        events: PageLimits::new(config.event_page_items, config.event_page_maxchars)
            .context("Invalid EVENT_PAGE_ITEMS / EVENT_PAGE_MAXCHARS")?,
        categories: PageLimits::items_only(config.category_page_items)
            .context("Invalid CATEGORY_PAGE_ITEMS")?,
    };
    info!(
        "Event rows: {} items / {} chars, category rows: {} tabs",
        config.event_page_items, config.event_page_maxchars, config.category_page_items
    );

    // Initial catalog (the game server may push a fresh one at any time)
    let catalog = match &config.event_catalog_path {
        Some(path) => Catalog::load(path).await?,
        None => {
            warn!("EVENT_CATALOG_PATH not set; starting with an empty catalog");
            Catalog::default()
        }
    };

    // Initialize dispatch client
    let dispatcher =
        HttpDispatchSink::new(config.dispatch_url.clone(), config.dispatch_token.clone())
            .context("Failed to build dispatch HTTP client")?;
    info!("Dispatch client initialized (endpoint: {})", dispatcher.url());

    let state = AppState::new(catalog, Arc::new(dispatcher), limits);

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
