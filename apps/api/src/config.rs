use anyhow::{Context, Result};

use crate::layout::{CATEGORY_PAGE_ITEMS, EVENT_PAGE_ITEMS, EVENT_PAGE_MAXCHARS};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Game server endpoint that executes forced events.
    pub dispatch_url: String,
    pub dispatch_token: Option<String>,
    /// JSON file with the initial `{ categories, events }` catalog.
    pub event_catalog_path: Option<String>,
    pub event_page_items: usize,
    pub event_page_maxchars: usize,
    pub category_page_items: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            dispatch_url: lookup("DISPATCH_URL").with_context(|| {
                "Required environment variable 'DISPATCH_URL' is not set".to_string()
            })?,
            dispatch_token: lookup("DISPATCH_TOKEN").filter(|t| !t.is_empty()),
            event_catalog_path: lookup("EVENT_CATALOG_PATH").filter(|p| !p.is_empty()),
            event_page_items: parse_or(&lookup, "EVENT_PAGE_ITEMS", EVENT_PAGE_ITEMS)?,
            event_page_maxchars: parse_or(&lookup, "EVENT_PAGE_MAXCHARS", EVENT_PAGE_MAXCHARS)?,
            category_page_items: parse_or(&lookup, "CATEGORY_PAGE_ITEMS", CATEGORY_PAGE_ITEMS)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
