use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::layout::PageItem;

/// A named grouping of events, shown as a tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub icon: String,
}

/// A dispatchable game action as reported by the game server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// `None` when the server sent no name or a non-string value.
    #[serde(default, deserialize_with = "text_or_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Dispatch-type token forwarded verbatim when the event is fired.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "boolean_like")]
    pub has_customization: bool,
}

impl PageItem for Event {
    fn page_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PageItem for Category {
    fn page_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Everything the panel needs from the game server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Catalog {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn event_by_type(&self, event_type: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.event_type == event_type)
    }

    /// Loads a catalog snapshot from a JSON file.
    pub async fn load(path: &str) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event catalog '{path}'"))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .with_context(|| format!("Event catalog '{path}' is not valid JSON"))?;
        info!(
            "Loaded event catalog: {} categories, {} events",
            catalog.categories.len(),
            catalog.events.len()
        );
        Ok(catalog)
    }
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accepts `true`/`false`, numbers (non-zero is true) and null.
fn boolean_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}
