//! Filter step: picks the events the panel lays out, from explicit inputs only.
//!
//! With no active search, the panel shows the selected category. With a search, it shows
//! every event whose name contains the query (case-insensitive), across all categories.
//! Events without a usable name (missing or empty) are never filtered out by a search.

use crate::models::catalog::Event;

/// Normalizes a raw search box value: empty means "no search".
pub fn active_query(search: Option<&str>) -> Option<&str> {
    search.filter(|q| !q.is_empty())
}

/// Returns the events to paginate, in catalog order.
pub fn filter_events<'a>(
    events: &'a [Event],
    selected_category: Option<&str>,
    search_query: Option<&str>,
) -> Vec<&'a Event> {
    match active_query(search_query) {
        Some(query) => {
            let needle = query.to_lowercase();
            events
                .iter()
                .filter(|event| name_matches(event, &needle))
                .collect()
        }
        None => match selected_category {
            Some(category) => events.iter().filter(|e| e.category == category).collect(),
            None => Vec::new(),
        },
    }
}

/// `needle` must already be lowercased. Unnamed or empty-named events are kept.
fn name_matches(event: &Event, needle: &str) -> bool {
    match event.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_lowercase().contains(needle),
        _ => true,
    }
}
