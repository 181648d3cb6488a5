//! Panel view model: category tab rows, section title and event button rows.
//!
//! Everything here is a pure function of the catalog snapshot and an explicit
//! `PanelSelection`; the service keeps no per-admin UI state.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::{paginate, PageLimits};
use crate::models::catalog::{Catalog, Category, Event};
use crate::panel::filter::{active_query, filter_events};

const SEARCHING_TITLE: &str = "Searching...";
const CUSTOMIZATION_NOTE: &str = " Includes admin customization.";
const CUSTOMIZATION_ICON: &str = "gear";

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// What the admin currently has selected. Passed in on every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelSelection {
    /// Defaults to the first catalog category.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_announce")]
    pub announce: bool,
}

impl Default for PanelSelection {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            announce: default_announce(),
        }
    }
}

fn default_announce() -> bool {
    true
}

/// Row limits for the two paginated areas of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLimits {
    pub events: PageLimits,
    pub categories: PageLimits,
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTab {
    pub name: String,
    pub icon: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventButton {
    pub name: Option<String>,
    /// Dispatch-type token to send back when the button is pressed.
    #[serde(rename = "type")]
    pub event_type: String,
    pub tooltip: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelView {
    pub section_title: String,
    pub category_tabs: Vec<Vec<CategoryTab>>,
    pub event_rows: Vec<Vec<EventButton>>,
    pub announce: bool,
    pub searching: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Core function
// ────────────────────────────────────────────────────────────────────────────

/// Builds the panel for one selection.
///
/// Fails with `NotFound` if the selection names a category the catalog does not have.
pub fn build_panel_view(
    catalog: &Catalog,
    selection: &PanelSelection,
    limits: &PanelLimits,
) -> Result<PanelView, AppError> {
    let category = resolve_category(catalog, selection.category.as_deref())?;
    let query = active_query(selection.search.as_deref());

    let tabs = paginate(catalog.categories.iter(), limits.categories);
    let category_tabs: Vec<Vec<CategoryTab>> = tabs
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cat| CategoryTab {
                    name: cat.name.clone(),
                    icon: cat.icon.clone(),
                    selected: category.is_some_and(|selected| selected.name == cat.name),
                })
                .collect()
        })
        .collect();

    let shown = filter_events(&catalog.events, category.map(|c| c.name.as_str()), query);
    let event_rows: Vec<Vec<EventButton>> = paginate(shown, limits.events)
        .into_iter()
        .map(|row| row.into_iter().map(event_button).collect())
        .collect();

    let section_title = match (query, category) {
        (Some(_), _) => SEARCHING_TITLE.to_string(),
        (None, Some(cat)) => format!("{} Events", cat.name),
        (None, None) => "Events".to_string(),
    };

    Ok(PanelView {
        section_title,
        category_tabs,
        event_rows,
        announce: selection.announce,
        searching: query.is_some(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_category<'a>(
    catalog: &'a Catalog,
    requested: Option<&str>,
) -> Result<Option<&'a Category>, AppError> {
    match requested {
        Some(name) => catalog
            .category(name)
            .map(Some)
            .ok_or_else(|| AppError::NotFound(format!("Category '{name}' not found"))),
        None => Ok(catalog.categories.first()),
    }
}

fn event_button(event: &Event) -> EventButton {
    let tooltip = if event.has_customization {
        format!("{}{CUSTOMIZATION_NOTE}", event.description)
    } else {
        event.description.clone()
    };

    EventButton {
        name: event.name.clone(),
        event_type: event.event_type.clone(),
        tooltip,
        icon: event
            .has_customization
            .then(|| CUSTOMIZATION_ICON.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CATEGORY_PAGE_ITEMS, EVENT_PAGE_ITEMS, EVENT_PAGE_MAXCHARS};

    fn limits() -> PanelLimits {
        PanelLimits {
            events: PageLimits::new(EVENT_PAGE_ITEMS, EVENT_PAGE_MAXCHARS).unwrap(),
            categories: PageLimits::items_only(CATEGORY_PAGE_ITEMS).unwrap(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            name: name.to_string(),
            icon: name.to_lowercase(),
        }
    }

    fn event(name: &str, category: &str, custom: bool) -> Event {
        Event {
            name: Some(name.to_string()),
            description: format!("{name} happens."),
            event_type: name.to_lowercase().replace(' ', "_"),
            category: category.to_string(),
            has_customization: custom,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            categories: ["Fun", "Space Threats", "Engineering", "Health", "Bureaucratic"]
                .into_iter()
                .map(category)
                .collect(),
            events: vec![
                event("Clown Car", "Fun", false),
                event("Disco Inferno", "Fun", true),
                event("Mass Hallucination", "Fun", false),
                event("Meteor Wave", "Space Threats", true),
                event("Grid Check", "Engineering", false),
            ],
        }
    }

    fn row_names(view: &PanelView) -> Vec<Vec<String>> {
        view.event_rows
            .iter()
            .map(|row| row.iter().filter_map(|b| b.name.clone()).collect())
            .collect()
    }

    #[test]
    fn test_defaults_to_first_category() {
        let view = build_panel_view(&catalog(), &PanelSelection::default(), &limits()).unwrap();
        assert_eq!(view.section_title, "Fun Events");
        assert!(view.announce);
        assert!(!view.searching);
        assert_eq!(
            row_names(&view),
            vec![
                vec!["Clown Car", "Disco Inferno"],
                vec!["Mass Hallucination"]
            ]
        );
    }

    #[test]
    fn test_category_tabs_four_per_row_with_selection() {
        let selection = PanelSelection {
            category: Some("Health".to_string()),
            ..PanelSelection::default()
        };
        let view = build_panel_view(&catalog(), &selection, &limits()).unwrap();

        assert_eq!(view.category_tabs.len(), 2);
        assert_eq!(view.category_tabs[0].len(), 4);
        assert_eq!(view.category_tabs[1].len(), 1);

        let selected: Vec<&str> = view
            .category_tabs
            .iter()
            .flatten()
            .filter(|t| t.selected)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(selected, vec!["Health"]);
        assert_eq!(view.section_title, "Health Events");
        assert!(view.event_rows.is_empty());
    }

    #[test]
    fn test_search_title_and_cross_category_results() {
        let selection = PanelSelection {
            category: Some("Engineering".to_string()),
            search: Some("WAVE".to_string()),
            announce: false,
        };
        let view = build_panel_view(&catalog(), &selection, &limits()).unwrap();
        assert_eq!(view.section_title, "Searching...");
        assert!(view.searching);
        assert!(!view.announce);
        assert_eq!(row_names(&view), vec![vec!["Meteor Wave"]]);
    }

    #[test]
    fn test_customization_tooltip_and_icon() {
        let view = build_panel_view(&catalog(), &PanelSelection::default(), &limits()).unwrap();
        let plain = &view.event_rows[0][0];
        let custom = &view.event_rows[0][1];

        assert_eq!(plain.tooltip, "Clown Car happens.");
        assert_eq!(plain.icon, None);
        assert_eq!(
            custom.tooltip,
            "Disco Inferno happens. Includes admin customization."
        );
        assert_eq!(custom.icon.as_deref(), Some("gear"));
        assert_eq!(custom.event_type, "disco_inferno");
    }

    #[test]
    fn test_unknown_category_is_not_found() {
        let selection = PanelSelection {
            category: Some("Nope".to_string()),
            ..PanelSelection::default()
        };
        let err = build_panel_view(&catalog(), &selection, &limits()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_empty_catalog_renders_empty_panel() {
        let view =
            build_panel_view(&Catalog::default(), &PanelSelection::default(), &limits()).unwrap();
        assert_eq!(view.section_title, "Events");
        assert!(view.category_tabs.is_empty());
        assert!(view.event_rows.is_empty());
    }

    #[test]
    fn test_long_names_split_rows() {
        let mut catalog = catalog();
        catalog.events = vec![
            event("Communications Blackout", "Fun", false),
            event("Processor Overload Cascade", "Fun", false),
        ];
        let view = build_panel_view(&catalog, &PanelSelection::default(), &limits()).unwrap();
        // 23 + 26 = 49 > 48, so the second button wraps to its own row
        assert_eq!(view.event_rows.len(), 2);
    }
}
