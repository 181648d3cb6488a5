// Force Event panel: filter step, view model and HTTP handlers.
// The view is recomputed from the catalog snapshot on every request.

pub mod filter;
pub mod handlers;
pub mod view;

pub use view::{build_panel_view, PanelLimits, PanelSelection, PanelView};
