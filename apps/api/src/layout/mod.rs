// Row layout for the panel: constrained pagination of named items.
// Pure and synchronous; cheap enough to run inline on every request.

pub mod paginator;

// Re-export the public API consumed by the panel and config modules.
pub use paginator::{
    paginate, PageItem, PageLimits, CATEGORY_PAGE_ITEMS, EVENT_PAGE_ITEMS, EVENT_PAGE_MAXCHARS,
};
