//! Constrained Paginator: lays items out across pages bounded by item count AND name length.
//!
//! A page closes when either limit is hit:
//! - the running character budget drops to zero or below after charging an item's name, or
//! - the running item counter reaches zero after placing an item.
//!
//! The character check runs first. An item that overflows the budget opens the next page and
//! its own name length is pre-charged against that page. An item whose name alone exceeds the
//! budget is never split or dropped: it is placed, and the next named item closes its page.
//! Empty names count as no name at all: they are never charged and never close a page.

use std::num::NonZeroUsize;

use thiserror::Error;

/// Max event buttons per row in the panel.
pub const EVENT_PAGE_ITEMS: usize = 2;
/// Max total event-name characters per row in the panel.
pub const EVENT_PAGE_MAXCHARS: usize = 48;
/// Max category tabs per row in the panel.
pub const CATEGORY_PAGE_ITEMS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginateError {
    #[error("max items per page must be at least 1")]
    ZeroItemLimit,

    #[error("max characters per page must be at least 1")]
    ZeroCharLimit,
}

/// Anything that can be laid out by the paginator.
///
/// Only the name participates in the character budget; everything else on the item is
/// carried through untouched. `None` means "no usable text name" and costs nothing.
pub trait PageItem {
    fn page_name(&self) -> Option<&str>;
}

impl<T: PageItem + ?Sized> PageItem for &T {
    fn page_name(&self) -> Option<&str> {
        (**self).page_name()
    }
}

/// Validated per-page limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    max_items: NonZeroUsize,
    /// `None` disables the character budget (plain fixed-size chunking).
    max_chars: Option<NonZeroUsize>,
}

impl PageLimits {
    /// Limits with both an item ceiling and a character budget.
    pub fn new(max_items: usize, max_chars: usize) -> Result<Self, PaginateError> {
        Ok(Self {
            max_items: NonZeroUsize::new(max_items).ok_or(PaginateError::ZeroItemLimit)?,
            max_chars: Some(NonZeroUsize::new(max_chars).ok_or(PaginateError::ZeroCharLimit)?),
        })
    }

    /// Limits with only an item ceiling. Names are never charged.
    pub fn items_only(max_items: usize) -> Result<Self, PaginateError> {
        Ok(Self {
            max_items: NonZeroUsize::new(max_items).ok_or(PaginateError::ZeroItemLimit)?,
            max_chars: None,
        })
    }

    pub fn max_items(&self) -> usize {
        self.max_items.get()
    }

    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars.map(NonZeroUsize::get)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core function
// ────────────────────────────────────────────────────────────────────────────

/// Splits `items` into pages, preserving order, according to `limits`.
///
/// Pure and total: empty input yields no pages, and every item lands in exactly one page.
pub fn paginate<T, I>(items: I, limits: PageLimits) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    T: PageItem,
{
    let mut cursor = PageCursor::new(limits);

    for item in items {
        let name_len = usable_name(&item).map(name_length);
        cursor.place(item, name_len);
    }

    cursor.finish()
}

/// The name charged against the budget, if any. Empty names are not charged.
fn usable_name<T: PageItem>(item: &T) -> Option<&str> {
    item.page_name().filter(|name| !name.is_empty())
}

/// Length of a name as charged against the budget, in UTF-16 code units.
///
/// Row widths are tuned against the panel's client, which measures strings this way, so an
/// astral character such as an emoji costs 2.
pub fn name_length(name: &str) -> usize {
    name.encode_utf16().count()
}

// ────────────────────────────────────────────────────────────────────────────
// Internal state machine
// ────────────────────────────────────────────────────────────────────────────

/// Two counters mutated by a single forward pass: remaining slots and remaining characters.
struct PageCursor<T> {
    limits: PageLimits,
    pages: Vec<Vec<T>>,
    page: Vec<T>,
    slots_left: usize,
    /// May go negative when a single name exceeds the whole budget.
    chars_left: Option<i64>,
}

impl<T> PageCursor<T> {
    fn new(limits: PageLimits) -> Self {
        Self {
            limits,
            pages: Vec::new(),
            page: Vec::new(),
            slots_left: limits.max_items(),
            chars_left: full_budget(limits),
        }
    }

    fn place(&mut self, item: T, name_len: Option<usize>) {
        if let (Some(left), Some(len)) = (self.chars_left, name_len) {
            let len = to_budget(len);
            let left = left.saturating_sub(len);
            if left <= 0 {
                // would overflow the row: this item starts the next page, pre-charged
                self.close_page();
                self.slots_left = self.limits.max_items();
                self.chars_left = full_budget(self.limits).map(|full| full.saturating_sub(len));
            } else {
                self.chars_left = Some(left);
            }
        }

        self.page.push(item);
        self.slots_left -= 1;

        if self.slots_left == 0 {
            self.close_page();
            self.slots_left = self.limits.max_items();
            self.chars_left = full_budget(self.limits);
        }
    }

    fn close_page(&mut self) {
        if !self.page.is_empty() {
            self.pages.push(std::mem::take(&mut self.page));
        }
    }

    fn finish(mut self) -> Vec<Vec<T>> {
        self.close_page();
        self.pages
    }
}

fn full_budget(limits: PageLimits) -> Option<i64> {
    limits.max_chars().map(to_budget)
}

fn to_budget(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
