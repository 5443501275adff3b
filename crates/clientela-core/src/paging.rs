//! Client-side paging arithmetic over the visible records.

use std::ops::Range;

use serde::Serialize;

use crate::error::CoreError;

/// Derived paging view. `total_pages` is `ceil(total_items / page_size)`;
/// an empty list has zero pages but still sits on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether `page` is a valid navigation target. Page 1 always is.
    pub fn contains(&self, page: usize) -> bool {
        page == 1 || (1..=self.total_pages).contains(&page)
    }

    pub fn check(&self, page: usize) -> Result<(), CoreError> {
        if self.contains(page) {
            Ok(())
        } else {
            Err(CoreError::PageOutOfRange {
                requested: page,
                total_pages: self.total_pages,
            })
        }
    }

    /// Index range of the current page, clamped to the item count.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's items out of `items`.
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.range()).unwrap_or_default()
    }
}
