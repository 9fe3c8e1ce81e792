//! Client-side pagination over an in-memory result set.
//!
//! The caller always holds the full filtered array; `Pagination` only tracks
//! which slice is visible and which page buttons to render.

use serde::Serialize;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [12, 24, 48, 96];

/// Pages are listed in full up to this count; above it the window collapses.
const MAX_UNCOLLAPSED_PAGES: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageItem {
    Page { number: usize, active: bool },
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_items: usize,
    items_per_page: usize,
}

impl Pagination {
    /// `current_page` is 1-based and clamped into range.
    pub fn new(current_page: usize, total_items: usize, items_per_page: usize) -> Self {
        let mut p = Self {
            current_page: 1,
            total_items,
            items_per_page: items_per_page.max(1),
        };
        p.current_page = current_page.clamp(1, p.total_pages().max(1));
        p
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Move to `page`. Out-of-range pages (0, or past the last page) are
    /// ignored, matching disabled page buttons. Returns whether the page
    /// changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    /// Change the page size and jump back to the first page.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Update the total after the underlying filter changed, keeping the
    /// current page if it still exists.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages().max(1));
    }

    /// Index range of the visible page within the full array.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.current_page - 1) * self.items_per_page;
        let start = start.min(self.total_items);
        let end = (start + self.items_per_page).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    /// Page buttons to render: first, last, the current page ±1, and an
    /// ellipsis wherever pages are skipped.
    pub fn window(&self) -> Vec<PageItem> {
        let total = self.total_pages();
        let page = |number: usize| PageItem::Page {
            number,
            active: number == self.current_page,
        };

        if total <= MAX_UNCOLLAPSED_PAGES {
            return (1..=total).map(page).collect();
        }

        let lo = self.current_page.saturating_sub(1).max(2);
        let hi = (self.current_page + 1).min(total - 1);

        let mut items = vec![page(1)];
        if lo > 2 {
            items.push(PageItem::Ellipsis);
        }
        items.extend((lo..=hi).map(page));
        if hi < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(page(total));
        items
    }

    /// "Showing 13–24 of 55".
    pub fn summary(&self) -> String {
        if self.total_items == 0 {
            return "No results".to_string();
        }
        let range = self.range();
        format!("Showing {}–{} of {}", range.start + 1, range.end, self.total_items)
    }
}
