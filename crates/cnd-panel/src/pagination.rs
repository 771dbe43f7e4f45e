//! Fixed-size pagination over the filtered list.

use std::ops::Range;

/// Records per page.
pub const PAGE_SIZE: usize = 10;

/// `ceil(len / PAGE_SIZE)`. Zero for an empty list.
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page into `[1, total_pages]`; always 1 for an empty list.
pub fn clamp_page(requested: usize, len: usize) -> usize {
    requested.clamp(1, total_pages(len).max(1))
}

/// Index range of `page` within a list of `len` records.
pub fn page_range(page: usize, len: usize) -> Range<usize> {
    let page = clamp_page(page, len);
    let start = ((page - 1) * PAGE_SIZE).min(len);
    let end = (page * PAGE_SIZE).min(len);
    start..end
}

/// "Showing first to last of total" footer data, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl PageSummary {
    /// Summary of `page` within a list of `len` records.
    pub fn new(page: usize, len: usize) -> Self {
        let range = page_range(page, len);
        Self {
            first: if range.is_empty() { 0 } else { range.start + 1 },
            last: range.end,
            total: len,
        }
    }
}

impl std::fmt::Display for PageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "showing {} to {} of {} records",
            self.first, self.last, self.total
        )
    }
}
