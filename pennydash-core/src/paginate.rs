//! Pagination over already-fetched rows.
//!
//! Pages are 1-based. Out-of-range pages yield an empty window; nothing
//! here panics on a bad page number.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 15;

/// The rows visible on `page`: `rows[(page-1)*size .. page*size]`, clamped.
///
/// Page 0 is treated as page 1. A zero page size yields nothing.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// No upper bound; callers decide whether "next" is meaningful.
pub fn next_page(page: usize) -> usize {
    page.saturating_add(1)
}

/// Floors at page 1.
pub fn prev_page(page: usize) -> usize {
    page.saturating_sub(1).max(1)
}

/// Number of pages needed for `len` rows; at least 1 so an empty table
/// still reads "page 1 of 1".
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Current page plus the fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// Start at page 1. A zero size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        Self { page: 1, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to `page` (floored at 1).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next(&mut self) {
        self.page = next_page(self.page);
    }

    pub fn prev(&mut self) {
        self.page = prev_page(self.page);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Whether a following page would contain any rows.
    pub fn has_next(&self, len: usize) -> bool {
        self.page.saturating_mul(self.page_size) < len
    }

    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        paginate(rows, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_seven_rows_by_fifteen() {
        let rows: Vec<u32> = (0..47).collect();
        assert_eq!(paginate(&rows, 1, 15).len(), 15);
        assert_eq!(paginate(&rows, 3, 15).len(), 15);
        assert_eq!(paginate(&rows, 4, 15), &[45, 46]);
        assert!(paginate(&rows, 5, 15).is_empty());
        assert_eq!(page_count(47, 15), 4);
    }

    #[test]
    fn page_zero_is_page_one() {
        let rows = [1, 2, 3];
        assert_eq!(paginate(&rows, 0, 2), &[1, 2]);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let rows = [1, 2, 3];
        assert!(paginate(&rows, usize::MAX, usize::MAX).is_empty());
        assert_eq!(next_page(usize::MAX), usize::MAX);
    }

    #[test]
    fn prev_floors_at_one() {
        assert_eq!(prev_page(1), 1);
        assert_eq!(prev_page(prev_page(1)), 1);
        assert_eq!(prev_page(5), 4);
        assert_eq!(prev_page(0), 1);
    }

    #[test]
    fn page_state_navigation() {
        let mut state = PageState::new(15);
        assert!(state.has_next(47));
        state.next();
        state.next();
        state.next();
        assert_eq!(state.page(), 4);
        assert!(!state.has_next(47));
        assert_eq!(state.window(&(0..47).collect::<Vec<u32>>()), &[45, 46]);
        state.prev();
        assert_eq!(state.page(), 3);
        state.reset();
        state.prev();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn zero_size_falls_back_to_default() {
        assert_eq!(PageState::new(0).page_size(), DEFAULT_PAGE_SIZE);
        assert!(paginate(&[1, 2], 1, 0).is_empty());
    }
}
