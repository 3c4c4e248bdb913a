//! Page links for paginated templates.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Page numbers to render, with `None` marking a gap ("…").
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page links without the items, for views that render their rows from
/// another source.
pub fn page_links(current_page: usize, total_pages: usize) -> Vec<Option<usize>> {
    get_pages(total_pages, current_page.clamp(1, total_pages.max(1)), 2, 2, 4, 2)
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = current_page.max(1);

        Self {
            items,
            pages: page_links(current_page, total_pages),
            page: current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_lists_show_every_page() {
        assert_eq!(page_links(1, 3), vec![Some(1), Some(2), Some(3)]);
        assert!(page_links(1, 0).is_empty());
    }

    #[test]
    fn long_lists_collapse_into_gaps() {
        let pages = page_links(10, 20);

        assert_eq!(&pages[..3], &[Some(1), Some(2), None]);
        assert!(pages.contains(&Some(10)));
        assert_eq!(&pages[pages.len() - 3..], &[None, Some(19), Some(20)]);
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let paginated = Paginated::new(vec!["a"], 0, 1);
        assert_eq!(paginated.page, 1);
    }

    #[test]
    fn huge_current_page_does_not_overflow() {
        assert_eq!(page_links(usize::MAX, 3), vec![Some(1), Some(2), Some(3)]);
    }
}
