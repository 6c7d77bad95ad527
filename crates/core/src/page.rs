//! Pagination envelope for collection reads

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// `page`/`limit` query parameters accepted by every collection endpoint.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Effective 1-based page number.
    pub fn page(&self) -> usize {
        self.page.filter(|page| *page > 0).unwrap_or(1)
    }

    /// Effective page size, clamped to [`MAX_PAGE_SIZE`].
    pub fn limit(&self) -> usize {
        self.limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl<T> Page<T> {
    /// Slice an already-filtered, already-sorted result set into one page.
    pub fn from_filtered(items: Vec<T>, query: PageQuery) -> Self {
        let total_items = items.len();
        let limit = query.limit();
        let current_page = query.page();
        let total_pages = total_items.div_ceil(limit);
        let items = items
            .into_iter()
            .skip((current_page - 1) * limit)
            .take(limit)
            .collect();

        Self {
            items,
            total_items,
            total_pages,
            current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn limit_is_clamped() {
        let query = PageQuery {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn slices_requested_page() {
        let query = PageQuery {
            page: Some(2),
            limit: Some(3),
        };
        let page = Page::from_filtered((0..8).collect::<Vec<_>>(), query);
        assert_eq!(page.items, vec![3, 4, 5]);
        assert_eq!(page.total_items, 8);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn page_past_end_is_empty() {
        let query = PageQuery {
            page: Some(5),
            limit: Some(10),
        };
        let page = Page::from_filtered(vec![1, 2, 3], query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 5);
    }
}
