//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Upper bound for `limit`, to keep list queries bounded.
pub const MAX_LIMIT: u32 = 200;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Creates a request, clamping page to >= 1 and limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.limit)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageMeta {
    /// Builds metadata for `request` over `total` items.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit());
        let current = u64::from(request.page);
        Self {
            current_page: request.page,
            total_pages,
            total_items: total,
            has_next: current < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 50);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 10_000);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, MAX_LIMIT);
        assert_eq!(PageRequest::new(3, 0).limit, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[rstest]
    #[case(1, 10, 0, 0, false, false)]
    #[case(1, 10, 10, 1, false, false)]
    #[case(1, 10, 11, 2, true, false)]
    #[case(2, 10, 11, 2, false, true)]
    #[case(3, 10, 95, 10, true, true)]
    fn test_page_meta(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total: u64,
        #[case] total_pages: u64,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let meta = PageMeta::new(PageRequest::new(page, limit), total);
        assert_eq!(meta.total_pages, total_pages);
        assert_eq!(meta.has_next, has_next);
        assert_eq!(meta.has_prev, has_prev);
        assert_eq!(meta.total_items, total);
    }
}
