/// Pagination handling shared by list endpoints
///
/// Wire format is camelCase (`page`, `pageSize`). Out-of-range input never
/// errors: page values below 1 clamp to 1, and a page size outside [1, 100]
/// resets to the default of 10.

use serde::Serialize;

/// Default page size when none (or an out-of-range one) is supplied
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sanitized pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: i64,

    /// Rows per page, within [1, MAX_PAGE_SIZE]
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Builds sanitized parameters from raw query values
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if (1..=MAX_PAGE_SIZE).contains(&s) => s,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, page_size }
    }

    /// Row offset for the current page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Row limit for the current page
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Pagination summary returned alongside list items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number served
    pub page: i64,

    /// Rows per page
    pub page_size: i64,

    /// Total matching rows
    pub total: i64,

    /// Total pages: ceil(total / pageSize)
    pub pages: i64,
}

impl Pagination {
    /// Computes the summary for a page of a result set
    pub fn new(params: PageParams, total: i64) -> Self {
        Self {
            page: params.page,
            page_size: params.page_size,
            total,
            pages: (total + params.page_size - 1) / params.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        assert_eq!(PageParams::new(Some(0), None).page, 1);
        assert_eq!(PageParams::new(Some(-3), None).page, 1);
    }

    #[test]
    fn test_page_size_out_of_range_resets_to_default() {
        assert_eq!(PageParams::new(None, Some(500)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageParams::new(None, Some(0)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageParams::new(None, Some(-1)).page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_boundaries_accepted() {
        assert_eq!(PageParams::new(None, Some(1)).page_size, 1);
        assert_eq!(PageParams::new(None, Some(MAX_PAGE_SIZE)).page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageParams::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(PageParams::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn test_pages_rounds_up() {
        let params = PageParams::new(Some(1), Some(10));
        assert_eq!(Pagination::new(params, 0).pages, 0);
        assert_eq!(Pagination::new(params, 10).pages, 1);
        assert_eq!(Pagination::new(params, 11).pages, 2);
        assert_eq!(Pagination::new(params, 100).pages, 10);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(PageParams::default(), 5)).unwrap();
        assert!(json.get("pageSize").is_some());
        assert!(json.get("page_size").is_none());
    }
}
