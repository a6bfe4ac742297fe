use serde::{Deserialize, Serialize};

use crate::app_config::PaginationConfig;

/// Zero-based page request with a bounded page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    /// Number of rows per page
    pub page_size: u32,
}

impl PageRequest {
    /// Build a page request from raw user input.
    ///
    /// A missing or negative page becomes page 0. A missing page size uses the
    /// configured default; any size is clamped to `1..=max_page_size`.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>, config: &PaginationConfig) -> Self {
        let page = page.unwrap_or(0).clamp(0, u32::MAX as i64) as u32;
        let max = config.max_page_size.max(1) as i64;
        let page_size = page_size
            .unwrap_or(config.default_page_size as i64)
            .clamp(1, max) as u32;

        Self { page, page_size }
    }

    /// SQL LIMIT value
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// SQL OFFSET value, saturating instead of wrapping for huge pages
    pub fn offset(&self) -> i64 {
        (self.page as i64).saturating_mul(self.page_size as i64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_params(None, None, &PaginationConfig::default())
    }
}
