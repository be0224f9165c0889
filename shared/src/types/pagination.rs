//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Pagination parameters for list endpoints (1-indexed pages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Create a pagination, clamping values into the accepted range
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Sanitize values received from a query string
    pub fn normalized(self) -> Self {
        Self::new(self.page, self.limit)
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Limit as u64 for repository calls
    pub fn limit_u64(&self) -> u64 {
        u64::from(self.limit)
    }

    /// Build the response metadata for a total count
    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta::new(total, *self)
    }
}

/// Metadata attached to paginated list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total: u64, pagination: Pagination) -> Self {
        let limit = u64::from(pagination.limit.max(1));
        Self {
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
