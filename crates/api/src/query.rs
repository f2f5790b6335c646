//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for list endpoints.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a client may request.
const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page_number=&page_size=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Effective 1-based page number.
    pub fn page_number(&self) -> i64 {
        self.page_number.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to `1..=100`.
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let params = PaginationParams {
            page_number: None,
            page_size: None,
        };
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = PaginationParams {
            page_number: Some(0),
            page_size: Some(1000),
        };
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), 100);
    }
}
