//! Pagination utilities for service layer
//!
//! Query parameters arrive 1-based and unchecked; `normalize` clamps them
//! into what SeaORM's paginator expects.

use serde::{Deserialize, Serialize};

/// Pagination parameters as sent by the admin UI (`?page=2&perPage=50`).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    pub const MAX_PER_PAGE: u64 = 100;
    /// Keeps `page * per_page` far from overflowing the SQL offset.
    pub const MAX_PAGE: u64 = 100_000;

    /// Returns (0-based page index, page size).
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.clamp(1, Self::MAX_PAGE);
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        (page - 1, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of rows plus the unpaginated total.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, opts: Pagination, total: u64) -> Self {
        let (idx, per_page) = opts.normalize();
        Self { items, page: idx + 1, per_page, total }
    }
}

#[cfg(test)]
mod tests {
    use super::{Paged, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn huge_page_is_clamped() {
        let (idx, per) = Pagination { page: u64::MAX, per_page: u64::MAX }.normalize();
        assert_eq!(idx, Pagination::MAX_PAGE - 1);
        assert_eq!(per, Pagination::MAX_PER_PAGE);
        assert!(idx.checked_mul(per).is_some());
    }

    #[test]
    fn paged_reports_one_based_page() {
        let p = Paged::new(vec![1, 2], Pagination { page: 0, per_page: 2 }, 7);
        assert_eq!(p.page, 1);
        assert_eq!(p.total, 7);
    }

    #[test]
    fn missing_query_fields_use_defaults() {
        let p: Pagination = serde_json::from_str(r#"{"perPage": 5}"#).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 5);
    }
}
