// --- File: crates/vetclinic_common/src/pagination.rs ---
use serde::Serialize;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

/// Limit/offset window of a list request, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Parses raw `limit`/`offset` query values with the default bounds.
    ///
    /// Non-numeric values fall back to the defaults; numeric ones are
    /// clamped to `[1, 500]` and `>= 0`.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::with_bounds(limit, offset, DEFAULT_LIMIT, MAX_LIMIT)
    }

    pub fn with_bounds(
        limit: Option<&str>,
        offset: Option<&str>,
        default_limit: i64,
        max_limit: i64,
    ) -> Self {
        let limit = parse_i64(limit)
            .unwrap_or(default_limit)
            .clamp(1, max_limit);
        let offset = parse_i64(offset).unwrap_or(0).max(0);
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn parse_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(page: Pagination, total: i64) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.offset + page.limit < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent_or_garbage() {
        assert_eq!(Pagination::from_query(None, None), Pagination::default());
        assert_eq!(
            Pagination::from_query(Some("abc"), Some("x1")),
            Pagination { limit: 100, offset: 0 }
        );
    }

    #[test]
    fn test_clamps_limit_and_offset() {
        assert_eq!(Pagination::from_query(Some("1000"), None).limit, 500);
        assert_eq!(Pagination::from_query(Some("0"), None).limit, 1);
        assert_eq!(Pagination::from_query(Some("-5"), None).limit, 1);
        assert_eq!(Pagination::from_query(Some(" 25 "), Some("-3")).limit, 25);
        assert_eq!(Pagination::from_query(None, Some("-3")).offset, 0);
        assert_eq!(Pagination::from_query(None, Some("40")).offset, 40);
    }

    #[test]
    fn test_custom_bounds() {
        let page = Pagination::with_bounds(Some("250"), None, 10, 100);
        assert_eq!(page.limit, 100);
        let page = Pagination::with_bounds(None, None, 10, 100);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_has_more() {
        let page = Pagination { limit: 10, offset: 0 };
        assert!(PaginationMeta::new(page, 11).has_more);
        assert!(!PaginationMeta::new(page, 10).has_more);
        let page = Pagination { limit: 10, offset: 10 };
        assert!(!PaginationMeta::new(page, 15).has_more);
    }
}
