use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

/// Body returned by delete endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub id: uuid::Uuid,
}

// =============================================================================
// PAGINATION
// =============================================================================

pub fn default_page() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Page window shared by every list endpoint.
///
/// Built from the raw `page` / `page_size` query values; out of range
/// values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationQuery {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// SQL OFFSET. Saturates at `i64::MAX` for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// `%term%` pattern for `ILIKE ... ESCAPE '\'`, or `None` for a blank term.
///
/// `\`, `%` and `_` in the term match literally.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|s| !s.is_empty())?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// =============================================================================
// SORTING
// =============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset_and_clamp() {
        let q = PaginationQuery::new(3, 20);
        assert_eq!(q.offset(), 40);

        let q = PaginationQuery::new(0, 1000);
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_pagination_huge_page_does_not_overflow() {
        let q = PaginationQuery::new(i64::MAX, DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), i64::MAX);

        let q = PaginationQuery::new(i64::MIN, i64::MIN);
        assert_eq!(q.limit(), 1);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(None), None);
        assert_eq!(contains_pattern(Some("   ")), None);
        assert_eq!(contains_pattern(Some(" oak ")).as_deref(), Some("%oak%"));
        assert_eq!(
            contains_pattern(Some("50%_off")).as_deref(),
            Some(r"%50\%\_off%")
        );
        assert_eq!(contains_pattern(Some(r"a\b")).as_deref(), Some(r"%a\\b%"));
    }
}
