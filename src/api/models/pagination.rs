//! Shared pagination types for API query parameters.
//!
//! Tool listings use keyset (cursor) pagination: the client passes back the
//! `next_cursor` from the previous page. The cursor is inclusive - the page
//! starts at the cursor row - which is why `next_cursor` is simply the first
//! row beyond the current page.

use crate::types::ToolId;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_CURSOR_LIMIT: i64 = 50;

/// Maximum number of items that can be requested per page.
pub const MAX_CURSOR_LIMIT: i64 = 100;

/// Cursor pagination parameters for tool listing endpoints.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CursorPagination {
    /// Id of the row the page should start at, taken from the previous
    /// page's `next_cursor`.
    #[param(value_type = Option<String>, format = "uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub cursor: Option<ToolId>,

    /// Maximum number of items to return (default: 50, max: 100)
    #[param(default = 50, minimum = 1, maximum = 100)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub limit: Option<i64>,
}

impl CursorPagination {
    /// Get the limit value, clamped between 1 and MAX_CURSOR_LIMIT.
    /// Defaults to DEFAULT_CURSOR_LIMIT if not specified.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_CURSOR_LIMIT).clamp(1, MAX_CURSOR_LIMIT)
    }
}

/// Generic cursor-paginated response wrapper for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CursorPage<T: ToSchema> {
    /// The items for the current page
    pub items: Vec<T>,
    /// Cursor for the next page; absent on the last page
    #[schema(value_type = Option<String>, format = "uuid")]
    pub next_cursor: Option<ToolId>,
}

impl<T: ToSchema> CursorPage<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<ToolId>) -> Self {
        Self { items, next_cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let p = CursorPagination::default();
        assert_eq!(p.cursor, None);
        assert_eq!(p.limit(), DEFAULT_CURSOR_LIMIT);
    }

    #[test]
    fn test_limit_clamping() {
        // Zero is clamped to 1
        let p = CursorPagination {
            cursor: None,
            limit: Some(0),
        };
        assert_eq!(p.limit(), 1);

        // Negative is clamped to 1
        let p = CursorPagination {
            cursor: None,
            limit: Some(-5),
        };
        assert_eq!(p.limit(), 1);

        // Over max is clamped to MAX_CURSOR_LIMIT
        let p = CursorPagination {
            cursor: None,
            limit: Some(1000),
        };
        assert_eq!(p.limit(), MAX_CURSOR_LIMIT);

        // Valid value passes through
        let p = CursorPagination {
            cursor: None,
            limit: Some(25),
        };
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn test_query_string_parsing() {
        let p: CursorPagination = serde_urlencoded::from_str("limit=10").unwrap();
        assert_eq!(p.limit(), 10);
        assert!(p.cursor.is_none());

        let p: CursorPagination = serde_urlencoded::from_str("cursor=550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(p.cursor.is_some());
    }
}
