//! Shared API types
//!
//! Common types used across all API endpoints including error handling,
//! pagination, and sorting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use validator::ValidationError;

use crate::data::filters::FilterError;

/// Maximum items per page for paginated endpoints
pub const MAX_PAGE_LIMIT: u32 = 500;
/// Maximum page number to prevent expensive OFFSET queries
pub const MAX_PAGE: u32 = 100;
/// Default page number
pub const DEFAULT_PAGE: u32 = 1;
/// Default items per page
pub const DEFAULT_LIMIT: u32 = 50;

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    if page > MAX_PAGE {
        return Err(ValidationError::new("page_max").with_message(
            format!("Page must be <= {} to prevent expensive queries", MAX_PAGE).into(),
        ));
    }
    Ok(())
}

/// Validator function for limit parameter
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::new("limit_range")
            .with_message(format!("Limit must be between 1 and {}", MAX_PAGE_LIMIT).into()));
    }
    Ok(())
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    /// Field-scoped rejection of a filter value or operator
    Validation {
        field: String,
        code: String,
        message: String,
    },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_sqlite(e: crate::data::sqlite::SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        match e {
            crate::data::DataError::Filter(filter) => filter.into(),
            other => {
                tracing::error!(error = %other, "Data error");
                Self::Internal {
                    message: "Database operation failed".to_string(),
                }
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        match e {
            FilterError::UnknownFilter { .. } => Self::bad_request(e.code(), e.to_string()),
            FilterError::UnknownRelation { .. } => {
                tracing::error!(error = %e, "Filter references an unmapped relation");
                Self::internal("Filter configuration error")
            }
            _ => Self::validation(e.field(), e.code(), e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "bad_request", "code": code, "message": message }),
            ),
            Self::NotFound { code, message } => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "not_found", "code": code, "message": message }),
            ),
            Self::Validation {
                field,
                code,
                message,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "validation_error",
                    "code": code,
                    "field": field,
                    "message": message
                }),
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "internal_error",
                    "code": "INTERNAL",
                    "message": message
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Pagination metadata in response
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        Self {
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit.max(1) as u64),
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total_items: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(page, limit, total_items),
        }
    }
}

/// OrderBy query parameter parsing
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OrderDirection {
    #[default]
    Desc,
    Asc,
}

impl OrderDirection {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl OrderBy {
    pub fn parse(s: &str, allowed_columns: &[&str]) -> Result<Self, ApiError> {
        let parts: Vec<&str> = s.split(':').collect();
        let (column, direction) = match parts.as_slice() {
            [col] => (*col, OrderDirection::Desc),
            [col, "asc"] => (*col, OrderDirection::Asc),
            [col, "desc"] => (*col, OrderDirection::Desc),
            _ => {
                return Err(ApiError::bad_request(
                    "INVALID_ORDER",
                    "Invalid order_by format. Use 'column' or 'column:asc' or 'column:desc'",
                ));
            }
        };
        if !allowed_columns.contains(&column) {
            return Err(ApiError::bad_request(
                "INVALID_ORDER_COLUMN",
                format!("Cannot order by: {}", column),
            ));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// Generate SQL with column name mapping (e.g. qualifying with a table alias)
    pub fn to_sql_mapped<F>(&self, mapper: F) -> String
    where
        F: Fn(&str) -> String,
    {
        format!("{} {}", mapper(&self.column), self.direction.as_sql())
    }
}
