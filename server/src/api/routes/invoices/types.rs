//! Invoice API types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::{default_limit, default_page, validate_limit, validate_page};
use crate::data::filters::FilterDescriptor;
use crate::data::types::InvoiceRow;
use crate::domain::InvoiceCatalog;
use crate::utils::time::ZERO_DATETIME;

/// Paging and ordering for `GET /api/v1/invoices`.
///
/// Filter parameters are read separately by `FilterQuery`.
#[derive(Debug, Deserialize, Validate)]
pub struct ListInvoicesQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
    /// `column`, `column:asc` or `column:desc`
    pub order_by: Option<String>,
}

/// Invoice as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDto {
    pub id: i64,
    pub number: String,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub status: String,
    pub total_amount: f64,
    pub issued_at: String,
    pub paid_at: Option<String>,
    pub is_recurring: bool,
    pub line_item_count: i64,
}

impl InvoiceDto {
    pub fn from_row(row: InvoiceRow, catalog: &InvoiceCatalog) -> Self {
        let status = catalog.status_token(&row.status).to_string();
        let paid_at = (row.paid_at != ZERO_DATETIME).then_some(row.paid_at);
        Self {
            id: row.id,
            number: row.number,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            status,
            total_amount: row.total_amount,
            issued_at: row.issued_at,
            paid_at,
            is_recurring: row.is_recurring,
            line_item_count: row.line_item_count,
        }
    }
}

/// Response for `GET /api/v1/invoices/filters`
#[derive(Debug, Serialize)]
pub struct FilterCatalogResponse {
    pub filters: Vec<FilterDescriptor>,
}
