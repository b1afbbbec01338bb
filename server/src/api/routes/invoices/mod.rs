//! Invoice API endpoints

pub mod types;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use types::{FilterCatalogResponse, InvoiceDto, ListInvoicesQuery};

use crate::api::extractors::{FilterQuery, ValidatedQuery};
use crate::api::server::AppState;
use crate::api::types::{ApiError, OrderBy, OrderDirection, PaginatedResponse};
use crate::data::filters::QueryTarget;
use crate::data::sqlite::repositories;
use crate::domain::invoices::{DEFAULT_INVOICE_ORDER, INVOICE_ORDER_COLUMNS};

/// Build invoice routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/invoices", get(list_invoices))
        .route("/api/v1/invoices/filters", get(list_filters))
}

/// List invoices with pagination and filters
pub async fn list_invoices(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListInvoicesQuery>,
    FilterQuery(filters): FilterQuery,
) -> Result<Json<PaginatedResponse<InvoiceDto>>, ApiError> {
    let order_by = match query.order_by.as_deref() {
        Some(ob) => OrderBy::parse(ob, INVOICE_ORDER_COLUMNS)?,
        None => OrderBy {
            column: DEFAULT_INVOICE_ORDER.to_string(),
            direction: OrderDirection::Desc,
        },
    };

    let sql_query = state.invoices.build_query(&filters)?;
    let order_sql = order_by.to_sql_mapped(|column| sql_query.qualify_column(column));
    let offset = (query.page - 1) * query.limit;

    tracing::debug!(
        filters = filters.len(),
        page = query.page,
        limit = query.limit,
        "Listing invoices"
    );

    let pool = state.db.pool();
    let (rows, total) = tokio::try_join!(
        repositories::list_invoices(pool, &sql_query, &order_sql, query.limit, offset),
        repositories::count_invoices(pool, &sql_query),
    )
    .map_err(ApiError::from_sqlite)?;

    let data = rows
        .into_iter()
        .map(|row| InvoiceDto::from_row(row, &state.invoices))
        .collect();

    Ok(Json(PaginatedResponse::new(
        data,
        query.page,
        query.limit,
        total,
    )))
}

/// Filters accepted by the invoice listing
pub async fn list_filters(State(state): State<AppState>) -> Json<FilterCatalogResponse> {
    Json(FilterCatalogResponse {
        filters: state.invoices.registry().catalog(),
    })
}
