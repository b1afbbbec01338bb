//! Invoice repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::query::{ROOT_ALIAS, SqlQuery};
use crate::data::sqlite::SqliteError;
use crate::data::filters::SqlValue;
use crate::data::types::{InvoiceRow, NewInvoice, NewLineItem};
use crate::utils::time::ZERO_DATETIME;

type InvoiceTuple = (
    i64,
    String,
    Option<i64>,
    Option<String>,
    String,
    f64,
    String,
    String,
    bool,
    i64,
);

pub async fn insert_invoice(pool: &SqlitePool, invoice: &NewInvoice) -> Result<(), SqliteError> {
    sqlx::query(
        r#"
        INSERT INTO invoices (id, number, customer_id, status, total_amount, issued_at, paid_at, is_recurring)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(invoice.id)
    .bind(&invoice.number)
    .bind(invoice.customer_id)
    .bind(&invoice.status)
    .bind(invoice.total_amount)
    .bind(&invoice.issued_at)
    .bind(invoice.paid_at.as_deref().unwrap_or(ZERO_DATETIME))
    .bind(invoice.is_recurring)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_line_item(pool: &SqlitePool, item: &NewLineItem) -> Result<i64, SqliteError> {
    let result = sqlx::query(
        r#"
        INSERT INTO line_items (invoice_id, product_id, product_name, quantity, unit_price)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.invoice_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// List invoices matching the query's filters.
///
/// `order_by` is a trusted, already qualified ORDER BY expression.
pub async fn list_invoices(
    pool: &SqlitePool,
    query: &SqlQuery,
    order_by: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<InvoiceRow>, SqliteError> {
    let sql = format!(
        r#"
        SELECT {a}.id, {a}.number, {a}.customer_id, c.name, {a}.status, {a}.total_amount,
               {a}.issued_at, {a}.paid_at, {a}.is_recurring,
               (SELECT COUNT(*) FROM line_items li WHERE li.invoice_id = {a}.id)
        FROM invoices AS {a}
        LEFT JOIN customers AS c ON c.id = {a}.customer_id
        {where_clause}
        ORDER BY {order_by}, {a}.id ASC
        LIMIT ? OFFSET ?
        "#,
        a = ROOT_ALIAS,
        where_clause = query.where_clause(),
        order_by = order_by,
    );

    let mut params = query.params().clone();
    params.push(SqlValue::Integer(limit.into()));
    params.push(SqlValue::Integer(offset.into()));
    let args = params.to_arguments().map_err(sqlx::Error::Encode)?;

    let rows: Vec<InvoiceTuple> = sqlx::query_as_with::<sqlx::Sqlite, InvoiceTuple, _>(&sql, args)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(
            |(
                id,
                number,
                customer_id,
                customer_name,
                status,
                total_amount,
                issued_at,
                paid_at,
                is_recurring,
                line_item_count,
            )| InvoiceRow {
                id,
                number,
                customer_id,
                customer_name,
                status,
                total_amount,
                issued_at,
                paid_at,
                is_recurring,
                line_item_count,
            },
        )
        .collect())
}

/// Count invoices matching the query's filters
pub async fn count_invoices(pool: &SqlitePool, query: &SqlQuery) -> Result<u64, SqliteError> {
    let sql = format!(
        "SELECT COUNT(*) FROM invoices AS {} {}",
        ROOT_ALIAS,
        query.where_clause()
    );
    let args = query.params().to_arguments().map_err(sqlx::Error::Encode)?;
    let count: i64 = sqlx::query_scalar_with::<sqlx::Sqlite, i64, _>(&sql, args)
        .fetch_one(pool)
        .await?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filters::{Column, CompareOp, Predicate, QueryTarget};
    use crate::data::sqlite::query::{Relation, RelationCatalog};
    use crate::data::sqlite::repositories::insert_customer;
    use crate::data::sqlite::SqliteService;
    use crate::data::types::NewCustomer;

    fn invoice(id: i64, number: &str, customer_id: Option<i64>, total: f64) -> NewInvoice {
        NewInvoice {
            id,
            number: number.to_string(),
            customer_id,
            status: "S".to_string(),
            total_amount: total,
            issued_at: "2025-01-15 09:00:00".to_string(),
            paid_at: None,
            is_recurring: false,
        }
    }

    fn catalog() -> Arc<RelationCatalog> {
        Arc::new(RelationCatalog::new().with_relation(
            "invoices",
            "lineItems",
            Relation::new("line_items", "id", "invoice_id"),
        ))
    }

    async fn setup() -> SqliteService {
        let db = SqliteService::in_memory().await.unwrap();
        insert_customer(
            db.pool(),
            &NewCustomer {
                id: 1,
                name: "Acme".to_string(),
                country_code: "DE".to_string(),
                status: "A".to_string(),
                email: None,
            },
        )
        .await
        .unwrap();
        insert_invoice(db.pool(), &invoice(1, "INV-1", Some(1), 50.0)).await.unwrap();
        insert_invoice(db.pool(), &invoice(2, "INV-2", None, 150.0)).await.unwrap();
        insert_line_item(
            db.pool(),
            &NewLineItem {
                invoice_id: 1,
                product_id: None,
                product_name: "Widget".to_string(),
                quantity: 2,
                unit_price: 25.0,
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_list_without_filters() {
        let db = setup().await;
        let query = SqlQuery::new(catalog(), "invoices");

        let rows = list_invoices(db.pool(), &query, "t0.number ASC", 10, 0).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, "INV-1");
        assert_eq!(rows[0].customer_name.as_deref(), Some("Acme"));
        assert_eq!(rows[0].line_item_count, 1);
        assert_eq!(rows[1].customer_name, None);
        assert_eq!(rows[1].paid_at, ZERO_DATETIME);
        assert_eq!(count_invoices(db.pool(), &query).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_applies_predicates_and_paging() {
        let db = setup().await;
        let mut query = SqlQuery::new(catalog(), "invoices");
        query
            .add_predicate(Predicate::Compare {
                column: Column::new("total_amount"),
                op: CompareOp::Gt,
                value: SqlValue::Integer(100),
            })
            .unwrap();

        let rows = list_invoices(db.pool(), &query, "t0.number ASC", 10, 0).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(count_invoices(db.pool(), &query).await.unwrap(), 1);

        let all = SqlQuery::new(catalog(), "invoices");
        let page = list_invoices(db.pool(), &all, "t0.number ASC", 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].number, "INV-2");
    }

    #[tokio::test]
    async fn test_line_items_cascade_with_invoice() {
        let db = setup().await;
        sqlx::query("DELETE FROM invoices WHERE id = 1")
            .execute(db.pool())
            .await
            .unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM line_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
