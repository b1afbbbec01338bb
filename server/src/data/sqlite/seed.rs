//! Demo data for an empty database

use sqlx::SqlitePool;

use super::SqliteError;
use super::repositories::{insert_customer, insert_invoice, insert_line_item, insert_product};
use crate::data::types::{NewCustomer, NewInvoice, NewLineItem, NewProduct};

/// Insert demo customers, products and invoices unless invoices exist.
///
/// Returns whether data was inserted.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool, SqliteError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!(existing, "Skipping demo seed, invoices present");
        return Ok(false);
    }

    let customers = [
        (1, "Acme GmbH", "DE", "A", Some("billing@acme.test")),
        (2, "Globex", "US", "A", None),
        (3, "Initech", "US", "I", Some("ap@initech.test")),
    ];
    for (id, name, country, status, email) in customers {
        insert_customer(
            pool,
            &NewCustomer {
                id,
                name: name.to_string(),
                country_code: country.to_string(),
                status: status.to_string(),
                email: email.map(str::to_string),
            },
        )
        .await?;
    }

    let products = [(1, "WID-1", "hardware"), (2, "GAD-1", "hardware"), (3, "SUP-1", "services")];
    for (id, sku, category) in products {
        insert_product(
            pool,
            &NewProduct {
                id,
                sku: sku.to_string(),
                category: category.to_string(),
            },
        )
        .await?;
    }

    let invoices = [
        (
            1,
            "INV-0001",
            Some(1),
            "P",
            120.0,
            "2025-01-15 09:30:00",
            Some("2025-01-20 14:00:00"),
            false,
        ),
        (2, "INV-0002", Some(2), "S", 80.0, "2025-01-15 23:59:59", None, true),
        (3, "INV-0003", Some(3), "D", 0.0, "2025-02-01 10:00:00", None, false),
        (4, "INV-0004", None, "V", 300.0, "2025-02-10 08:15:00", None, false),
    ];
    for (id, number, customer_id, status, total, issued_at, paid_at, recurring) in invoices {
        insert_invoice(
            pool,
            &NewInvoice {
                id,
                number: number.to_string(),
                customer_id,
                status: status.to_string(),
                total_amount: total,
                issued_at: issued_at.to_string(),
                paid_at: paid_at.map(str::to_string),
                is_recurring: recurring,
            },
        )
        .await?;
    }

    let items = [
        (1, Some(1), "Widget", 2, 40.0),
        (1, Some(3), "Support plan", 1, 40.0),
        (2, Some(2), "Gadget", 1, 80.0),
        (4, Some(1), "Widget", 5, 40.0),
        (4, Some(2), "Gadget", 1, 100.0),
    ];
    for (invoice_id, product_id, product_name, quantity, unit_price) in items {
        insert_line_item(
            pool,
            &NewLineItem {
                invoice_id,
                product_id,
                product_name: product_name.to_string(),
                quantity,
                unit_price,
            },
        )
        .await?;
    }

    tracing::info!("Seeded demo invoices");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let db = SqliteService::in_memory().await.unwrap();
        assert!(seed_demo_data(db.pool()).await.unwrap());
        assert!(!seed_demo_data(db.pool()).await.unwrap());

        let invoices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(invoices, 4);
    }
}
