//! Customer repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::NewCustomer;

pub async fn insert_customer(pool: &SqlitePool, customer: &NewCustomer) -> Result<(), SqliteError> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, name, country_code, status, email)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(customer.id)
    .bind(&customer.name)
    .bind(&customer.country_code)
    .bind(&customer.status)
    .bind(customer.email.as_deref())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    #[tokio::test]
    async fn test_insert_customer_enforces_status_codes() {
        let db = SqliteService::in_memory().await.unwrap();
        let mut customer = NewCustomer {
            id: 1,
            name: "Acme".to_string(),
            country_code: "DE".to_string(),
            status: "A".to_string(),
            email: Some("billing@acme.test".to_string()),
        };
        insert_customer(db.pool(), &customer).await.unwrap();

        customer.id = 2;
        customer.status = "active".to_string();
        assert!(insert_customer(db.pool(), &customer).await.is_err());
    }
}
