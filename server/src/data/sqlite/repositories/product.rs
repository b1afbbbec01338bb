//! Product repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::NewProduct;

pub async fn insert_product(pool: &SqlitePool, product: &NewProduct) -> Result<(), SqliteError> {
    sqlx::query("INSERT INTO products (id, sku, category) VALUES (?, ?, ?)")
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.category)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    #[tokio::test]
    async fn test_insert_product_rejects_duplicate_sku() {
        let db = SqliteService::in_memory().await.unwrap();
        let product = NewProduct {
            id: 1,
            sku: "WID-1".to_string(),
            category: "hardware".to_string(),
        };
        insert_product(db.pool(), &product).await.unwrap();

        let duplicate = NewProduct { id: 2, ..product };
        assert!(insert_product(db.pool(), &duplicate).await.is_err());
    }
}
