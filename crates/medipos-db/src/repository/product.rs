//! # Product Repository
//!
//! Database operations for the pharmacy formulary.
//!
//! ## Key Operations
//! - CRUD over product records
//! - Transaction-scoped stock read + guarded write (the stock adjuster's
//!   storage primitive)
//! - Reorder report (products at or below their reorder level)
//!
//! ## Guarded Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: Unguarded absolute update (lost updates possible)           │
//! │     UPDATE products SET stock_on_hand = 7 WHERE id = ?                 │
//! │                                                                         │
//! │  ✅ CORRECT: Compare-and-swap on the value that was read               │
//! │     UPDATE products SET stock_on_hand = 7                              │
//! │     WHERE id = ? AND stock_on_hand = 10                                │
//! │                                                                         │
//! │  Zero rows affected means another writer got there first; the         │
//! │  caller surfaces that as a retryable conflict instead of silently     │
//! │  overwriting the other writer's decrement.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medipos_core::Product;

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str =
    "id, name, unit_price_cents, stock_on_hand, reorder_level, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, unit_price_cents,
                stock_on_hand, reorder_level, is_active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.unit_price_cents)
        .bind(product.stock_on_hand)
        .bind(product.reorder_level)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a product's catalog fields (name, price, reorder level,
    /// active flag).
    ///
    /// Deliberately does NOT touch `stock_on_hand`: stock moves only
    /// through the guarded transaction-scoped write below.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?,
                unit_price_cents = ?,
                reorder_level = ?,
                is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.unit_price_cents)
        .bind(product.reorder_level)
        .bind(product.is_active)
        .bind(now)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical bills still reference the product, so rows are never
    /// physically removed.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products at or below their reorder level, lowest
    /// stock first (the pharmacist's reorder worklist).
    pub async fn list_below_reorder(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE is_active = 1 AND stock_on_hand <= reorder_level
            ORDER BY stock_on_hand ASC, name
            LIMIT ?
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Stock Operations
// =============================================================================

/// A product's stock counter as read inside a unit of work.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockLevel {
    pub id: String,
    pub name: String,
    pub stock_on_hand: i64,
    pub reorder_level: i64,
}

/// Reads a product's stock counter and reorder level inside the caller's
/// transaction. Soft-deleted products do not resolve.
pub async fn fetch_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
) -> DbResult<Option<StockLevel>> {
    let level = sqlx::query_as::<_, StockLevel>(
        r#"
        SELECT id, name, stock_on_hand, reorder_level
        FROM products
        WHERE id = ? AND is_active = 1
        "#,
    )
    .bind(product_id)
    .fetch_optional(conn)
    .await?;

    Ok(level)
}

/// Writes a product's stock counter inside the caller's transaction,
/// guarded by the value the caller read.
///
/// ## Returns
/// * `Ok(true)` - the guard matched and the new value is in place
/// * `Ok(false)` - another writer changed the counter since it was read
pub async fn store_stock_guarded(
    conn: &mut SqliteConnection,
    product_id: &str,
    expected_stock: i64,
    new_stock: i64,
) -> DbResult<bool> {
    debug!(
        id = %product_id,
        from = expected_stock,
        to = new_stock,
        "Storing stock level"
    );

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_on_hand = ?, updated_at = ?
        WHERE id = ? AND stock_on_hand = ?
        "#,
    )
    .bind(new_stock)
    .bind(now)
    .bind(product_id)
    .bind(expected_stock)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn product(name: &str, stock: i64, reorder: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            unit_price_cents: 1250,
            stock_on_hand: stock,
            reorder_level: reorder,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Ibuprofen 200mg", 40, 10);
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ibuprofen 200mg");
        assert_eq!(loaded.stock_on_hand, 40);
        assert_eq!(loaded.reorder_level, 10);
        assert!(loaded.is_active);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_does_not_touch_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut p = product("Cetirizine 10mg", 25, 5);
        repo.insert(&p).await.unwrap();

        p.name = "Cetirizine 10mg (30 pack)".to_string();
        p.stock_on_hand = 999; // must be ignored by update()
        repo.update(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Cetirizine 10mg (30 pack)");
        assert_eq!(loaded.stock_on_hand, 25);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_stock_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Expired Stock Item", 5, 1);
        repo.insert(&p).await.unwrap();
        repo.soft_delete(&p.id).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let level = fetch_stock(uow.conn(), &p.id).await.unwrap();
        assert!(level.is_none());
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_guarded_stock_write() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Paracetamol 500mg", 10, 3);
        repo.insert(&p).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let level = fetch_stock(uow.conn(), &p.id).await.unwrap().unwrap();
        assert_eq!(level.stock_on_hand, 10);

        // Guard matches the value we read
        assert!(store_stock_guarded(uow.conn(), &p.id, 10, 7).await.unwrap());
        // Stale guard no longer matches
        assert!(!store_stock_guarded(uow.conn(), &p.id, 10, 4).await.unwrap());
        uow.commit().await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock_on_hand, 7);
    }

    #[tokio::test]
    async fn test_list_below_reorder() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&product("Well Stocked", 50, 10)).await.unwrap();
        repo.insert(&product("At Threshold", 10, 10)).await.unwrap();
        repo.insert(&product("Nearly Out", 1, 10)).await.unwrap();

        let low = repo.list_below_reorder(10).await.unwrap();
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Nearly Out", "At Threshold"]);
    }
}
