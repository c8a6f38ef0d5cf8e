//! # Bill Repository
//!
//! Database operations for purchase bills and their line items.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT HEADER (inside a unit of work)                              │
//! │     └── insert_bill(conn, &bill)                                       │
//! │                                                                         │
//! │  2. INSERT LINES (same unit of work, request order)                    │
//! │     └── insert_line_item(conn, &item)   × N                            │
//! │                                                                         │
//! │  3. COMMIT                                                             │
//! │     └── header + lines + stock decrements become durable together      │
//! │                                                                         │
//! │  There is no update path: committed bills are immutable. Deleting a   │
//! │  bill (out of scope for the engine) cascades to its line items.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use medipos_core::{PurchaseBill, PurchaseLineItem};

/// Column list shared by every bill SELECT.
const BILL_COLUMNS: &str = "id, cashier_id, customer_id, customer_name, customer_contact, \
     net_total_cents, total_cents, discount_cents, received_cents, remainder_cents, created_at";

/// Column list shared by every line item SELECT.
const LINE_COLUMNS: &str =
    "id, bill_id, product_id, line_no, quantity, unit_price_cents, discount_cents, created_at";

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Gets a bill by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PurchaseBill>> {
        let bill = sqlx::query_as::<_, PurchaseBill>(&format!(
            "SELECT {BILL_COLUMNS} FROM purchase_bills WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets all line items for a bill, in request order.
    pub async fn get_line_items(&self, bill_id: &str) -> DbResult<Vec<PurchaseLineItem>> {
        let items = sqlx::query_as::<_, PurchaseLineItem>(&format!(
            "SELECT {LINE_COLUMNS} FROM purchase_line_items WHERE bill_id = ? ORDER BY line_no"
        ))
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a cashier's most recent bills (dashboard collaborator reads).
    pub async fn recent_for_cashier(
        &self,
        cashier_id: &str,
        limit: u32,
    ) -> DbResult<Vec<PurchaseBill>> {
        let bills = sqlx::query_as::<_, PurchaseBill>(&format!(
            r#"
            SELECT {BILL_COLUMNS} FROM purchase_bills
            WHERE cashier_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#
        ))
        .bind(cashier_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }

    /// Counts line items referencing a bill.
    pub async fn count_line_items(&self, bill_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM purchase_line_items WHERE bill_id = ?")
                .bind(bill_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Counts all bills (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Write Operations
// =============================================================================

/// Inserts a bill header inside the caller's transaction.
pub async fn insert_bill(conn: &mut SqliteConnection, bill: &PurchaseBill) -> DbResult<()> {
    debug!(id = %bill.id, cashier = %bill.cashier_id, "Inserting bill header");

    sqlx::query(
        r#"
        INSERT INTO purchase_bills (
            id, cashier_id, customer_id, customer_name, customer_contact,
            net_total_cents, total_cents, discount_cents,
            received_cents, remainder_cents, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&bill.id)
    .bind(&bill.cashier_id)
    .bind(&bill.customer_id)
    .bind(&bill.customer_name)
    .bind(&bill.customer_contact)
    .bind(bill.net_total_cents)
    .bind(bill.total_cents)
    .bind(bill.discount_cents)
    .bind(bill.received_cents)
    .bind(bill.remainder_cents)
    .bind(bill.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts one line item inside the caller's transaction.
pub async fn insert_line_item(
    conn: &mut SqliteConnection,
    item: &PurchaseLineItem,
) -> DbResult<()> {
    debug!(bill_id = %item.bill_id, product_id = %item.product_id, "Inserting line item");

    sqlx::query(
        r#"
        INSERT INTO purchase_line_items (
            id, bill_id, product_id, line_no,
            quantity, unit_price_cents, discount_cents, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.bill_id)
    .bind(&item.product_id)
    .bind(item.line_no)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.discount_cents)
    .bind(item.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Generates a new bill ID.
pub fn generate_bill_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new line item ID.
pub fn generate_line_item_id() -> String {
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
    use medipos_core::Product;

    fn bill(cashier: &str) -> PurchaseBill {
        PurchaseBill {
            id: generate_bill_id(),
            cashier_id: cashier.to_string(),
            customer_id: None,
            customer_name: Some("A. Silva".to_string()),
            customer_contact: None,
            net_total_cents: 3000,
            total_cents: 2800,
            discount_cents: 200,
            received_cents: 3000,
            remainder_cents: -200,
            created_at: Utc::now(),
        }
    }

    fn item(bill_id: &str, product_id: &str, line_no: i64) -> PurchaseLineItem {
        PurchaseLineItem {
            id: generate_line_item_id(),
            bill_id: bill_id.to_string(),
            product_id: product_id.to_string(),
            line_no,
            quantity: 2,
            unit_price_cents: 750,
            discount_cents: 0,
            created_at: Utc::now(),
        }
    }

    async fn seeded_product(db: &Database) -> Product {
        let now = Utc::now();
        let product = Product {
            id: "prod-1".to_string(),
            name: "Omeprazole 20mg".to_string(),
            unit_price_cents: 750,
            stock_on_hand: 100,
            reorder_level: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_bill_with_lines_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seeded_product(&db).await;

        let header = bill("cashier-1");
        let mut uow = db.begin().await.unwrap();
        insert_bill(uow.conn(), &header).await.unwrap();
        insert_line_item(uow.conn(), &item(&header.id, &product.id, 0))
            .await
            .unwrap();
        insert_line_item(uow.conn(), &item(&header.id, &product.id, 1))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let repo = db.bills();
        let loaded = repo.get_by_id(&header.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 2800);
        assert_eq!(loaded.remainder_cents, -200);

        let lines = repo.get_line_items(&header.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_no, 0);
        assert_eq!(lines[1].line_no, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_bill_and_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seeded_product(&db).await;

        let header = bill("cashier-2");
        let mut uow = db.begin().await.unwrap();
        insert_bill(uow.conn(), &header).await.unwrap();
        insert_line_item(uow.conn(), &item(&header.id, &product.id, 0))
            .await
            .unwrap();
        uow.rollback().await.unwrap();

        let repo = db.bills();
        assert!(repo.get_by_id(&header.id).await.unwrap().is_none());
        assert_eq!(repo.count_line_items(&header.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_line_item_requires_existing_bill() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seeded_product(&db).await;

        let mut uow = db.begin().await.unwrap();
        let orphan = item("no-such-bill", &product.id, 0);
        let err = insert_line_item(uow.conn(), &orphan).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_deleting_bill_cascades_to_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seeded_product(&db).await;

        let header = bill("cashier-3");
        let mut uow = db.begin().await.unwrap();
        insert_bill(uow.conn(), &header).await.unwrap();
        insert_line_item(uow.conn(), &item(&header.id, &product.id, 0))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        // The engine never deletes bills; exercise the schema's ownership
        // rule directly.
        sqlx::query("DELETE FROM purchase_bills WHERE id = ?")
            .bind(&header.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(db.bills().count_line_items(&header.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recent_for_cashier_filters_by_cashier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for cashier in ["cashier-a", "cashier-a", "cashier-b"] {
            let header = bill(cashier);
            let mut uow = db.begin().await.unwrap();
            insert_bill(uow.conn(), &header).await.unwrap();
            uow.commit().await.unwrap();
        }

        let repo = db.bills();
        assert_eq!(repo.recent_for_cashier("cashier-a", 10).await.unwrap().len(), 2);
        assert_eq!(repo.recent_for_cashier("cashier-b", 10).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
