//! # Stock Adjuster
//!
//! The single gate through which product stock counters change.
//!
//! ## Decrement Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    decrement(product, qty)                              │
//! │                                                                         │
//! │  1. Read stock + reorder level inside the unit of work                 │
//! │       │   (the SQLite write transaction serializes competing           │
//! │       │    writers; disjoint products don't contend at this layer)     │
//! │       ▼                                                                 │
//! │  2. new = stock − qty                                                  │
//! │       │                                                                 │
//! │       ├── new < 0 ──► InsufficientStock, nothing written               │
//! │       ▼                                                                 │
//! │  3. Guarded write: UPDATE ... WHERE stock_on_hand = old                │
//! │       │                                                                 │
//! │       ├── 0 rows ──► ConcurrencyConflict (another writer won)          │
//! │       ▼                                                                 │
//! │  4. old > level && new ≤ level ──► Some(ThresholdCrossing)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is atomic with respect to the counter and participates in the
//! caller's unit of work: if the surrounding checkout aborts, the decrement
//! rolls back with it.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{PurchaseError, PurchaseResult};
use medipos_core::ThresholdCrossing;
use medipos_db::repository::product;

/// Applies signed quantity deltas to product stock counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockAdjuster;

impl StockAdjuster {
    /// Decrements one product's stock by `qty` inside the caller's unit of
    /// work.
    ///
    /// ## Returns
    /// * `Ok(Some(crossing))` - the decrement moved stock from above the
    ///   reorder level to at-or-below it
    /// * `Ok(None)` - decremented without crossing the threshold
    ///
    /// ## Errors
    /// * `ProductNotFound` - unknown or soft-deleted product
    /// * `InsufficientStock` - the decrement would take stock negative;
    ///   the counter is left untouched
    /// * `ConcurrencyConflict` - the counter changed between read and
    ///   write; the whole request is safe to retry
    pub async fn decrement(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        qty: i64,
    ) -> PurchaseResult<Option<ThresholdCrossing>> {
        let level = product::fetch_stock(conn, product_id)
            .await?
            .ok_or_else(|| PurchaseError::ProductNotFound(product_id.to_string()))?;

        let new_stock = level.stock_on_hand - qty;
        if new_stock < 0 {
            return Err(PurchaseError::InsufficientStock {
                product_id: level.id,
                name: level.name,
                available: level.stock_on_hand,
                requested: qty,
            });
        }

        let stored =
            product::store_stock_guarded(conn, product_id, level.stock_on_hand, new_stock).await?;
        if !stored {
            return Err(PurchaseError::ConcurrencyConflict(format!(
                "stock counter for product {product_id} changed during the transaction"
            )));
        }

        debug!(
            product_id = %product_id,
            from = level.stock_on_hand,
            to = new_stock,
            "Stock decremented"
        );

        // A crossing fires only on the transition from above the reorder
        // level to at-or-below it.
        let crossed =
            level.stock_on_hand > level.reorder_level && new_stock <= level.reorder_level;

        Ok(crossed.then(|| ThresholdCrossing {
            product_id: product_id.to_string(),
            product_name: level.name,
            stock_after: new_stock,
            reorder_level: level.reorder_level,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
