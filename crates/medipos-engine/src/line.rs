//! # Line Item Processor
//!
//! Validates and persists one purchase line, then drives the stock
//! adjuster for the referenced product.
//!
//! ## Per-Line Flow
//! ```text
//! validate line ──► resolve product ──► persist line row ──► decrement stock
//!      │                 │                                        │
//!      ▼                 ▼                                        ▼
//! InvalidLineData   ProductNotFound            StockAdjuster errors propagate
//!                                              unchanged (no retry here)
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::error::{PurchaseError, PurchaseResult};
use crate::stock::StockAdjuster;
use medipos_core::{validation, PurchaseLine, PurchaseLineItem, ThresholdCrossing};
use medipos_db::repository::{bill, product};

/// Persists purchase lines and applies their stock decrements.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineItemProcessor {
    adjuster: StockAdjuster,
}

impl LineItemProcessor {
    /// Creates a new processor.
    pub fn new() -> Self {
        LineItemProcessor {
            adjuster: StockAdjuster,
        }
    }

    /// Applies one line inside the caller's unit of work.
    ///
    /// ## Errors
    /// * `InvalidLineData` - quantity < 1, price ≤ 0, or bad discount
    /// * `ProductNotFound` - the product reference does not resolve
    /// * anything `StockAdjuster::decrement` fails with, unchanged
    pub async fn apply(
        &self,
        conn: &mut SqliteConnection,
        bill_id: &str,
        line_no: usize,
        line: &PurchaseLine,
    ) -> PurchaseResult<Option<ThresholdCrossing>> {
        validation::validate_line(line)
            .map_err(|source| PurchaseError::InvalidLineData { line: line_no, source })?;

        if product::fetch_stock(conn, &line.product_id).await?.is_none() {
            return Err(PurchaseError::ProductNotFound(line.product_id.clone()));
        }

        let item = PurchaseLineItem {
            id: bill::generate_line_item_id(),
            bill_id: bill_id.to_string(),
            product_id: line.product_id.clone(),
            line_no: line_no as i64,
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            discount_cents: line.discount_cents,
            created_at: Utc::now(),
        };

        bill::insert_line_item(conn, &item).await?;

        self.adjuster
            .decrement(conn, &line.product_id, line.quantity)
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
