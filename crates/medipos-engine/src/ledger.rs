//! # Bill Ledger
//!
//! Validates and persists bill headers.
//!
//! The ledger runs first in every checkout, before any stock mutation:
//! a header that fails validation aborts the unit of work while it is
//! still empty.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{PurchaseError, PurchaseResult};
use medipos_core::{validation, Money, PurchaseBill, PurchaseRequest, RemainderPolicy};
use medipos_db::repository::bill;

/// Creates and persists bill headers with their computed monetary fields.
#[derive(Debug, Clone)]
pub struct BillLedger {
    policy: RemainderPolicy,
    tolerance_cents: i64,
}

impl BillLedger {
    /// Creates a ledger with the given remainder policy and totals
    /// reconciliation tolerance.
    pub fn new(policy: RemainderPolicy, tolerance_cents: i64) -> Self {
        BillLedger {
            policy,
            tolerance_cents,
        }
    }

    /// Validates the request header, computes the remainder, and persists
    /// the header inside the caller's unit of work.
    ///
    /// ## Errors
    /// * `InvalidBillData` - header validation or totals reconciliation
    ///   failed; raised before any stock mutation occurs
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        request: &PurchaseRequest,
    ) -> PurchaseResult<PurchaseBill> {
        validation::validate_bill_header(request).map_err(PurchaseError::InvalidBillData)?;
        validation::reconcile_totals(request, self.tolerance_cents)
            .map_err(PurchaseError::InvalidBillData)?;

        let remainder = self.policy.remainder(
            Money::from_cents(request.total_cents),
            Money::from_cents(request.received_cents),
        );

        let customer = request.customer.clone().unwrap_or_default();

        let header = PurchaseBill {
            id: bill::generate_bill_id(),
            cashier_id: request.cashier_id.clone(),
            customer_id: customer.id,
            customer_name: customer.name,
            customer_contact: customer.contact,
            net_total_cents: request.net_total_cents,
            total_cents: request.total_cents,
            discount_cents: request.discount_cents,
            received_cents: request.received_cents,
            remainder_cents: remainder.cents(),
            created_at: Utc::now(),
        };

        bill::insert_bill(conn, &header).await?;

        debug!(
            bill_id = %header.id,
            total = %header.total(),
            remainder = %header.remainder(),
            "Bill header created"
        );

        Ok(header)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
