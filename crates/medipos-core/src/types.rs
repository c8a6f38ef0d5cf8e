//! # Domain Types
//!
//! Core domain types used throughout the MediPOS purchase engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌───────────────────┐     │
//! │  │    Product      │   │  PurchaseBill   │   │ PurchaseLineItem  │     │
//! │  │  ─────────────  │   │  ─────────────  │   │  ───────────────  │     │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)        │     │
//! │  │  stock_on_hand  │   │  cashier_id     │   │  bill_id (FK)     │     │
//! │  │  reorder_level  │   │  total_cents    │   │  product_id (FK)  │     │
//! │  │  unit_price     │   │  remainder      │   │  quantity         │     │
//! │  └─────────────────┘   └─────────────────┘   └───────────────────┘     │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌────────────────────┐                         │
//! │  │ PurchaseRequest  │   │ ThresholdCrossing  │                         │
//! │  │  ──────────────  │   │  ────────────────  │                         │
//! │  │  header fields   │   │  ephemeral event,  │                         │
//! │  │  lines: Vec<..>  │   │  never persisted   │                         │
//! │  └──────────────────┘   └────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Rules
//! - A bill exclusively owns its line items (cascade delete, no update).
//! - `Product.stock_on_hand` is mutated only through the stock adjuster,
//!   never directly by any other component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the pharmacy formulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on the bill.
    pub name: String,

    /// Catalog price in cents (smallest currency unit).
    pub unit_price_cents: i64,

    /// Current stock level. Never negative.
    pub stock_on_hand: i64,

    /// Low-stock threshold: a decrement landing at or below this level
    /// raises a reorder reminder.
    pub reorder_level: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the catalog price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Checks whether current stock is at or below the reorder level.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.stock_on_hand <= self.reorder_level
    }
}

// =============================================================================
// Purchase Bill
// =============================================================================

/// The header record of one completed point-of-sale checkout.
///
/// Immutable once committed: the engine creates bills atomically with their
/// line items and never updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseBill {
    pub id: String,
    /// Cashier who rang up the checkout.
    pub cashier_id: String,
    /// Optional registered-customer reference.
    pub customer_id: Option<String>,
    /// Walk-in customer name, if captured.
    pub customer_name: Option<String>,
    /// Walk-in customer contact, if captured.
    pub customer_contact: Option<String>,
    /// Sum of line nets (qty × price − line discount).
    pub net_total_cents: i64,
    /// Amount payable: net total minus the bill-level discount.
    pub total_cents: i64,
    /// Bill-level discount.
    pub discount_cents: i64,
    /// Amount the customer handed over.
    pub received_cents: i64,
    /// total − received; sign governed by [`RemainderPolicy`].
    pub remainder_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl PurchaseBill {
    /// Returns the amount payable as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the outstanding remainder as Money.
    #[inline]
    pub fn remainder(&self) -> Money {
        Money::from_cents(self.remainder_cents)
    }
}

// =============================================================================
// Purchase Line Item
// =============================================================================

/// One product-and-quantity entry within a bill.
///
/// Owned exclusively by its bill (cascade-deleted with it) and never updated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLineItem {
    pub id: String,
    pub bill_id: String,
    pub product_id: String,
    /// Position within the bill, preserving request order.
    pub line_no: i64,
    /// Quantity dispensed. Always > 0.
    pub quantity: i64,
    /// Unit price in cents at time of sale. Always > 0.
    pub unit_price_cents: i64,
    /// Discount applied to this line. Never negative.
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl PurchaseLineItem {
    /// Returns the line net (qty × price − discount) as Money.
    #[inline]
    pub fn line_net(&self) -> Money {
        Money::from_cents(self.quantity * self.unit_price_cents - self.discount_cents)
    }
}

// =============================================================================
// Purchase Request
// =============================================================================

/// A checkout request as handed over by the validation collaborator.
///
/// Numeric fields are already type-checked upstream; business-rule
/// validation (totals, line sanity, reconciliation) happens in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub cashier_id: String,
    pub customer: Option<CustomerRef>,
    pub net_total_cents: i64,
    pub total_cents: i64,
    pub discount_cents: i64,
    pub received_cents: i64,
    pub lines: Vec<PurchaseLine>,
}

/// Optional customer attached to a checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
}

/// One requested purchase line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
}

impl PurchaseLine {
    /// Returns the line net in cents, computed in wide arithmetic so a
    /// hostile quantity × price pair cannot overflow i64 mid-multiply.
    pub fn net_cents(&self) -> i128 {
        self.quantity as i128 * self.unit_price_cents as i128 - self.discount_cents as i128
    }
}

// =============================================================================
// Threshold Crossing
// =============================================================================

/// The event of a decrement moving a product's stock from above its reorder
/// level to at-or-below it.
///
/// Ephemeral: raised inside the transaction, handed to the notification
/// dispatcher after commit, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCrossing {
    pub product_id: String,
    pub product_name: String,
    /// Stock level produced by the decrement.
    pub stock_after: i64,
    pub reorder_level: i64,
}

// =============================================================================
// Remainder Policy
// =============================================================================

/// Governs the sign of a bill's `remainder_cents`.
///
/// Whether a remainder may go negative (representing change due to the
/// customer) is a per-deployment business decision, so it is a policy
/// rather than a fixed invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// `remainder = total − received` exactly; negative values represent
    /// change due to the customer.
    AllowChangeDue,
    /// Negative remainders are stored as zero; change is displayed
    /// separately by the till.
    ClampToZero,
}

impl RemainderPolicy {
    /// Computes the remainder for a bill under this policy.
    pub fn remainder(&self, total: Money, received: Money) -> Money {
        let raw = total - received;
        match self {
            RemainderPolicy::AllowChangeDue => raw,
            RemainderPolicy::ClampToZero => raw.clamp_non_negative(),
        }
    }
}

impl Default for RemainderPolicy {
    fn default() -> Self {
        RemainderPolicy::AllowChangeDue
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
