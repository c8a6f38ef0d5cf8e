//! # Purchase Error Taxonomy
//!
//! The caller-facing error type for the purchase engine.
//!
//! ## Abort Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Classes                                      │
//! │                                                                         │
//! │  InvalidBillData    ┐                                                  │
//! │  InvalidLineData    │  abort the whole transaction;                    │
//! │  ProductNotFound    │  zero durable side effects                       │
//! │  InsufficientStock  ┘                                                  │
//! │                                                                         │
//! │  ConcurrencyConflict → transient lock contention; the entire           │
//! │                        request is safe to retry                        │
//! │                                                                         │
//! │  Persistence        → storage failure; abort, surface generically,     │
//! │                        detail recorded for operators                   │
//! │                                                                         │
//! │  (Reminder delivery failures are logged by the dispatcher and never   │
//! │   appear here.)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use medipos_core::ValidationError;
use medipos_db::DbError;

/// Errors a checkout can fail with.
///
/// Every variant except `ConcurrencyConflict` is deterministic for a given
/// request and database state: retrying an aborted request against
/// unchanged stock produces the same outcome.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The bill header failed business-rule validation.
    /// Raised before any stock mutation occurs.
    #[error("invalid bill data: {0}")]
    InvalidBillData(#[source] ValidationError),

    /// A line failed business-rule validation (quantity, price, discount).
    #[error("invalid line data at line {line}: {source}")]
    InvalidLineData {
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// A line references a product that does not resolve (unknown id or
    /// soft-deleted).
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A decrement would take a product's stock negative.
    #[error("insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Transient lock contention; safe to retry the entire request.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Underlying storage failure.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl PurchaseError {
    /// Stable kind label recorded for operators when a checkout aborts.
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseError::InvalidBillData(_) => "invalid_bill_data",
            PurchaseError::InvalidLineData { .. } => "invalid_line_data",
            PurchaseError::ProductNotFound(_) => "product_not_found",
            PurchaseError::InsufficientStock { .. } => "insufficient_stock",
            PurchaseError::ConcurrencyConflict(_) => "concurrency_conflict",
            PurchaseError::Persistence(_) => "persistence",
        }
    }

    /// True if the whole request may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PurchaseError::ConcurrencyConflict(_))
    }
}

/// Collapse database errors into the purchase taxonomy: contention stays
/// retryable, everything else is a generic persistence failure whose detail
/// lives in the message for operators.
impl From<DbError> for PurchaseError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Busy(msg) => PurchaseError::ConcurrencyConflict(msg),
            other => PurchaseError::Persistence(other.to_string()),
        }
    }
}

/// Result type for purchase operations.
pub type PurchaseResult<T> = Result<T, PurchaseError>;

// =============================================================================
// Unit Tests
// =============================================================================
