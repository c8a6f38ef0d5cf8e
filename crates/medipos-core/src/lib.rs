//! # medipos-core: Pure Business Logic for the MediPOS Purchase Engine
//!
//! This crate is the **heart** of the pharmacy point-of-sale. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediPOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Hospital Suite Collaborators                       │   │
//! │  │    request validation • routing • dashboards • HR/payroll      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PurchaseRequest                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    medipos-engine                               │   │
//! │  │    coordinator, ledger, line processor, stock adjuster         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ medipos-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │validation │  │   error   │  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │  typed    │  │   │
//! │  │   │   Bill    │  │ (cents)   │  │  checks   │  │  errors   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PurchaseBill, PurchaseLineItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use medipos_core::Money` instead of
// `use medipos_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of line items allowed on a single bill
///
/// ## Business Reason
/// Prevents runaway checkouts and keeps one atomic unit of work to a
/// reasonable size. Can be made configurable per-facility in future versions.
pub const MAX_BILL_LINES: usize = 200;

/// Maximum quantity of a single product on one line
///
/// ## Business Reason
/// Prevents accidental over-dispensing (e.g., typing 1000 instead of 10).
/// Configurable per-facility in future versions.
pub const MAX_LINE_QUANTITY: i64 = 9_999;
