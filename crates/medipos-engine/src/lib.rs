//! # medipos-engine: The Purchase Transaction Engine
//!
//! The one component of the MediPOS hospital suite with real consistency,
//! concurrency, and failure-handling requirements: given a point-of-sale
//! checkout, persist the bill, persist every line item, decrement each
//! referenced product's stock, and detect low-stock threshold crossings —
//! all as a single atomic unit, with best-effort asynchronous reminders
//! raised after commit.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Transaction Engine                         │
//! │                                                                         │
//! │  PurchaseRequest (validated upstream)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐   begin()                                    │
//! │  │ PurchaseEngine       │────────────► UnitOfWork (medipos-db)         │
//! │  │ (coordinator.rs)     │                  │                            │
//! │  └──────────┬───────────┘                  │ one SQLite transaction     │
//! │             │                              │                            │
//! │     ┌───────┴────────┐                     │                            │
//! │     ▼                ▼                     │                            │
//! │  ┌──────────┐  ┌──────────────────┐       │                            │
//! │  │BillLedger│  │LineItemProcessor │ × N   │                            │
//! │  │(ledger)  │  │(line.rs)         │───────┤                            │
//! │  └──────────┘  └────────┬─────────┘       │                            │
//! │                         ▼                 │                            │
//! │                  ┌──────────────┐         │                            │
//! │                  │StockAdjuster │─────────┘                            │
//! │                  │(stock.rs)    │  guarded decrement + crossing        │
//! │                  └──────────────┘  detection                           │
//! │             │                                                           │
//! │      commit │ (or rollback on any failure)                             │
//! │             ▼                                                           │
//! │  ┌──────────────────────┐  spawned task, after commit only            │
//! │  │NotificationDispatcher│────────► broadcast topic per product         │
//! │  │(notify.rs)           │          (best-effort, at-most-once)         │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coordinator`] - [`PurchaseEngine`]: one checkout = one atomic unit
//! - [`ledger`] - bill header validation and persistence
//! - [`line`] - per-line validation, persistence, stock hand-off
//! - [`stock`] - the only writer of stock counters; crossing detection
//! - [`notify`] - reminder publishing, decoupled from the transaction
//! - [`config`] - deployment-tunable policies
//! - [`error`] - the purchase error taxonomy
//!
//! ## Guarantees
//!
//! 1. **Atomicity**: a checkout leaves either all of its writes or none
//! 2. **Non-negative stock**: a decrement below zero aborts the checkout
//! 3. **Serialized counters**: concurrent decrements of one product cannot
//!    lose updates; different products do not contend
//! 4. **Decoupled reminders**: notification latency or failure never
//!    affects a committed purchase

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod line;
pub mod notify;
pub mod stock;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::EngineConfig;
pub use coordinator::{PurchaseEngine, PurchaseReceipt};
pub use error::{PurchaseError, PurchaseResult};
pub use ledger::BillLedger;
pub use line::LineItemProcessor;
pub use notify::{
    BroadcastPublisher, LowStockReminder, NotificationDispatcher, PublishError, ReminderPublisher,
};
pub use stock::StockAdjuster;
