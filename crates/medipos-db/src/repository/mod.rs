//! # Repository Modules
//!
//! One repository per entity, decoupling the purchase engine from the
//! storage technology:
//!
//! - [`product`] - formulary CRUD plus the transaction-scoped stock
//!   read/guarded-write pair the stock adjuster is built on
//! - [`bill`] - bill header and line item persistence and queries
//!
//! ## Two Kinds of Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pool-scoped (methods on the repository structs)                        │
//! │    • reads and standalone catalog writes                               │
//! │    • each call acquires its own connection                             │
//! │                                                                         │
//! │  Transaction-scoped (free functions taking &mut SqliteConnection)      │
//! │    • every write belonging to a purchase                               │
//! │    • callers pass `uow.conn()` so the write joins the unit of work     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
pub mod product;
