//! # medipos-db: Database Layer for MediPOS
//!
//! This crate provides database access for the MediPOS purchase engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediPOS Data Flow                                │
//! │                                                                         │
//! │  medipos-engine (checkout)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     medipos-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  UnitOfWork  │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs,  │    │   (uow.rs)   │  │   │
//! │  │   │               │    │  bill.rs)     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ reads + tx-   │◄───│ begin/commit │  │   │
//! │  │   │ WAL, FK, busy │    │ scoped writes │    │ /rollback    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: for tests)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`uow`] - Unit-of-work transaction wrapper
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, bill)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medipos_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/medipos.db")).await?;
//!
//! // Pool-scoped reads
//! let low = db.products().list_below_reorder(20).await?;
//!
//! // Transactional writes
//! let mut uow = db.begin().await?;
//! medipos_db::repository::bill::insert_bill(uow.conn(), &bill).await?;
//! uow.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod uow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use uow::UnitOfWork;

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::product::ProductRepository;
