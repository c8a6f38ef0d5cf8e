//! # Unit of Work
//!
//! One atomic scope over the bill, its line items, and all stock
//! decrements: either everything inside commits together or nothing does.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Unit of Work Lifecycle                             │
//! │                                                                         │
//! │  Database::begin()                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InProgress ── repository writes on uow.conn() ──┐                      │
//! │       │                                          │                      │
//! │       ├── commit()   → Committed (all writes durable)                  │
//! │       ├── rollback() → Aborted  (zero durable writes)                  │
//! │       └── drop       → Aborted  (sqlx rolls the tx back)               │
//! │                                                                         │
//! │  No partial state is observable from any other connection.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::debug;

use crate::error::DbResult;

/// An open SQLite transaction wrapped as an explicit begin/commit/rollback
/// contract.
///
/// Holds one pooled connection for its whole lifetime; dropping it without
/// committing rolls the transaction back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        UnitOfWork { tx }
    }

    /// Returns the transaction's connection for repository write functions.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Makes every write in this unit durable.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write in this unit.
    ///
    /// Dropping the unit has the same effect; the explicit form exists so
    /// callers can surface rollback failures instead of losing them.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}
