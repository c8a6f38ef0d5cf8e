//! # Transaction Coordinator
//!
//! Orchestrates one checkout as a single atomic unit of work.
//!
//! ## Checkout State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout State Machine                             │
//! │                                                                         │
//! │                      ┌──────────────┐                                   │
//! │      begin() ───────►│  InProgress  │                                   │
//! │                      └──────┬───────┘                                   │
//! │                             │                                           │
//! │        ledger.create ───────┤                                           │
//! │        lines.apply × N ─────┤                                           │
//! │                             │                                           │
//! │              ┌──────────────┴──────────────┐                            │
//! │              ▼                             ▼                            │
//! │      ┌──────────────┐              ┌──────────────┐                     │
//! │      │  Committed   │              │   Aborted    │                     │
//! │      │ bill + lines │              │ zero durable │                     │
//! │      │ + decrements │              │    writes    │                     │
//! │      └──────┬───────┘              └──────────────┘                     │
//! │             │                                                           │
//! │             ▼  (after commit, off the critical path)                    │
//! │      dispatcher.dispatch(crossings)                                     │
//! │                                                                         │
//! │  Exactly two terminal states; no partial commit is observable.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::PurchaseResult;
use crate::ledger::BillLedger;
use crate::line::LineItemProcessor;
use crate::notify::{BroadcastPublisher, NotificationDispatcher, ReminderPublisher};
use medipos_core::{PurchaseRequest, ThresholdCrossing};
use medipos_db::{Database, UnitOfWork};

/// The successful outcome of a checkout.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    /// Identity of the committed bill.
    pub bill_id: String,
    /// Threshold crossings observed during the transaction, in line order.
    pub crossings: Vec<ThresholdCrossing>,
}

/// The purchase transaction engine.
///
/// One `checkout` call = one unit of work: the bill, all its line items,
/// and every stock decrement commit together or not at all. Concurrent
/// checkouts are safe; decrements against the same product serialize,
/// decrements against different products do not contend.
///
/// ## Usage
/// ```rust,ignore
/// let engine = PurchaseEngine::new(db, EngineConfig::default());
/// let receipt = engine.checkout(request).await?;
/// println!("bill {} committed", receipt.bill_id);
/// ```
pub struct PurchaseEngine {
    db: Database,
    ledger: BillLedger,
    lines: LineItemProcessor,
    dispatcher: NotificationDispatcher,
}

impl PurchaseEngine {
    /// Creates an engine with an in-process broadcast publisher for
    /// low-stock reminders.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        let publisher = Arc::new(BroadcastPublisher::new(config.reminder_capacity));
        Self::with_publisher(db, config, publisher)
    }

    /// Creates an engine over a custom reminder publisher (an external
    /// pub/sub bridge, a test probe, ...).
    pub fn with_publisher(
        db: Database,
        config: EngineConfig,
        publisher: Arc<dyn ReminderPublisher>,
    ) -> Self {
        PurchaseEngine {
            db,
            ledger: BillLedger::new(config.remainder_policy, config.reconcile_tolerance_cents),
            lines: LineItemProcessor::new(),
            dispatcher: NotificationDispatcher::new(publisher),
        }
    }

    /// Returns the notification dispatcher (to reach its publisher).
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Runs one checkout to a terminal state.
    ///
    /// On success the bill, its line items, and all stock decrements are
    /// durable, and the observed threshold crossings have been handed to
    /// the notification dispatcher. On failure nothing is durable and the
    /// typed error says why; the kind and message are also recorded for
    /// operators before returning.
    pub async fn checkout(&self, request: PurchaseRequest) -> PurchaseResult<PurchaseReceipt> {
        let mut uow = self.db.begin().await?;

        match self.apply(&mut uow, &request).await {
            Ok(receipt) => {
                uow.commit().await?;
                info!(
                    bill_id = %receipt.bill_id,
                    lines = request.lines.len(),
                    crossings = receipt.crossings.len(),
                    "Purchase committed"
                );
                // After commit only: delivery failures cannot reach back
                // into the already-final result.
                self.dispatcher.dispatch(receipt.crossings.clone());
                Ok(receipt)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Purchase aborted");
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback after abort failed");
                }
                Err(err)
            }
        }
    }

    /// The in-transaction body: header first, then every line in request
    /// order. Any error here aborts the whole unit.
    async fn apply(
        &self,
        uow: &mut UnitOfWork,
        request: &PurchaseRequest,
    ) -> PurchaseResult<PurchaseReceipt> {
        let header = self.ledger.create(uow.conn(), request).await?;

        let mut crossings = Vec::new();
        for (line_no, line) in request.lines.iter().enumerate() {
            if let Some(crossing) = self.lines.apply(uow.conn(), &header.id, line_no, line).await? {
                crossings.push(crossing);
            }
        }

        Ok(PurchaseReceipt {
            bill_id: header.id,
            crossings,
        })
    }
}

impl std::fmt::Debug for PurchaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurchaseEngine").finish_non_exhaustive()
    }
}
