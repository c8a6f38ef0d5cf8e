//! End-to-end checkout behavior: atomicity, stock invariants, threshold
//! crossings, remainder arithmetic, and concurrent last-unit contention.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

use medipos_core::{Product, PurchaseLine, PurchaseRequest, RemainderPolicy};
use medipos_db::{Database, DbConfig};
use medipos_engine::{BroadcastPublisher, EngineConfig, PurchaseEngine, PurchaseError};

// =============================================================================
// Helpers
// =============================================================================

async fn in_memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn add_product(db: &Database, name: &str, stock: i64, reorder: i64) -> String {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        unit_price_cents: 500,
        stock_on_hand: stock,
        reorder_level: reorder,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product.id
}

fn engine_with_probe(db: &Database) -> (PurchaseEngine, Arc<BroadcastPublisher>) {
    let publisher = Arc::new(BroadcastPublisher::new(16));
    let engine = PurchaseEngine::with_publisher(
        db.clone(),
        EngineConfig::default(),
        publisher.clone(),
    );
    (engine, publisher)
}

/// Builds a request whose declared totals match its lines exactly and
/// that is paid in full.
fn request_for(lines: Vec<PurchaseLine>) -> PurchaseRequest {
    let net: i64 = lines
        .iter()
        .map(|l| l.quantity * l.unit_price_cents - l.discount_cents)
        .sum();
    PurchaseRequest {
        cashier_id: "cashier-42".to_string(),
        customer: None,
        net_total_cents: net,
        total_cents: net,
        discount_cents: 0,
        received_cents: net,
        lines,
    }
}

fn line(product_id: &str, qty: i64) -> PurchaseLine {
    PurchaseLine {
        product_id: product_id.to_string(),
        quantity: qty,
        unit_price_cents: 500,
        discount_cents: 0,
    }
}

async fn stock_of(db: &Database, product_id: &str) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .stock_on_hand
}

// =============================================================================
// Property 1: success persists exactly N lines and exact decrements
// =============================================================================

#[tokio::test]
async fn committed_checkout_persists_lines_and_decrements_exactly() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let gauze = add_product(&db, "Gauze Roll", 30, 5).await;
    let (engine, _) = engine_with_probe(&db);

    let receipt = engine
        .checkout(request_for(vec![line(&amox, 3), line(&gauze, 7)]))
        .await
        .unwrap();

    let bills = db.bills();
    let header = bills.get_by_id(&receipt.bill_id).await.unwrap().unwrap();
    assert_eq!(header.cashier_id, "cashier-42");
    assert_eq!(header.net_total_cents, 5000);

    let items = bills.get_line_items(&receipt.bill_id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_id, amox);
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[1].product_id, gauze);
    assert_eq!(items[1].quantity, 7);

    assert_eq!(stock_of(&db, &amox).await, 47);
    assert_eq!(stock_of(&db, &gauze).await, 23);
}

// =============================================================================
// Property 2: any failure leaves zero durable side effects
// =============================================================================

#[tokio::test]
async fn unknown_product_aborts_everything() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let (engine, _) = engine_with_probe(&db);

    let err = engine
        .checkout(request_for(vec![line(&amox, 3), line("ghost", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, PurchaseError::ProductNotFound(_)));

    // First line's writes were discarded along with the rest
    assert_eq!(db.bills().count().await.unwrap(), 0);
    assert_eq!(stock_of(&db, &amox).await, 50);
}

#[tokio::test]
async fn invalid_line_aborts_everything() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let (engine, _) = engine_with_probe(&db);

    let mut request = request_for(vec![line(&amox, 3)]);
    request.lines[0].quantity = 0;

    let err = engine.checkout(request).await.unwrap_err();
    assert!(matches!(err, PurchaseError::InvalidLineData { line: 0, .. }));
    assert_eq!(db.bills().count().await.unwrap(), 0);
    assert_eq!(stock_of(&db, &amox).await, 50);
}

#[tokio::test]
async fn invalid_header_aborts_before_any_stock_mutation() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let (engine, _) = engine_with_probe(&db);

    let mut request = request_for(vec![line(&amox, 3)]);
    request.received_cents = -100;

    let err = engine.checkout(request).await.unwrap_err();
    assert!(matches!(err, PurchaseError::InvalidBillData(_)));
    assert_eq!(db.bills().count().await.unwrap(), 0);
    assert_eq!(stock_of(&db, &amox).await, 50);
}

#[tokio::test]
async fn insufficient_stock_on_late_line_rolls_back_earlier_lines() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let syringe = add_product(&db, "Syringe 5ml", 2, 1).await;
    let (engine, _) = engine_with_probe(&db);

    let err = engine
        .checkout(request_for(vec![line(&amox, 5), line(&syringe, 3)]))
        .await
        .unwrap_err();
    assert!(matches!(err, PurchaseError::InsufficientStock { .. }));

    assert_eq!(db.bills().count().await.unwrap(), 0);
    assert_eq!(stock_of(&db, &amox).await, 50);
    assert_eq!(stock_of(&db, &syringe).await, 2);
}

// =============================================================================
// Property 3: crossings fire only on the above→at-or-below transition
// =============================================================================

#[tokio::test]
async fn crossing_fires_once_then_stays_silent_below_threshold() {
    let db = in_memory_db().await;
    let product = add_product(&db, "Cetirizine 10mg", 10, 5).await;
    let (engine, _) = engine_with_probe(&db);

    // 10 → 4 crosses the threshold of 5
    let receipt = engine
        .checkout(request_for(vec![line(&product, 6)]))
        .await
        .unwrap();
    assert_eq!(receipt.crossings.len(), 1);
    assert_eq!(receipt.crossings[0].product_name, "Cetirizine 10mg");
    assert_eq!(receipt.crossings[0].stock_after, 4);
    assert_eq!(stock_of(&db, &product).await, 4);

    // 4 → 3 is already below: no new crossing
    let receipt = engine
        .checkout(request_for(vec![line(&product, 1)]))
        .await
        .unwrap();
    assert!(receipt.crossings.is_empty());
    assert_eq!(stock_of(&db, &product).await, 3);
}

#[tokio::test]
async fn crossing_reaches_subscribers_after_commit() {
    let db = in_memory_db().await;
    let product = add_product(&db, "Atorvastatin 250mg", 8, 5).await;
    let (engine, publisher) = engine_with_probe(&db);

    let mut rx = publisher.subscribe("Atorvastatin 250mg");

    engine
        .checkout(request_for(vec![line(&product, 4)]))
        .await
        .unwrap();

    let reminder = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("reminder not delivered in time")
        .unwrap();
    assert_eq!(reminder.product_name, "Atorvastatin 250mg");
}

#[tokio::test]
async fn multiple_products_can_cross_in_one_checkout() {
    let db = in_memory_db().await;
    let a = add_product(&db, "Losartan 250mg", 6, 5).await;
    let b = add_product(&db, "Enalapril 250mg", 7, 5).await;
    let (engine, _) = engine_with_probe(&db);

    let receipt = engine
        .checkout(request_for(vec![line(&a, 2), line(&b, 3)]))
        .await
        .unwrap();

    let names: Vec<_> = receipt
        .crossings
        .iter()
        .map(|c| c.product_name.as_str())
        .collect();
    assert_eq!(names, vec!["Losartan 250mg", "Enalapril 250mg"]);
}

// =============================================================================
// Property 4: remainder arithmetic holds on committed bills
// =============================================================================

#[tokio::test]
async fn remainder_equals_total_minus_received() {
    let db = in_memory_db().await;
    let product = add_product(&db, "Omeprazole 20mg", 40, 5).await;
    let (engine, _) = engine_with_probe(&db);

    // Underpaid: positive remainder outstanding
    let mut request = request_for(vec![line(&product, 4)]);
    request.received_cents = 1200; // total is 2000
    let receipt = engine.checkout(request).await.unwrap();

    let header = db.bills().get_by_id(&receipt.bill_id).await.unwrap().unwrap();
    assert_eq!(header.remainder_cents, header.total_cents - header.received_cents);
    assert_eq!(header.remainder_cents, 800);
}

#[tokio::test]
async fn clamp_policy_stores_zero_remainder_on_overpayment() {
    let db = in_memory_db().await;
    let product = add_product(&db, "Omeprazole 20mg", 40, 5).await;
    let publisher = Arc::new(BroadcastPublisher::new(16));
    let engine = PurchaseEngine::with_publisher(
        db.clone(),
        EngineConfig::default().remainder_policy(RemainderPolicy::ClampToZero),
        publisher,
    );

    let mut request = request_for(vec![line(&product, 2)]);
    request.received_cents = 1500; // total is 1000
    let receipt = engine.checkout(request).await.unwrap();

    let header = db.bills().get_by_id(&receipt.bill_id).await.unwrap().unwrap();
    assert_eq!(header.remainder_cents, 0);
}

// =============================================================================
// Property 5: concurrent last-unit purchases - exactly one wins
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_last_unit_yields_one_commit_one_insufficient() {
    let db = in_memory_db().await;
    let product = add_product(&db, "Insulin Glargine 100ml", 1, 0).await;
    let (engine, _) = engine_with_probe(&db);
    let engine = Arc::new(engine);

    let first = {
        let engine = engine.clone();
        let request = request_for(vec![line(&product, 1)]);
        tokio::spawn(async move { engine.checkout(request).await })
    };
    let second = {
        let engine = engine.clone();
        let request = request_for(vec![line(&product, 1)]);
        tokio::spawn(async move { engine.checkout(request).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];

    let committed = results.iter().filter(|r| r.is_ok()).count();
    let starved = results
        .iter()
        .filter(|r| matches!(r, Err(PurchaseError::InsufficientStock { .. })))
        .count();

    assert_eq!(committed, 1, "exactly one checkout must commit");
    assert_eq!(starved, 1, "the loser must see InsufficientStock");
    assert_eq!(stock_of(&db, &product).await, 0);
    assert_eq!(db.bills().count().await.unwrap(), 1);
}

// =============================================================================
// Property 6: retrying an aborted request reproduces the outcome
// =============================================================================

#[tokio::test]
async fn retry_of_aborted_request_is_deterministic() {
    let db = in_memory_db().await;
    let amox = add_product(&db, "Amoxicillin 500mg", 50, 10).await;
    let syringe = add_product(&db, "Syringe 5ml", 2, 1).await;
    let (engine, _) = engine_with_probe(&db);

    let request = request_for(vec![line(&amox, 5), line(&syringe, 3)]);

    for _ in 0..2 {
        let err = engine.checkout(request.clone()).await.unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientStock { .. }));
        assert_eq!(db.bills().count().await.unwrap(), 0);
        assert_eq!(stock_of(&db, &amox).await, 50);
        assert_eq!(stock_of(&db, &syringe).await, 2);
    }

    // The aborted attempts left no hidden state: a satisfiable request
    // still goes through untouched stock.
    let receipt = engine
        .checkout(request_for(vec![line(&syringe, 2)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&db, &syringe).await, 0);
    assert_eq!(
        db.bills()
            .count_line_items(&receipt.bill_id)
            .await
            .unwrap(),
        1
    );
}
