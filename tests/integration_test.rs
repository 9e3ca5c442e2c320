//! Integration tests for storefront-kit
//!
//! These tests verify end-to-end order placement behavior, including the
//! concurrency properties of stock reservation.

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_kit::catalog::{CatalogStore, InMemoryCatalog};
use storefront_kit::ledger::{InMemoryLedger, OrderLedger};
use storefront_kit::model::{
    CustomerInfo, NewProduct, OrderDraft, OrderItem, OrderStatus, Principal, Product, Role,
};
use storefront_kit::{Error, Storefront};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn storefront() -> Storefront<InMemoryCatalog, InMemoryLedger> {
    Storefront::new(InMemoryCatalog::new(), InMemoryLedger::new())
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
    }
}

async fn seed(
    store: &Storefront<InMemoryCatalog, InMemoryLedger>,
    name: &str,
    price: Decimal,
    stock: u32,
) -> Product {
    let admin = Principal::new("admin@example.com", Role::Admin);
    store
        .create_product(
            &admin,
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                price,
                stock,
                image_url: None,
            },
        )
        .await
        .expect("Failed to seed product")
}

fn draft_for(product: &Product, quantity: u32) -> OrderDraft {
    let unit_price = product.price;
    OrderDraft {
        customer: customer(),
        items: vec![OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price,
            quantity,
        }],
        total: unit_price * Decimal::from(quantity),
    }
}

/// Test 1: N concurrent buyers against stock K (K < N)
///
/// Exactly K placements succeed, the remaining N-K fail with a stock
/// shortfall (InsufficientStock, or ProductUnavailable once the last
/// unit is gone), and the final stock is exactly zero - never negative,
/// never double-sold.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_buyers_never_oversell() {
    init_logging();
    let store = storefront();
    let product = seed(&store, "Mug", dec!(29.99), 12).await;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            let product = product.clone();
            tokio::spawn(async move { store.place_order(draft_for(&product, 1)).await })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("Task failed"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let shortfalls = results
        .iter()
        .filter(|r| matches!(r, Err(Error::InsufficientStock { .. }) | Err(Error::ProductUnavailable(_))))
        .count();
    assert_eq!(successes, 12);
    assert_eq!(shortfalls, 8);

    let remaining = store
        .get_product(&product.id)
        .await
        .expect("Product not found");
    assert_eq!(remaining.stock, 0);
    assert!(!remaining.available, "Zero stock must clear availability");

    let admin = Principal::new("admin@example.com", Role::Admin);
    let orders = store.list_orders(&admin).await.expect("Failed to list");
    assert_eq!(orders.len(), 12);
}

/// Test 2: the two-buyers-for-the-last-units race
///
/// Stock 10, two concurrent orders of 6 each: exactly one wins, the
/// other gets InsufficientStock, and nothing is oversold.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_large_orders_race_for_stock() {
    init_logging();
    let store = storefront();
    let product = seed(&store, "Teapot", dec!(15.00), 10).await;

    let s1 = store.clone();
    let p1 = product.clone();
    let first = tokio::spawn(async move { s1.place_order(draft_for(&p1, 6)).await });
    let s2 = store.clone();
    let p2 = product.clone();
    let second = tokio::spawn(async move { s2.place_order(draft_for(&p2, 6)).await });

    let results = [
        first.await.expect("Task failed"),
        second.await.expect("Task failed"),
    ];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "Exactly one of the two orders must win");

    let loser = results
        .iter()
        .find(|r| r.is_err())
        .expect("One order must lose")
        .as_ref()
        .expect_err("Loser must be an error");
    match loser {
        Error::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(*requested, 6);
            // Depending on who read first, the loser observed the stock
            // before or after the winner's decrement - never oversold.
            assert!(*available == 10 || *available == 4);
        }
        other => panic!("Expected InsufficientStock, got {other}"),
    }

    let remaining = store
        .get_product(&product.id)
        .await
        .expect("Product not found");
    assert_eq!(remaining.stock, 4);
}

/// Test 3: randomized conservation stress
///
/// Many concurrent orders of random size; units sold plus units
/// remaining must equal the initial stock.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_randomized_stock_conservation() {
    use rand::Rng;

    init_logging();
    let store = storefront();
    let product = seed(&store, "Bowl", dec!(4.50), 100).await;

    let quantities: Vec<u32> = {
        let mut rng = rand::rng();
        (0..50).map(|_| rng.random_range(1..=5)).collect()
    };

    let tasks: Vec<_> = quantities
        .iter()
        .map(|&quantity| {
            let store = store.clone();
            let product = product.clone();
            tokio::spawn(async move { store.place_order(draft_for(&product, quantity)).await })
        })
        .collect();

    let mut sold = 0u32;
    for result in join_all(tasks).await {
        match result.expect("Task failed") {
            Ok(order) => sold += order.items[0].quantity,
            Err(Error::InsufficientStock { .. }) | Err(Error::ProductUnavailable(_)) => {}
            Err(other) => panic!("Unexpected error: {other}"),
        }
    }

    let remaining = store
        .get_product(&product.id)
        .await
        .expect("Product not found");
    assert_eq!(sold + remaining.stock, 100, "Stock must be conserved");
}

/// Test 4: multi-item all-or-nothing
///
/// An order of [A within stock, B exceeding stock] leaves A's stock
/// unchanged after the failure.
#[tokio::test]
async fn test_multi_item_all_or_nothing() {
    init_logging();
    let store = storefront();
    let a = seed(&store, "A", dec!(2.00), 10).await;
    let b = seed(&store, "B", dec!(3.00), 1).await;

    let result = store
        .place_order(OrderDraft {
            customer: customer(),
            items: vec![
                OrderItem {
                    product_id: a.id.clone(),
                    product_name: "A".to_string(),
                    unit_price: dec!(2.00),
                    quantity: 3,
                },
                OrderItem {
                    product_id: b.id.clone(),
                    product_name: "B".to_string(),
                    unit_price: dec!(3.00),
                    quantity: 2,
                },
            ],
            total: dec!(12.00),
        })
        .await;
    assert!(matches!(result, Err(Error::InsufficientStock { .. })));

    let product_a = store.get_product(&a.id).await.expect("Product not found");
    assert_eq!(product_a.stock, 10, "A must be untouched after rollback");
    let product_b = store.get_product(&b.id).await.expect("Product not found");
    assert_eq!(product_b.stock, 1);
}

/// Test 5: declared-total validation
///
/// 2 x 29.99 declared as 59.98 is accepted with total 59.98; the same
/// items declared as 50.00 are rejected with TotalMismatch.
#[tokio::test]
async fn test_declared_total_scenarios() {
    init_logging();
    let store = storefront();
    let product = seed(&store, "Mug", dec!(29.99), 10).await;

    let order = store
        .place_order(draft_for(&product, 2))
        .await
        .expect("Failed to place order");
    assert_eq!(order.total, dec!(59.98));

    let mut bad = draft_for(&product, 2);
    bad.total = dec!(50.00);
    let result = store.place_order(bad).await;
    assert!(matches!(
        result,
        Err(Error::TotalMismatch { declared, computed })
            if declared == dec!(50.00) && computed == dec!(59.98)
    ));
}

/// Test 6: order lifecycle through the state machine
#[tokio::test]
async fn test_order_lifecycle() {
    init_logging();
    let store = storefront();
    let merchant = Principal::new("merchant@example.com", Role::Merchant);
    let product = seed(&store, "Mug", dec!(9.99), 10).await;

    // Pending -> Completed directly is rejected
    let order = store
        .place_order(draft_for(&product, 1))
        .await
        .expect("Failed to place order");
    let result = store
        .update_order_status(&merchant, &order.id, OrderStatus::Completed)
        .await;
    assert!(matches!(
        result,
        Err(Error::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Completed,
        })
    ));

    // Pending -> Accepted -> Completed succeeds
    store
        .update_order_status(&merchant, &order.id, OrderStatus::Accepted)
        .await
        .expect("Failed to accept");
    let done = store
        .update_order_status(&merchant, &order.id, OrderStatus::Completed)
        .await
        .expect("Failed to complete");
    assert_eq!(done.status, OrderStatus::Completed);

    // Completed is terminal
    for target in [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Refused,
    ] {
        assert!(matches!(
            store.update_order_status(&merchant, &order.id, target).await,
            Err(Error::IllegalTransition { .. })
        ));
    }

    // Refused is terminal too
    let refused = store
        .place_order(draft_for(&product, 1))
        .await
        .expect("Failed to place order");
    store
        .update_order_status(&merchant, &refused.id, OrderStatus::Refused)
        .await
        .expect("Failed to refuse");
    assert!(matches!(
        store
            .update_order_status(&merchant, &refused.id, OrderStatus::Accepted)
            .await,
        Err(Error::IllegalTransition { .. })
    ));
}

/// Test 7: snapshot immutability against catalog edits
///
/// Changing a product's price and name after placement must not alter
/// the placed order.
#[tokio::test]
async fn test_snapshot_survives_catalog_edits() {
    init_logging();
    let store = storefront();
    let admin = Principal::new("admin@example.com", Role::Admin);
    let product = seed(&store, "Mug", dec!(29.99), 10).await;

    let order = store
        .place_order(draft_for(&product, 2))
        .await
        .expect("Failed to place order");

    store
        .update_product(
            &admin,
            &product.id,
            storefront_kit::model::ProductPatch {
                name: Some("Super Mug".to_string()),
                price: Some(dec!(99.99)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update product");

    let orders = store.list_orders(&admin).await.expect("Failed to list");
    assert_eq!(orders[0].id, order.id);
    assert_eq!(orders[0].items[0].product_name, "Mug");
    assert_eq!(orders[0].items[0].unit_price, dec!(29.99));
    assert_eq!(orders[0].total, dec!(59.98));
}

/// Test 8: newest-first order listing
#[tokio::test]
async fn test_orders_listed_newest_first() {
    init_logging();
    let store = storefront();
    let admin = Principal::new("admin@example.com", Role::Admin);
    let product = seed(&store, "Mug", dec!(9.99), 10).await;

    let mut ids = vec![];
    for _ in 0..3 {
        let order = store
            .place_order(draft_for(&product, 1))
            .await
            .expect("Failed to place order");
        ids.push(order.id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let orders = store.list_orders(&admin).await.expect("Failed to list");
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].id, ids[2]);
    assert_eq!(orders[2].id, ids[0]);
}

/// Test 9: availability invariant holds at every observation point
#[tokio::test]
async fn test_availability_invariant() {
    init_logging();
    let store = storefront();
    let product = seed(&store, "Mug", dec!(9.99), 2).await;

    store
        .place_order(draft_for(&product, 1))
        .await
        .expect("Failed to place order");
    let mid = store
        .get_product(&product.id)
        .await
        .expect("Product not found");
    assert!(mid.available && mid.stock == 1);

    store
        .place_order(draft_for(&product, 1))
        .await
        .expect("Failed to place order");
    let drained = store
        .get_product(&product.id)
        .await
        .expect("Product not found");
    assert!(drained.stock == 0 && !drained.available);

    // Further orders fail as unavailable, not as negative stock
    let result = store.place_order(draft_for(&product, 1)).await;
    assert!(matches!(result, Err(Error::ProductUnavailable(_))));
}

/// Test 10: order JSON wire shape
///
/// Status and role serialize as lowercase strings and the snapshot
/// fields are present, matching what an HTTP layer would emit.
#[tokio::test]
async fn test_order_wire_shape() {
    init_logging();
    let store = storefront();
    let product = seed(&store, "Mug", dec!(29.99), 5).await;

    let order = store
        .place_order(draft_for(&product, 2))
        .await
        .expect("Failed to place order");

    let json = serde_json::to_value(&order).expect("Failed to serialize");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["customer"]["email"], "alice@example.com");
    assert_eq!(json["items"][0]["product_name"], "Mug");
    assert_eq!(json["items"][0]["quantity"], 2);
    assert_eq!(json["total"], "59.98");
}

/// Test 11: direct ledger/catalog reuse across handles
///
/// The same stores can back several storefront clones (one per worker),
/// all observing a single consistent state.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_state_across_clones() {
    init_logging();
    let catalog = InMemoryCatalog::new();
    let ledger = InMemoryLedger::new();
    let store = Storefront::new(catalog.clone(), ledger.clone());
    let product = seed(&store, "Mug", dec!(9.99), 8).await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let product = product.clone();
            tokio::spawn(async move { store.place_order(draft_for(&product, 1)).await })
        })
        .collect();
    for result in join_all(tasks).await {
        result.expect("Task failed").expect("Failed to place order");
    }

    // Observed directly through the shared stores, not the facade
    let drained = catalog
        .get(&product.id)
        .await
        .expect("Failed to get")
        .expect("Product not found");
    assert_eq!(drained.stock, 0);
    assert_eq!(
        ledger
            .list_newest_first()
            .await
            .expect("Failed to list")
            .len(),
        8
    );
}
