use std::collections::HashMap;

use proptest::prelude::*;
use stockroom_core::control::{InventoryControlPlane, InventoryError};
use stockroom_store::models::{Item, LineItem};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn build_control_plane(db_name: &str) -> InventoryControlPlane<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("failed to create in-memory surrealdb instance");
    db.use_ns("stockroom")
        .use_db(db_name)
        .await
        .expect("failed to select surrealdb namespace/db");
    let control = InventoryControlPlane::new(db);
    control
        .initialize(true)
        .await
        .expect("schema and seed should apply");
    control
}

async fn quantities(control: &InventoryControlPlane<Db>) -> HashMap<i64, i64> {
    control
        .list_items()
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|item| (item.id, item.quantity))
        .collect()
}

async fn item(control: &InventoryControlPlane<Db>, id: i64) -> Item {
    control
        .store()
        .get_item(id)
        .await
        .expect("item lookup should succeed")
        .unwrap_or_else(|| panic!("item {id} should exist"))
}

#[tokio::test]
async fn seeded_items_are_listed_in_id_order() {
    let control = build_control_plane("list").await;
    let items = control.list_items().await.expect("listing should succeed");

    assert_eq!(items.len(), 8);
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    assert_eq!(items[6].name, "jamón");
    assert_eq!(items[0].quantity, 20);
    assert_eq!(items[0].max_stock, 100);
}

#[tokio::test]
async fn seeding_leaves_populated_store_untouched() {
    let control = build_control_plane("reseed").await;
    control
        .buy_items(vec![LineItem::new(2, 10)])
        .await
        .expect("buy should succeed");

    let seeded = control.initialize(true).await.expect("initialize should succeed");

    assert_eq!(seeded, 0);
    assert_eq!(item(&control, 2).await.quantity, 20);
}

#[tokio::test]
async fn buy_then_oversell_then_overfill() {
    let control = build_control_plane("walkthrough").await;

    control
        .buy_items(vec![LineItem::new(1, 5)])
        .await
        .expect("buy should succeed");
    assert_eq!(item(&control, 1).await.quantity, 15);

    let err = control
        .buy_items(vec![LineItem::new(1, 999)])
        .await
        .expect_err("oversell should fail");
    assert!(matches!(err, InventoryError::InsufficientStock { item_id: 1 }));
    assert_eq!(item(&control, 1).await.quantity, 15);

    let err = control
        .restock_items(vec![LineItem::new(1, 90)])
        .await
        .expect_err("overfill should fail");
    assert!(matches!(err, InventoryError::CapacityExceeded { item_id: 1 }));
    assert_eq!(
        err.to_string(),
        "Restock quantity exceeds maximum stock for item with id 1"
    );

    let items = control.list_items().await.expect("listing should succeed");
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].quantity, 15);
}

#[tokio::test]
async fn failing_buy_line_rolls_back_whole_batch() {
    let control = build_control_plane("buy-rollback").await;
    let before = quantities(&control).await;

    let err = control
        .buy_items(vec![
            LineItem::new(1, 3),
            LineItem::new(2, 4),
            LineItem::new(6, 11),
        ])
        .await
        .expect_err("third line exceeds stock");

    assert!(matches!(err, InventoryError::InsufficientStock { item_id: 6 }));
    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn buy_of_unknown_item_reports_insufficient_stock() {
    let control = build_control_plane("buy-unknown").await;
    let before = quantities(&control).await;

    let err = control
        .buy_items(vec![LineItem::new(1, 1), LineItem::new(42, 1)])
        .await
        .expect_err("unknown item should fail");

    assert!(matches!(err, InventoryError::InsufficientStock { item_id: 42 }));
    assert_eq!(
        err.to_string(),
        "Item not found or not enough stock for item with id 42"
    );
    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn non_positive_quantity_is_invalid_for_both_operations() {
    let control = build_control_plane("invalid").await;
    let before = quantities(&control).await;

    let err = control
        .buy_items(vec![LineItem::new(1, 2), LineItem::new(3, 0)])
        .await
        .expect_err("zero quantity should fail");
    assert!(matches!(err, InventoryError::InvalidRequest(_)));
    assert_eq!(err.to_string(), "Quantity must be positive for all items");

    let err = control
        .restock_items(vec![LineItem::new(3, -4)])
        .await
        .expect_err("negative quantity should fail");
    assert!(matches!(err, InventoryError::InvalidRequest(_)));

    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn restock_of_unknown_item_is_not_found_and_rolls_back() {
    let control = build_control_plane("restock-unknown").await;
    let before = quantities(&control).await;

    let err = control
        .restock_items(vec![LineItem::new(3, 5), LineItem::new(99, 1)])
        .await
        .expect_err("unknown item should fail");

    assert!(matches!(err, InventoryError::NotFound { item_id: 99 }));
    assert_eq!(err.to_string(), "Item not found with id 99");
    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn oversized_restock_is_capacity_exceeded() {
    let control = build_control_plane("restock-oversized").await;
    let before = quantities(&control).await;

    let err = control
        .restock_items(vec![LineItem::new(1, i64::MAX)])
        .await
        .expect_err("delta cannot fit under max_stock");

    assert!(matches!(err, InventoryError::CapacityExceeded { item_id: 1 }));
    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn unseeded_store_lists_nothing() {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("failed to create in-memory surrealdb instance");
    db.use_ns("stockroom")
        .use_db("unseeded")
        .await
        .expect("failed to select surrealdb namespace/db");
    let control = InventoryControlPlane::new(db);

    let seeded = control.initialize(false).await.expect("schema should apply");

    assert_eq!(seeded, 0);
    assert!(control.list_items().await.expect("listing should succeed").is_empty());
    let err = control
        .restock_items(vec![LineItem::new(1, 1)])
        .await
        .expect_err("empty store has no items");
    assert!(matches!(err, InventoryError::NotFound { item_id: 1 }));
}

#[tokio::test]
async fn restock_fills_exactly_to_capacity() {
    let control = build_control_plane("restock-full").await;

    control
        .restock_items(vec![LineItem::new(6, 30), LineItem::new(3, 1)])
        .await
        .expect("restock to capacity should succeed");

    let queso = item(&control, 6).await;
    assert_eq!(queso.quantity, queso.max_stock);
    assert_eq!(item(&control, 3).await.quantity, 16);
}

#[tokio::test]
async fn repeated_lines_accumulate_within_one_batch() {
    let control = build_control_plane("repeated").await;

    let err = control
        .buy_items(vec![LineItem::new(6, 6), LineItem::new(6, 6)])
        .await
        .expect_err("second line sees the first decrement");
    assert!(matches!(err, InventoryError::InsufficientStock { item_id: 6 }));
    assert_eq!(item(&control, 6).await.quantity, 10);

    control
        .buy_items(vec![LineItem::new(6, 4), LineItem::new(6, 6)])
        .await
        .expect("both lines fit");
    assert_eq!(item(&control, 6).await.quantity, 0);
}

#[tokio::test]
async fn empty_batches_commit_without_changes() {
    let control = build_control_plane("empty").await;
    let before = quantities(&control).await;

    control.buy_items(Vec::new()).await.expect("empty buy is a no-op");
    control
        .restock_items(Vec::new())
        .await
        .expect("empty restock is a no-op");

    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn dropped_batch_writes_nothing() {
    let control = build_control_plane("dropped").await;
    let before = quantities(&control).await;

    let mut batch = control.store().begin_buy();
    batch.stage(LineItem::new(1, 5));
    assert_eq!(batch.len(), 1);
    drop(batch);

    assert_eq!(quantities(&control).await, before);
}

#[tokio::test]
async fn concurrent_buys_never_oversell() {
    let control = build_control_plane("concurrent").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let control = control.clone();
        handles.push(tokio::spawn(async move {
            control.buy_items(vec![LineItem::new(6, 3)]).await
        }));
    }
    let mut committed = 0_i64;
    for handle in handles {
        if handle.await.expect("task should not panic").is_ok() {
            committed += 1;
        }
    }

    let queso = item(&control, 6).await;
    assert!(queso.quantity >= 0);
    assert_eq!(queso.quantity, 10 - committed * 3);
}

#[derive(Debug, Clone)]
enum Op {
    Buy(Vec<LineItem>),
    Restock(Vec<LineItem>),
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (1_i64..=9, -2_i64..=40).prop_map(|(id, quantity)| LineItem::new(id, quantity))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(line_strategy(), 1..4).prop_map(Op::Buy),
        prop::collection::vec(line_strategy(), 1..4).prop_map(Op::Restock),
    ]
}

fn apply_expected(before: &HashMap<i64, i64>, lines: &[LineItem], sign: i64) -> HashMap<i64, i64> {
    let mut after = before.clone();
    for line in lines {
        if let Some(quantity) = after.get_mut(&line.id) {
            *quantity += sign * line.quantity;
        }
    }
    after
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 24,
        ..ProptestConfig::default()
    })]

    /// Property: committed batches move stock by exactly their deltas, rejected
    /// batches move nothing, and stock stays within `0..=max_stock`.
    #[test]
    fn stock_stays_within_bounds(ops in prop::collection::vec(op_strategy(), 1..10)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");

        let violations = runtime.block_on(async move {
            let control = build_control_plane("property").await;
            let mut violations = Vec::new();
            for op in ops {
                let before = quantities(&control).await;
                let (result, expected) = match &op {
                    Op::Buy(lines) => (
                        control.buy_items(lines.clone()).await,
                        apply_expected(&before, lines, -1),
                    ),
                    Op::Restock(lines) => (
                        control.restock_items(lines.clone()).await,
                        apply_expected(&before, lines, 1),
                    ),
                };
                let after = quantities(&control).await;
                match result {
                    Ok(()) if after != expected => {
                        violations.push(format!("{op:?} committed {after:?}, expected {expected:?}"));
                    }
                    Err(InventoryError::Store(err)) => {
                        violations.push(format!("{op:?} hit store error: {err}"));
                    }
                    Err(_) if after != before => {
                        violations.push(format!("{op:?} was rejected but changed stock"));
                    }
                    _ => {}
                }
                for item in control.list_items().await.expect("listing should succeed") {
                    if item.quantity < 0 || item.quantity > item.max_stock {
                        violations.push(format!("{item:?} is out of bounds after {op:?}"));
                    }
                }
            }
            violations
        });

        prop_assert!(violations.is_empty(), "{violations:?}");
    }
}
