#![cfg(feature = "sqlite")]

mod common;

use rust_decimal_macros::dec;
use sea_orm::ConnectionTrait;

use common::day;
use common::request;
use common::TestDb;
use warehouse_fulfillment::FulfillmentError;

fn assert_validation(result: Result<impl std::fmt::Debug, FulfillmentError>, expected: &str) {
    match result {
        Err(FulfillmentError::Validation(msg)) => assert_eq!(msg, expected),
        other => panic!("Expected validation error '{expected}', got {other:?}"),
    }
}

#[tokio::test]
async fn fulfills_eligible_order() {
    let tdb = TestDb::new().await.with_example_data().await;

    let receipt = tdb
        .workflow()
        .fulfill(&request(1, 2, 50, day(2)))
        .await
        .expect("Fulfillment failed");

    let order = tdb.order(5).await;
    assert!(!order.is_pending(), "Order must be fulfilled");

    let movements = tdb.movements().await;
    assert_eq!(movements.len(), 1);
    let movement = &movements[0];
    assert_eq!(movement.id, receipt.id_product_warehouse);
    assert_eq!(movement.warehouse_id, 2);
    assert_eq!(movement.product_id, 1);
    assert_eq!(movement.order_id, 5);
    assert_eq!(movement.amount, 50);
    assert_eq!(movement.price.to_decimal(), dec!(500.00));
    assert_eq!(Some(movement.created_at), order.fulfilled_at);
}

#[tokio::test]
async fn unknown_product_or_warehouse() {
    let tdb = TestDb::new().await.with_example_data().await;
    let workflow = tdb.workflow();

    assert_validation(
        workflow.fulfill(&request(42, 2, 50, day(2))).await,
        "invalid product or warehouse",
    );
    assert_validation(
        workflow.fulfill(&request(1, 42, 50, day(2))).await,
        "invalid product or warehouse",
    );
    assert_validation(
        workflow.fulfill(&request(42, 42, 50, day(2))).await,
        "invalid product or warehouse",
    );

    assert!(tdb.order(5).await.is_pending());
    assert!(tdb.movements().await.is_empty());
}

#[tokio::test]
async fn no_eligible_order() {
    let tdb = TestDb::new().await.with_example_data().await;
    tdb.add_product(3, dec!(1.50)).await;
    let workflow = tdb.workflow();

    // Amount not covered by the order.
    assert_validation(workflow.fulfill(&request(1, 2, 101, day(2))).await, "no valid order");
    // The order was created after the request.
    tdb.add_order(6, 3, 10, day(10)).await;
    assert_validation(workflow.fulfill(&request(3, 2, 5, day(9))).await, "no valid order");
    // No orders at all for the product.
    tdb.add_product(4, dec!(2.00)).await;
    assert_validation(workflow.fulfill(&request(4, 2, 1, day(2))).await, "no valid order");

    assert!(tdb.order(5).await.is_pending());
    assert!(tdb.order(6).await.is_pending());
    assert!(tdb.movements().await.is_empty());
}

#[tokio::test]
async fn order_created_at_request_time_is_eligible() {
    let tdb = TestDb::new().await.with_example_data().await;

    tdb.workflow()
        .fulfill(&request(1, 2, 100, day(1)))
        .await
        .expect("Order created at the request moment must be eligible");

    assert!(!tdb.order(5).await.is_pending());
}

#[tokio::test]
async fn repeated_request_fails() {
    let tdb = TestDb::new().await.with_example_data().await;
    let workflow = tdb.workflow();

    workflow
        .fulfill(&request(1, 2, 50, day(2)))
        .await
        .expect("First fulfillment failed");
    assert_validation(workflow.fulfill(&request(1, 2, 50, day(2))).await, "no valid order");

    assert_eq!(tdb.movements().await.len(), 1);
}

#[tokio::test]
async fn smallest_order_id_wins() {
    let tdb = TestDb::new().await.with_example_data().await;
    tdb.add_order(3, 1, 80, day(1)).await;
    tdb.add_order(9, 1, 80, day(1)).await;
    let workflow = tdb.workflow();

    workflow
        .fulfill(&request(1, 2, 60, day(2)))
        .await
        .expect("Fulfillment failed");
    assert!(!tdb.order(3).await.is_pending());
    assert!(tdb.order(5).await.is_pending());
    assert!(tdb.order(9).await.is_pending());

    // Order 3 is gone, order 5 is next in line.
    workflow
        .fulfill(&request(1, 2, 60, day(2)))
        .await
        .expect("Fulfillment failed");
    assert!(!tdb.order(5).await.is_pending());
    assert!(tdb.order(9).await.is_pending());

    let order_ids: Vec<i32> = tdb.movements().await.iter().map(|m| m.order_id).collect();
    assert_eq!(order_ids, vec![3, 5]);
}

#[tokio::test]
async fn failed_insert_rolls_back_order_update() {
    let tdb = TestDb::new().await.with_example_data().await;

    // Make the last step fail after the order has been updated.
    tdb.conn()
        .execute_unprepared(r#"DROP TABLE "Product_Warehouse""#)
        .await
        .expect("Failed to drop the stock movement table");

    let err = tdb
        .workflow()
        .fulfill(&request(1, 2, 50, day(2)))
        .await
        .expect_err("Fulfillment must fail without the stock movement table");
    assert!(matches!(err, FulfillmentError::Db(_)), "unexpected error: {err:?}");
    assert!(err.to_string().starts_with("an error occurred:"));

    let order = tdb.order(5).await;
    assert!(order.is_pending(), "Order update must be rolled back: {order:?}");
}

#[tokio::test]
async fn non_positive_amount() {
    let tdb = TestDb::new().await.with_example_data().await;
    let workflow = tdb.workflow();

    for amount in [0, -5] {
        let err = workflow
            .fulfill(&request(1, 2, amount, day(2)))
            .await
            .expect_err("Non-positive amount must be rejected");
        assert!(err.is_validation(), "unexpected error: {err:?}");
        assert!(err.to_string().contains("amount"), "unexpected message: {err}");
    }

    assert!(tdb.order(5).await.is_pending());
}

#[tokio::test]
async fn price_follows_current_product_price() {
    let tdb = TestDb::new().await;
    tdb.add_product(7, dec!(2.25)).await;
    tdb.add_warehouse(1).await;
    tdb.add_order(1, 7, 4, day(1)).await;

    tdb.workflow()
        .fulfill(&request(7, 1, 4, day(3)))
        .await
        .expect("Fulfillment failed");

    let movements = tdb.movements().await;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].price.to_decimal(), dec!(9.00));
}

#[tokio::test]
async fn large_price_is_exact() {
    let tdb = TestDb::new().await;
    tdb.add_product(1, dec!(123456789012.37)).await;
    tdb.add_warehouse(1).await;
    tdb.add_order(1, 1, 999, day(1)).await;

    tdb.workflow()
        .fulfill(&request(1, 1, 999, day(2)))
        .await
        .expect("Fulfillment failed");

    let movements = tdb.movements().await;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].price.to_decimal(), dec!(123333332223357.63));
    assert_eq!(movements[0].price.to_string(), "123333332223357.63");
}

#[tokio::test]
async fn price_overflow_is_rejected() {
    let tdb = TestDb::new().await;
    tdb.add_product(1, dec!(1000000000000000.00)).await;
    tdb.add_warehouse(1).await;
    tdb.add_order(1, 1, 1000, day(1)).await;

    assert_validation(tdb.workflow().fulfill(&request(1, 1, 1000, day(2))).await, "price overflow");

    assert!(tdb.order(1).await.is_pending());
    assert!(tdb.movements().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_fulfill_order_once() {
    let tdb = TestDb::new().await.with_example_data().await;
    let workflow = tdb.workflow();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.fulfill(&request(1, 2, 50, day(2))).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.expect("Fulfillment task panicked") {
            Ok(_) => succeeded += 1,
            Err(FulfillmentError::Validation(msg)) => assert_eq!(msg, "no valid order"),
            Err(FulfillmentError::Conflict(id)) => assert_eq!(id, 5),
            Err(err) => panic!("Unexpected error: {err:?}"),
        }
    }

    assert_eq!(succeeded, 1, "Exactly one request must win the order");
    assert!(!tdb.order(5).await.is_pending());
    let movements = tdb.movements().await;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].order_id, 5);
}
