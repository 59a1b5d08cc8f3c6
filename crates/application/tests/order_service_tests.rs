//! Tests for order service
//!
//! Populated listings, ownership checks and free-form status processing.

mod common;

use common::harness;
use foodhub_application::services::ProcessOrder;
use foodhub_domain::{CustomerId, FoodId, OrderId};
use foodhub_testing::fixtures::*;

fn decision(status: &str, remarks: &str, ready_time: Option<u32>) -> ProcessOrder {
    ProcessOrder {
        status: status.to_string(),
        remarks: remarks.to_string(),
        ready_time,
    }
}

#[tokio::test]
async fn test_vendor_orders_are_populated_with_foods() {
    // Arrange
    let h = harness();
    let vendor = create_test_vendor();
    let food = create_test_food(vendor.id);
    h.stores.foods.seed(food.clone());
    let dangling = FoodId::new();
    let order = create_test_order(vendor.id, &[food.id, dangling]);
    h.stores.orders.seed(order.clone());
    h.stores
        .orders
        .seed(create_test_order(create_test_vendor().id, &[food.id]));

    // Act
    let orders = h.orders.list_for_vendor(vendor.id).await.unwrap();

    // Assert
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.id, order.id);
    assert_eq!(orders[0].lines[0].food.as_ref(), Some(&food));
    assert!(orders[0].lines[1].food.is_none());
    assert_eq!(orders[0].lines[1].food_id, dangling);
}

#[tokio::test]
async fn test_customer_orders_are_scoped_to_the_customer() {
    let h = harness();
    let customer = CustomerId::new();
    let mut mine = create_test_order(create_test_vendor().id, &[]);
    mine.customer_id = Some(customer);
    h.stores.orders.seed(mine.clone());
    h.stores
        .orders
        .seed(create_test_order(create_test_vendor().id, &[]));

    let orders = h.orders.list_for_customer(customer).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.id, mine.id);
}

#[tokio::test]
async fn test_get_order_of_another_vendor_is_not_found() {
    let h = harness();
    let owner = create_test_vendor();
    let order = create_test_order(owner.id, &[]);
    h.stores.orders.seed(order.clone());

    assert!(h.orders.get_for_vendor(owner.id, order.id).await.is_ok());
    let err = h
        .orders
        .get_for_vendor(create_test_vendor().id, order.id)
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn test_any_status_is_persisted_verbatim() {
    // Arrange
    let h = harness();
    let vendor = create_test_vendor();
    let order = create_test_order(vendor.id, &[]);
    h.stores.orders.seed(order.clone());

    // Act
    let processed = h
        .orders
        .process(vendor.id, order.id, decision("Ready", "packed", Some(15)))
        .await
        .unwrap();
    let reopened = h
        .orders
        .process(vendor.id, order.id, decision("Waiting-Again", "", None))
        .await
        .unwrap();

    // Assert
    assert_eq!(processed.order_status.as_str(), "Ready");
    assert_eq!(processed.ready_time, Some(15));
    assert_eq!(reopened.order_status.as_str(), "Waiting-Again");
    assert_eq!(reopened.remarks, "");
    assert_eq!(reopened.ready_time, Some(15));

    let stored = h.stores.orders.get(order.id).unwrap();
    assert_eq!(stored.order_status.as_str(), "Waiting-Again");
}

#[tokio::test]
async fn test_process_unknown_order_is_not_found() {
    let h = harness();
    let err = h
        .orders
        .process(create_test_vendor().id, OrderId::new(), decision("Accept", "", None))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(err.message(), "Order Not found");
}

#[tokio::test]
async fn test_blank_status_is_rejected() {
    let h = harness();
    let vendor = create_test_vendor();
    let order = create_test_order(vendor.id, &[]);
    h.stores.orders.seed(order.clone());

    let err = h
        .orders
        .process(vendor.id, order.id, decision(" ", "", None))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 400);
    assert_eq!(h.stores.orders.get(order.id).unwrap().order_status.as_str(), "Waiting");
}
