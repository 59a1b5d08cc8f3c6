//! Tests for food service
//!
//! Bulk creation, compensation when the vendor update fails, and menu browsing.

mod common;

use common::harness;
use foodhub_common::PaginationParams;
use foodhub_domain::{FoodId, VendorId};
use foodhub_testing::{fixtures::*, NewFoodBuilder};

#[tokio::test]
async fn test_bulk_add_grows_vendor_menu_by_n() {
    // Arrange
    let h = harness();
    let vendor = create_test_vendor();
    h.stores.vendors.seed(vendor.clone());
    let items = vec![
        NewFoodBuilder::new("Idli").build(),
        NewFoodBuilder::new("Vada").build(),
        NewFoodBuilder::new("Dosa").build(),
    ];

    // Act
    let created = h.foods.add_foods(vendor.id, items).await.unwrap();

    // Assert
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|f| f.vendor_id == vendor.id));
    let stored = h.stores.vendors.get(vendor.id).unwrap();
    let ids: Vec<FoodId> = created.iter().map(|f| f.id).collect();
    assert_eq!(stored.foods, ids);
    assert_eq!(h.stores.foods.count(), 3);
}

#[tokio::test]
async fn test_single_add_appends_to_existing_menu() {
    let h = harness();
    let mut vendor = create_test_vendor();
    let existing = FoodId::new();
    vendor.foods.push(existing);
    h.stores.vendors.seed(vendor.clone());

    let created = h
        .foods
        .add_foods(vendor.id, vec![NewFoodBuilder::new("Thali").build()])
        .await
        .unwrap();

    assert_eq!(
        h.stores.vendors.get(vendor.id).unwrap().foods,
        vec![existing, created[0].id]
    );
}

#[tokio::test]
async fn test_failed_vendor_update_removes_inserted_foods() {
    // Arrange
    let h = harness();
    let vendor = create_test_vendor();
    h.stores.vendors.seed(vendor.clone());
    h.stores.vendors.fail_next_append();

    // Act
    let err = h
        .foods
        .add_foods(
            vendor.id,
            vec![
                NewFoodBuilder::new("Idli").build(),
                NewFoodBuilder::new("Vada").build(),
            ],
        )
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.http_status(), 503);
    assert_eq!(h.stores.foods.count(), 0);
    assert!(h.stores.vendors.get(vendor.id).unwrap().foods.is_empty());
}

#[tokio::test]
async fn test_unknown_vendor_creates_nothing() {
    let h = harness();
    let err = h
        .foods
        .add_foods(VendorId::new(), vec![NewFoodBuilder::new("Idli").build()])
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(h.stores.foods.count(), 0);
}

#[tokio::test]
async fn test_empty_list_is_rejected() {
    let h = harness();
    let vendor = create_test_vendor();
    h.stores.vendors.seed(vendor.clone());

    let err = h.foods.add_foods(vendor.id, Vec::new()).await.unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn test_list_foods_matches_name_or_description() {
    // Arrange
    let h = harness();
    let vendor = create_test_vendor();
    h.stores.vendors.seed(vendor.clone());
    h.foods
        .add_foods(
            vendor.id,
            vec![
                NewFoodBuilder::new("Paneer Tikka").build(),
                NewFoodBuilder::new("Masala Dosa")
                    .with_description("Crisp crepe with paneer filling")
                    .build(),
                NewFoodBuilder::new("Filter Coffee").build(),
            ],
        )
        .await
        .unwrap();

    // Another vendor's paneer must not show up
    let other = create_test_vendor();
    let mut foreign = create_test_food(other.id);
    foreign.name = "Paneer Roll".to_string();
    h.stores.foods.seed(foreign);

    // Act
    let page = h
        .foods
        .list_foods(vendor.id, Some("PANEER"), PaginationParams::new(1, 10))
        .await
        .unwrap();

    // Assert
    let names: Vec<&str> = page.data.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Paneer Tikka", "Masala Dosa"]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_list_foods_page_count() {
    let h = harness();
    let vendor = create_test_vendor();
    h.stores.vendors.seed(vendor.clone());
    let items = (0..25)
        .map(|i| NewFoodBuilder::new(format!("Dish {i}")).build())
        .collect();
    h.foods.add_foods(vendor.id, items).await.unwrap();

    let page = h
        .foods
        .list_foods(vendor.id, None, PaginationParams::new(3, 10))
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.data[0].name, "Dish 20");
}

#[tokio::test]
async fn test_get_food() {
    let h = harness();
    let food = create_test_food(VendorId::new());
    h.stores.foods.seed(food.clone());

    assert_eq!(h.foods.get_food(food.id).await.unwrap(), food);
    let err = h.foods.get_food(FoodId::new()).await.unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(err.message(), "Food Not Found");
}
