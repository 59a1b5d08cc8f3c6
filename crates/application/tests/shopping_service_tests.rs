//! Tests for shopping service
//!
//! Public browsing by pincode.

mod common;

use common::harness;
use foodhub_application::services::TOP_RESTAURANTS;
use foodhub_domain::{OfferType, VendorId};
use foodhub_testing::fixtures::*;

const PIN: &str = "400001";

#[tokio::test]
async fn test_availability_is_sorted_by_rating() {
    // Arrange
    let h = harness();
    for rating in [3.5, 4.8, 4.1] {
        h.stores.vendors.seed(create_available_vendor(PIN, rating));
    }
    let mut closed = create_available_vendor(PIN, 5.0);
    closed.service_available = false;
    h.stores.vendors.seed(closed);
    h.stores.vendors.seed(create_available_vendor("999999", 5.0));

    // Act
    let vendors = h.shopping.availability(PIN).await.unwrap();

    // Assert
    let ratings: Vec<f64> = vendors.iter().map(|v| v.rating).collect();
    assert_eq!(ratings, vec![4.8, 4.1, 3.5]);
}

#[tokio::test]
async fn test_top_restaurants_are_capped() {
    let h = harness();
    for i in 0..15 {
        h.stores
            .vendors
            .seed(create_available_vendor(PIN, f64::from(i) / 10.0));
    }

    let top = h.shopping.top_restaurants(PIN).await.unwrap();
    assert_eq!(top.len(), TOP_RESTAURANTS as usize);
    assert_eq!(top[0].rating, 1.4);
}

#[tokio::test]
async fn test_empty_results_are_not_found() {
    let h = harness();

    for err in [
        h.shopping.availability(PIN).await.unwrap_err(),
        h.shopping.top_restaurants(PIN).await.unwrap_err(),
        h.shopping.foods_in_30_min(PIN).await.unwrap_err(),
        h.shopping.search_foods(PIN).await.unwrap_err(),
        h.shopping.offers(PIN).await.unwrap_err(),
    ] {
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.message(), "Data not found");
    }
}

#[tokio::test]
async fn test_quick_foods_come_from_available_vendors_only() {
    // Arrange
    let h = harness();
    let open = create_available_vendor(PIN, 4.0);
    let mut closed = create_available_vendor(PIN, 4.0);
    closed.service_available = false;
    h.stores.vendors.seed(open.clone());
    h.stores.vendors.seed(closed.clone());

    for (vendor, minutes) in [(open.id, 15), (open.id, 30), (open.id, 45), (closed.id, 10)] {
        let mut food = create_test_food(vendor);
        food.ready_time = minutes;
        h.stores.foods.seed(food);
    }

    // Act
    let quick = h.shopping.foods_in_30_min(PIN).await.unwrap();
    let all = h.shopping.search_foods(PIN).await.unwrap();

    // Assert
    let minutes: Vec<u32> = quick.iter().map(|f| f.ready_time).collect();
    assert_eq!(minutes, vec![15, 30]);
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|f| f.vendor_id == open.id));
}

#[tokio::test]
async fn test_offers_are_active_and_local() {
    let h = harness();
    let mut local = create_test_offer(OfferType::Generic, vec![]);
    local.pincode = PIN.to_string();
    let mut inactive = local.clone();
    inactive.id = foodhub_domain::OfferId::new();
    inactive.is_active = false;
    let elsewhere = create_test_offer(OfferType::Generic, vec![]);
    for offer in [&local, &inactive, &elsewhere] {
        h.stores.offers.seed(offer.clone());
    }

    let offers = h.shopping.offers(PIN).await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, local.id);
}

#[tokio::test]
async fn test_restaurant_includes_menu() {
    let h = harness();
    let vendor = create_available_vendor(PIN, 4.0);
    h.stores.vendors.seed(vendor.clone());
    h.stores.foods.seed(create_test_food(vendor.id));
    h.stores.foods.seed(create_test_food(VendorId::new()));

    let restaurant = h.shopping.restaurant(vendor.id).await.unwrap();
    assert_eq!(restaurant.vendor.id, vendor.id);
    assert_eq!(restaurant.foods.len(), 1);

    let err = h.shopping.restaurant(VendorId::new()).await.unwrap_err();
    assert_eq!(err.http_status(), 404);
}
