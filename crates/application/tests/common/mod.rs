//! Services wired to in-memory stores

#![allow(dead_code)]

use foodhub_application::services::{Authenticator, UploadPolicy};
use foodhub_application::{
    CustomerService, DeliveryService, FoodService, ImageService, OfferService, OrderService,
    ShoppingService, VendorService,
};
use foodhub_common::TokenService;
use foodhub_testing::{MockImageStore, MockStores, PlainPasswordHasher};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-characters";

pub struct Harness {
    pub stores: MockStores,
    pub images: MockImageStore,
    pub tokens: TokenService,
    pub vendors: VendorService,
    pub foods: FoodService,
    pub orders: OrderService,
    pub offers: OfferService,
    pub customers: CustomerService,
    pub delivery: DeliveryService,
    pub shopping: ShoppingService,
}

pub fn harness() -> Harness {
    let stores = MockStores::new();
    let repos = stores.repositories();
    let images = MockImageStore::new();
    let tokens = TokenService::new(TEST_SECRET, Duration::from_secs(3600));
    let auth = Authenticator::new(Arc::new(PlainPasswordHasher), tokens.clone());
    let image_service = ImageService::new(
        Arc::new(images.clone()),
        UploadPolicy::new(
            vec!["jpg".into(), "jpeg".into(), "png".into(), "gif".into()],
            1024,
        ),
    );

    Harness {
        vendors: VendorService::new(repos.vendors.clone(), auth.clone(), image_service),
        foods: FoodService::new(repos.vendors.clone(), repos.foods.clone()),
        orders: OrderService::new(repos.orders.clone(), repos.foods.clone()),
        offers: OfferService::new(repos.offers.clone(), repos.vendors.clone()),
        customers: CustomerService::new(repos.customers.clone(), auth.clone()),
        delivery: DeliveryService::new(repos.delivery.clone(), auth),
        shopping: ShoppingService::new(repos.vendors, repos.foods, repos.offers),
        stores,
        images,
        tokens,
    }
}
