//! Application state and dependency injection.
//!
//! Handlers receive one [`AppState`] holding the configuration and every
//! service, each wired to the backends passed in at startup.

use foodhub_application::services::{Authenticator, UploadPolicy};
use foodhub_application::{
    CustomerService, DeliveryService, FoodService, HealthProbe, ImageService, ImageStore,
    OfferService, OrderService, PasswordHasher, Repositories, ShoppingService, VendorService,
};
use foodhub_common::{AppConfig, TokenService};
use std::sync::Arc;

/// The outside world the services talk to
#[derive(Clone)]
pub struct Backends {
    /// Document stores
    pub repositories: Repositories,

    /// Where vendor cover images go (served under `/images`)
    pub cover_images: Arc<dyn ImageStore>,

    /// Where the generic upload endpoint stores files
    pub uploads: Arc<dyn ImageStore>,

    /// Password hashing scheme
    pub hasher: Arc<dyn PasswordHasher>,

    /// Database reachability check
    pub health: Arc<dyn HealthProbe>,
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Verifies bearer tokens
    pub tokens: TokenService,

    /// Vendor accounts
    pub vendors: VendorService,

    /// Vendor menus
    pub foods: FoodService,

    /// Order processing
    pub orders: OrderService,

    /// Vendor offers
    pub offers: OfferService,

    /// Customer accounts
    pub customers: CustomerService,

    /// Delivery personnel
    pub delivery: DeliveryService,

    /// Public browsing
    pub shopping: ShoppingService,

    /// Generic uploads
    pub uploads: ImageService,

    /// Readiness probe
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Wire every service to `backends`
    pub fn new(config: AppConfig, backends: Backends) -> Self {
        let tokens = TokenService::new(&config.auth.jwt_secret, config.token_expiry());
        let auth = Authenticator::new(backends.hasher, tokens.clone());
        let policy = UploadPolicy::from_config(&config.storage);
        let repos = backends.repositories;

        Self {
            vendors: VendorService::new(
                repos.vendors.clone(),
                auth.clone(),
                ImageService::new(backends.cover_images, policy.clone()),
            ),
            foods: FoodService::new(repos.vendors.clone(), repos.foods.clone()),
            orders: OrderService::new(repos.orders.clone(), repos.foods.clone()),
            offers: OfferService::new(repos.offers.clone(), repos.vendors.clone()),
            customers: CustomerService::new(repos.customers.clone(), auth.clone()),
            delivery: DeliveryService::new(repos.delivery.clone(), auth),
            shopping: ShoppingService::new(repos.vendors, repos.foods, repos.offers),
            uploads: ImageService::new(backends.uploads, policy),
            health: backends.health,
            config: Arc::new(config),
            tokens,
        }
    }

    /// Get the configured admin key, if any
    pub fn admin_api_key(&self) -> Option<&str> {
        self.config.auth.admin_api_key.as_deref()
    }
}
