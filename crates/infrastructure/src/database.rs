//! Database module - MongoDB client, collections and indexes

use async_trait::async_trait;
use bson::{doc, Document};
use foodhub_application::{ApplicationResult, HealthProbe};
use foodhub_common::config::DatabaseConfig;
use foodhub_domain::{Customer, DeliveryPerson, Food, Offer, Order, Vendor};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{Error, Result};

pub const VENDORS: &str = "vendors";
pub const FOODS: &str = "foods";
pub const ORDERS: &str = "orders";
pub const OFFERS: &str = "offers";
pub const CUSTOMERS: &str = "customers";
pub const DELIVERY_USERS: &str = "deliveryusers";

/// Handle to the application database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
}

impl Database {
    /// Connect using the configured pool sizes and timeouts.
    ///
    /// The driver connects lazily; a bad URL fails here, an unreachable
    /// server fails on first use.
    #[instrument(skip(config), fields(db = %config.name, max_pool = config.max_pool_size))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Initializing MongoDB client");

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some("foodhub".to_string());
        options.min_pool_size = Some(config.min_pool_size);
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let db = client.database(&config.name);
        Ok(Self { client, db })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn vendors(&self) -> Collection<Vendor> {
        self.db.collection(VENDORS)
    }

    pub fn foods(&self) -> Collection<Food> {
        self.db.collection(FOODS)
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection(ORDERS)
    }

    pub fn offers(&self) -> Collection<Offer> {
        self.db.collection(OFFERS)
    }

    pub fn customers(&self) -> Collection<Customer> {
        self.db.collection(CUSTOMERS)
    }

    pub fn delivery_users(&self) -> Collection<DeliveryPerson> {
        self.db.collection(DELIVERY_USERS)
    }

    /// Create the unique email indexes and the lookup indexes the queries rely on
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique_email = || {
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        let plain = |keys: Document| IndexModel::builder().keys(keys).build();

        self.vendors()
            .create_indexes(vec![
                unique_email(),
                plain(doc! { "pincode": 1, "serviceAvailable": 1, "rating": -1 }),
            ])
            .await?;
        self.customers().create_index(unique_email()).await?;
        self.delivery_users().create_index(unique_email()).await?;
        self.foods()
            .create_index(plain(doc! { "vendorId": 1, "readyTime": 1 }))
            .await?;
        self.orders()
            .create_indexes(vec![
                plain(doc! { "vendorId": 1 }),
                plain(doc! { "customerId": 1 }),
            ])
            .await?;
        self.offers()
            .create_index(plain(doc! { "pincode": 1, "isActive": 1 }))
            .await?;

        info!("Database indexes ensured");
        Ok(())
    }

    /// Round trip to the server
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Duration> {
        let start = std::time::Instant::now();
        match self.db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                let latency = start.elapsed();
                debug!(latency_ms = latency.as_millis(), "Database ping succeeded");
                Ok(latency)
            }
            Err(e) => {
                warn!(error = %e, "Database ping failed");
                Err(Error::Database(e))
            }
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.db.name())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> ApplicationResult<()> {
        Database::ping(self).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let config = DatabaseConfig {
            url: "postgres://localhost".to_string(),
            name: "foodhub_test".to_string(),
            min_pool_size: 0,
            max_pool_size: 2,
            connect_timeout_seconds: 1,
        };
        assert!(Database::connect(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        let config = DatabaseConfig {
            url: "mongodb://127.0.0.1:1".to_string(),
            name: "foodhub_test".to_string(),
            min_pool_size: 0,
            max_pool_size: 2,
            connect_timeout_seconds: 1,
        };
        let db = Database::connect(&config).await.unwrap();
        assert_eq!(db.foods().name(), FOODS);
    }
}
