//! Shopping Service
//!
//! Public browsing by pincode. Empty results are reported as not found.

use foodhub_domain::{Food, Offer, Vendor, VendorId};
use std::sync::Arc;
use tracing::instrument;

use super::found;
use crate::ports::{FoodRepositoryPort, OfferRepositoryPort, VendorRepositoryPort};
use crate::{ApplicationError, ApplicationResult};

/// How many vendors the top restaurants listing returns
pub const TOP_RESTAURANTS: u32 = 10;

/// Ready-time threshold in minutes for the quick foods listing
pub const QUICK_READY_MINUTES: u32 = 30;

const DATA_NOT_FOUND: &str = "Data not found";

/// A vendor with its menu
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub vendor: Vendor,
    pub foods: Vec<Food>,
}

fn non_empty<T>(items: Vec<T>) -> ApplicationResult<Vec<T>> {
    if items.is_empty() {
        Err(ApplicationError::NotFound(DATA_NOT_FOUND.to_string()))
    } else {
        Ok(items)
    }
}

/// Shopping service implementation
#[derive(Clone)]
pub struct ShoppingService {
    vendors: Arc<dyn VendorRepositoryPort>,
    foods: Arc<dyn FoodRepositoryPort>,
    offers: Arc<dyn OfferRepositoryPort>,
}

impl ShoppingService {
    pub fn new(
        vendors: Arc<dyn VendorRepositoryPort>,
        foods: Arc<dyn FoodRepositoryPort>,
        offers: Arc<dyn OfferRepositoryPort>,
    ) -> Self {
        Self {
            vendors,
            foods,
            offers,
        }
    }

    async fn available_vendor_ids(&self, pincode: &str) -> ApplicationResult<Vec<VendorId>> {
        Ok(self
            .vendors
            .find_available(pincode, None)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect())
    }

    /// Vendors currently serving the pincode, best rated first
    #[instrument(skip(self))]
    pub async fn availability(&self, pincode: &str) -> ApplicationResult<Vec<Vendor>> {
        non_empty(self.vendors.find_available(pincode, None).await?)
    }

    #[instrument(skip(self))]
    pub async fn top_restaurants(&self, pincode: &str) -> ApplicationResult<Vec<Vendor>> {
        non_empty(
            self.vendors
                .find_available(pincode, Some(TOP_RESTAURANTS))
                .await?,
        )
    }

    #[instrument(skip(self))]
    pub async fn foods_in_30_min(&self, pincode: &str) -> ApplicationResult<Vec<Food>> {
        let vendors = self.available_vendor_ids(pincode).await?;
        if vendors.is_empty() {
            return non_empty(Vec::new());
        }
        non_empty(
            self.foods
                .find_by_vendors(&vendors, Some(QUICK_READY_MINUTES))
                .await?,
        )
    }

    #[instrument(skip(self))]
    pub async fn search_foods(&self, pincode: &str) -> ApplicationResult<Vec<Food>> {
        let vendors = self.available_vendor_ids(pincode).await?;
        if vendors.is_empty() {
            return non_empty(Vec::new());
        }
        non_empty(self.foods.find_by_vendors(&vendors, None).await?)
    }

    #[instrument(skip(self))]
    pub async fn offers(&self, pincode: &str) -> ApplicationResult<Vec<Offer>> {
        non_empty(self.offers.find_active_by_pincode(pincode).await?)
    }

    #[instrument(skip(self))]
    pub async fn restaurant(&self, id: VendorId) -> ApplicationResult<Restaurant> {
        let vendor = found(self.vendors.find_by_id(id).await?, DATA_NOT_FOUND)?;
        let foods = self.foods.find_by_vendors(&[id], None).await?;
        Ok(Restaurant { vendor, foods })
    }
}
