//! Food Service
//!
//! Vendors add foods singly or in bulk and browse their own menu.

use foodhub_common::{PaginatedResult, PaginationParams};
use foodhub_domain::{Food, FoodId, VendorId};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::found;
use crate::ports::{FoodRepositoryPort, VendorRepositoryPort};
use crate::{ApplicationError, ApplicationResult};

/// Data for one new food item
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub description: String,
    pub category: String,
    pub food_type: String,
    pub ready_time: u32,
    pub price: f64,
    pub images: Vec<String>,
}

/// Food service implementation
#[derive(Clone)]
pub struct FoodService {
    vendors: Arc<dyn VendorRepositoryPort>,
    foods: Arc<dyn FoodRepositoryPort>,
}

impl FoodService {
    pub fn new(vendors: Arc<dyn VendorRepositoryPort>, foods: Arc<dyn FoodRepositoryPort>) -> Self {
        Self { vendors, foods }
    }

    /// Create foods for a vendor and append their ids to the vendor's menu.
    ///
    /// The foods are inserted first, then referenced from the vendor with an
    /// idempotent append. If the append fails the inserted foods are deleted
    /// again so no orphans are left behind.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn add_foods(
        &self,
        vendor_id: VendorId,
        items: Vec<NewFood>,
    ) -> ApplicationResult<Vec<Food>> {
        if items.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "At least one food item is required".to_string(),
            ));
        }

        found(
            self.vendors.find_by_id(vendor_id).await?,
            "Vendor not found",
        )?;

        let foods: Vec<Food> = items
            .into_iter()
            .map(|item| Food {
                id: FoodId::new(),
                vendor_id,
                name: item.name,
                description: item.description,
                category: item.category,
                food_type: item.food_type,
                ready_time: item.ready_time,
                price: item.price,
                rating: 0.0,
                images: item.images,
            })
            .collect();
        let ids: Vec<FoodId> = foods.iter().map(|f| f.id).collect();

        self.foods.insert_many(&foods).await?;

        let appended = match self.vendors.append_foods(vendor_id, &ids).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(ApplicationError::NotFound("Vendor not found".to_string())),
            Err(e) => Err(e),
        };

        if let Err(e) = appended {
            warn!(vendor_id = %vendor_id, error = %e, "vendor update failed, removing inserted foods");
            if let Err(cleanup) = self.foods.delete_many(&ids).await {
                error!(
                    vendor_id = %vendor_id,
                    food_ids = ?ids,
                    error = %cleanup,
                    "failed to remove orphaned foods"
                );
            }
            return Err(e);
        }

        info!(vendor_id = %vendor_id, added = foods.len(), "foods added");
        Ok(foods)
    }

    #[instrument(skip(self))]
    pub async fn list_foods(
        &self,
        vendor_id: VendorId,
        text: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Food>> {
        let text = text.map(str::trim).filter(|s| !s.is_empty());
        self.foods.list_for_vendor(vendor_id, text, page).await
    }

    #[instrument(skip(self))]
    pub async fn get_food(&self, id: FoodId) -> ApplicationResult<Food> {
        found(self.foods.find_by_id(id).await?, "Food Not Found")
    }
}
