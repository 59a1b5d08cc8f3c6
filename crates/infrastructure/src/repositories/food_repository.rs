//! Food repository implementation.

use async_trait::async_trait;
use bson::{doc, Document};
use foodhub_application::{ApplicationResult, FoodRepositoryPort};
use foodhub_common::pagination::{PaginatedResult, PaginationParams, SortParams};
use foodhub_domain::{Food, FoodId, VendorId};
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::{debug, instrument};

use super::{bson_ids, contains_ci, paginate};
use crate::Error;

/// MongoDB implementation of the food port
#[derive(Clone)]
pub struct MongoFoodRepository {
    collection: Collection<Food>,
}

impl MongoFoodRepository {
    pub fn new(collection: Collection<Food>) -> Self {
        Self { collection }
    }

    async fn find_many(&self, filter: Document) -> crate::Result<Vec<Food>> {
        let foods = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(foods)
    }
}

/// Foods of one vendor, optionally matching `text` in name or description
fn vendor_menu_filter(vendor: VendorId, text: Option<&str>) -> Document {
    let mut filter = doc! { "vendorId": vendor };
    if let Some(text) = text {
        filter.insert(
            "$or",
            vec![
                doc! { "name": contains_ci(text) },
                doc! { "description": contains_ci(text) },
            ],
        );
    }
    filter
}

#[async_trait]
impl FoodRepositoryPort for MongoFoodRepository {
    #[instrument(skip(self, foods), fields(count = foods.len()))]
    async fn insert_many(&self, foods: &[Food]) -> ApplicationResult<()> {
        if foods.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(foods).await.map_err(Error::from)?;
        debug!("Foods inserted");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_many(&self, ids: &[FoodId]) -> ApplicationResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": bson_ids(ids.iter().copied()) } })
            .await
            .map_err(Error::from)?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: FoodId) -> ApplicationResult<Option<Food>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[FoodId]) -> ApplicationResult<Vec<Food>> {
        Ok(self
            .find_many(doc! { "_id": { "$in": bson_ids(ids.iter().copied()) } })
            .await?)
    }

    #[instrument(skip(self))]
    async fn list_for_vendor(
        &self,
        vendor: VendorId,
        text: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Food>> {
        let filter = vendor_menu_filter(vendor, text);
        Ok(paginate(&self.collection, filter, &SortParams::default(), page).await?)
    }

    #[instrument(skip(self, vendors), fields(vendors = vendors.len()))]
    async fn find_by_vendors(
        &self,
        vendors: &[VendorId],
        max_ready_time: Option<u32>,
    ) -> ApplicationResult<Vec<Food>> {
        let mut filter = doc! { "vendorId": { "$in": bson_ids(vendors.iter().copied()) } };
        if let Some(max) = max_ready_time {
            filter.insert("readyTime", doc! { "$lte": i64::from(max) });
        }
        Ok(self.find_many(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_filter_without_text_is_vendor_only() {
        let vendor = VendorId::new();
        let filter = vendor_menu_filter(vendor, None);
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get_object_id("vendorId").unwrap(), *vendor.as_object_id());
    }

    #[test]
    fn test_menu_filter_matches_name_or_description() {
        let filter = vendor_menu_filter(VendorId::new(), Some("dal"));
        let or = filter.get_array("$or").unwrap();
        assert_eq!(or.len(), 2);
    }
}
