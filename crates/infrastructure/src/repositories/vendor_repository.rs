//! Vendor repository implementation.
//!
//! Reference-list appends and the availability flip are single atomic
//! updates, so concurrent requests never lose each other's writes.

use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use foodhub_application::{ApplicationResult, VendorRepositoryPort};
use foodhub_common::pagination::{PaginatedResult, PaginationParams, SortParams};
use foodhub_domain::{Coordinates, FoodId, Vendor, VendorId, VendorProfilePatch};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::{debug, instrument};

use super::{bson_ids, contains_ci, paginate};
use crate::Error;

/// MongoDB implementation of the vendor port
#[derive(Clone)]
pub struct MongoVendorRepository {
    collection: Collection<Vendor>,
}

impl MongoVendorRepository {
    pub fn new(collection: Collection<Vendor>) -> Self {
        Self { collection }
    }

    async fn update(&self, id: VendorId, update: Document) -> crate::Result<Option<Vendor>> {
        let vendor = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(vendor)
    }
}

/// `$set` document for the provided profile fields
fn profile_set(patch: &VendorProfilePatch) -> Document {
    let mut set = doc! { "updatedAt": DateTime::now() };
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(address) = &patch.address {
        set.insert("address", address.as_str());
    }
    if let Some(phone) = &patch.phone {
        set.insert("phone", phone.as_str());
    }
    if let Some(food_type) = &patch.food_type {
        set.insert("foodType", food_type.clone());
    }
    set
}

/// Pipeline update flipping `serviceAvailable` in place
fn toggle_pipeline(coordinates: Option<Coordinates>) -> Vec<Document> {
    let mut set = doc! {
        "serviceAvailable": { "$not": ["$serviceAvailable"] },
        "updatedAt": DateTime::now(),
    };
    if let Some(c) = coordinates {
        set.insert("lat", c.lat);
        set.insert("lng", c.lng);
    }
    vec![doc! { "$set": set }]
}

#[async_trait]
impl VendorRepositoryPort for MongoVendorRepository {
    #[instrument(skip(self, vendor), fields(vendor_id = %vendor.id))]
    async fn insert(&self, vendor: &Vendor) -> ApplicationResult<()> {
        self.collection.insert_one(vendor).await.map_err(Error::from)?;
        debug!("Vendor inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: VendorId) -> ApplicationResult<Option<Vendor>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Vendor>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        name_filter: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Vendor>> {
        let filter = match name_filter {
            Some(name) => doc! { "name": contains_ci(name) },
            None => doc! {},
        };
        Ok(paginate(&self.collection, filter, &SortParams::default(), page).await?)
    }

    #[instrument(skip(self, patch))]
    async fn update_profile(
        &self,
        id: VendorId,
        patch: &VendorProfilePatch,
    ) -> ApplicationResult<Option<Vendor>> {
        Ok(self.update(id, doc! { "$set": profile_set(patch) }).await?)
    }

    #[instrument(skip(self, images), fields(count = images.len()))]
    async fn append_cover_images(
        &self,
        id: VendorId,
        images: &[String],
    ) -> ApplicationResult<Option<Vendor>> {
        let update = doc! {
            "$push": { "coverImages": { "$each": images.to_vec() } },
            "$set": { "updatedAt": DateTime::now() },
        };
        Ok(self.update(id, update).await?)
    }

    #[instrument(skip(self))]
    async fn toggle_service(
        &self,
        id: VendorId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<Vendor>> {
        let vendor = self
            .collection
            .find_one_and_update(doc! { "_id": id }, toggle_pipeline(coordinates))
            .return_document(ReturnDocument::After)
            .await
            .map_err(Error::from)?;
        Ok(vendor)
    }

    #[instrument(skip(self, foods), fields(count = foods.len()))]
    async fn append_foods(
        &self,
        id: VendorId,
        foods: &[FoodId],
    ) -> ApplicationResult<Option<Vendor>> {
        let update = doc! {
            "$addToSet": { "foods": { "$each": bson_ids(foods.iter().copied()) } },
            "$set": { "updatedAt": DateTime::now() },
        };
        Ok(self.update(id, update).await?)
    }

    #[instrument(skip(self))]
    async fn find_available(
        &self,
        pincode: &str,
        limit: Option<u32>,
    ) -> ApplicationResult<Vec<Vendor>> {
        let mut find = self
            .collection
            .find(doc! { "pincode": pincode, "serviceAvailable": true })
            .sort(doc! { "rating": -1, "_id": 1 });
        if let Some(limit) = limit {
            find = find.limit(i64::from(limit));
        }
        let vendors = find
            .await
            .map_err(Error::from)?
            .try_collect()
            .await
            .map_err(Error::from)?;
        Ok(vendors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_set_only_includes_provided_fields() {
        let set = profile_set(&VendorProfilePatch {
            phone: Some("123".to_string()),
            ..Default::default()
        });
        assert_eq!(set.get_str("phone").unwrap(), "123");
        assert!(!set.contains_key("name"));
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn test_toggle_moves_location_only_with_coordinates() {
        let without = toggle_pipeline(None);
        let set = without[0].get_document("$set").unwrap();
        assert!(!set.contains_key("lat"));

        let with = toggle_pipeline(Some(Coordinates { lat: 1.5, lng: 2.5 }));
        let set = with[0].get_document("$set").unwrap();
        assert_eq!(set.get_f64("lat").unwrap(), 1.5);
        assert_eq!(set.get_f64("lng").unwrap(), 2.5);
    }
}
