//! Delivery personnel repository implementation.

use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use foodhub_application::{ApplicationResult, DeliveryRepositoryPort};
use foodhub_domain::{Coordinates, DeliveryPerson, DeliveryPersonId, PersonProfilePatch};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::{debug, instrument};

use super::customer_repository::person_profile_set;
use crate::Error;

/// MongoDB implementation of the delivery port
#[derive(Clone)]
pub struct MongoDeliveryRepository {
    collection: Collection<DeliveryPerson>,
}

impl MongoDeliveryRepository {
    pub fn new(collection: Collection<DeliveryPerson>) -> Self {
        Self { collection }
    }

    async fn update<U>(&self, id: DeliveryPersonId, update: U) -> crate::Result<Option<DeliveryPerson>>
    where
        U: Into<mongodb::options::UpdateModifications>,
    {
        let person = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(person)
    }
}

fn availability_pipeline(coordinates: Option<Coordinates>) -> Vec<Document> {
    let mut set = doc! {
        "isAvailable": { "$not": ["$isAvailable"] },
        "updatedAt": DateTime::now(),
    };
    if let Some(c) = coordinates {
        set.insert("lat", c.lat);
        set.insert("lng", c.lng);
    }
    vec![doc! { "$set": set }]
}

#[async_trait]
impl DeliveryRepositoryPort for MongoDeliveryRepository {
    #[instrument(skip(self, person), fields(delivery_id = %person.id))]
    async fn insert(&self, person: &DeliveryPerson) -> ApplicationResult<()> {
        self.collection.insert_one(person).await.map_err(Error::from)?;
        debug!("Delivery user inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: DeliveryPersonId) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ApplicationResult<Vec<DeliveryPerson>> {
        let people = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(Error::from)?
            .try_collect()
            .await
            .map_err(Error::from)?;
        Ok(people)
    }

    #[instrument(skip(self, patch))]
    async fn update_profile(
        &self,
        id: DeliveryPersonId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self
            .update(id, doc! { "$set": person_profile_set(patch) })
            .await?)
    }

    #[instrument(skip(self))]
    async fn toggle_availability(
        &self,
        id: DeliveryPersonId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.update(id, availability_pipeline(coordinates)).await?)
    }

    #[instrument(skip(self))]
    async fn set_verified(
        &self,
        id: DeliveryPersonId,
        verified: bool,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        let update = doc! { "$set": { "verified": verified, "updatedAt": DateTime::now() } };
        Ok(self.update(id, update).await?)
    }
}
