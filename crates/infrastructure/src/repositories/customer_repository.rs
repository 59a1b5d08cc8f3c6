//! Customer repository implementation.

use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use foodhub_application::{ApplicationResult, CustomerRepositoryPort};
use foodhub_domain::{Customer, CustomerId, PersonProfilePatch};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::{debug, instrument};

use crate::Error;

/// MongoDB implementation of the customer port
#[derive(Clone)]
pub struct MongoCustomerRepository {
    collection: Collection<Customer>,
}

impl MongoCustomerRepository {
    pub fn new(collection: Collection<Customer>) -> Self {
        Self { collection }
    }
}

/// `$set` document for the provided name and address fields.
///
/// Shared with the delivery repository; both store the same field names.
pub(crate) fn person_profile_set(patch: &PersonProfilePatch) -> Document {
    let mut set = doc! { "updatedAt": DateTime::now() };
    if let Some(v) = &patch.first_name {
        set.insert("firstName", v.as_str());
    }
    if let Some(v) = &patch.last_name {
        set.insert("lastName", v.as_str());
    }
    if let Some(v) = &patch.address {
        set.insert("address", v.as_str());
    }
    set
}

#[async_trait]
impl CustomerRepositoryPort for MongoCustomerRepository {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id))]
    async fn insert(&self, customer: &Customer) -> ApplicationResult<()> {
        self.collection
            .insert_one(customer)
            .await
            .map_err(Error::from)?;
        debug!("Customer inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CustomerId) -> ApplicationResult<Option<Customer>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Customer>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self, patch))]
    async fn update_profile(
        &self,
        id: CustomerId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<Customer>> {
        let customer = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": person_profile_set(patch) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(Error::from)?;
        Ok(customer)
    }
}
