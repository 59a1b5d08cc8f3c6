//! Order repository implementation.

use async_trait::async_trait;
use bson::{doc, Document};
use foodhub_application::{ApplicationResult, OrderRepositoryPort};
use foodhub_domain::{CustomerId, Order, OrderId, OrderStatus, VendorId};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::instrument;

use crate::Error;

/// MongoDB implementation of the order port
#[derive(Clone)]
pub struct MongoOrderRepository {
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(collection: Collection<Order>) -> Self {
        Self { collection }
    }

    async fn find_many(&self, filter: Document) -> crate::Result<Vec<Order>> {
        let orders = self
            .collection
            .find(filter)
            .sort(doc! { "orderDate": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }
}

fn processing_set(status: &OrderStatus, remarks: &str, ready_time: Option<u32>) -> Document {
    let mut set = doc! {
        "orderStatus": status.as_str(),
        "remarks": remarks,
    };
    if let Some(minutes) = ready_time {
        set.insert("readyTime", i64::from(minutes));
    }
    set
}

#[async_trait]
impl OrderRepositoryPort for MongoOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: OrderId) -> ApplicationResult<Option<Order>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_by_vendor(&self, vendor: VendorId) -> ApplicationResult<Vec<Order>> {
        Ok(self.find_many(doc! { "vendorId": vendor }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_customer(&self, customer: CustomerId) -> ApplicationResult<Vec<Order>> {
        Ok(self.find_many(doc! { "customerId": customer }).await?)
    }

    #[instrument(skip(self, remarks))]
    async fn update_processing(
        &self,
        id: OrderId,
        status: &OrderStatus,
        remarks: &str,
        ready_time: Option<u32>,
    ) -> ApplicationResult<Option<Order>> {
        let order = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": processing_set(status, remarks, ready_time) },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(Error::from)?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_time_is_only_set_when_given() {
        let status = OrderStatus::new("Accept").unwrap();
        let set = processing_set(&status, "", None);
        assert_eq!(set.get_str("orderStatus").unwrap(), "Accept");
        assert_eq!(set.get_str("remarks").unwrap(), "");
        assert!(!set.contains_key("readyTime"));

        let set = processing_set(&status, "soon", Some(25));
        assert_eq!(set.get_i64("readyTime").unwrap(), 25);
    }
}
