//! Repository implementations for data persistence.
//!
//! MongoDB-backed implementations of the application's repository ports.

mod customer_repository;
mod delivery_repository;
mod food_repository;
mod offer_repository;
mod order_repository;
mod vendor_repository;

pub use customer_repository::*;
pub use delivery_repository::*;
pub use food_repository::*;
pub use offer_repository::*;
pub use order_repository::*;
pub use vendor_repository::*;

use bson::{doc, Bson, Document};
use foodhub_application::Repositories;
use foodhub_common::pagination::{PaginatedResult, PaginationParams, SortParams};
use futures::TryStreamExt;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::database::Database;
use crate::Result;

/// Every repository backed by `db`
pub fn mongo_repositories(db: &Database) -> Repositories {
    Repositories {
        vendors: Arc::new(MongoVendorRepository::new(db.vendors())),
        foods: Arc::new(MongoFoodRepository::new(db.foods())),
        orders: Arc::new(MongoOrderRepository::new(db.orders())),
        offers: Arc::new(MongoOfferRepository::new(db.offers())),
        customers: Arc::new(MongoCustomerRepository::new(db.customers())),
        delivery: Arc::new(MongoDeliveryRepository::new(db.delivery_users())),
    }
}

/// Fetch one page of `filter` and count all matches.
///
/// `_id` is appended as a tie-breaker so pages are stable when the sort
/// field has duplicates.
pub(crate) async fn paginate<T>(
    collection: &Collection<T>,
    filter: Document,
    sort: &SortParams,
    page: PaginationParams,
) -> Result<PaginatedResult<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut order = Document::new();
    order.insert(sort.field.clone(), sort.direction.as_i32());
    if sort.field != "_id" {
        order.insert("_id", 1);
    }

    let find = async {
        collection
            .find(filter.clone())
            .sort(order)
            .skip(page.offset())
            .limit(i64::from(page.limit))
            .await?
            .try_collect::<Vec<T>>()
            .await
    };
    let count = async { collection.count_documents(filter.clone()).await };
    let (data, total) = tokio::try_join!(find, count)?;

    Ok(PaginatedResult::new(data, page, total))
}

/// Case-insensitive substring match on the literal `text`
pub(crate) fn contains_ci(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

pub(crate) fn bson_ids<I, T>(ids: I) -> Vec<Bson>
where
    I: IntoIterator<Item = T>,
    T: Into<Bson>,
{
    ids.into_iter().map(Into::into).collect()
}
