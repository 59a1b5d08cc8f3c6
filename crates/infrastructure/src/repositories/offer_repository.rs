//! Offer repository implementation.

use async_trait::async_trait;
use bson::{doc, to_bson, Bson, Document};
use foodhub_application::{services::OfferFields, ApplicationResult, OfferRepositoryPort};
use foodhub_domain::{Offer, OfferId};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use tracing::{debug, instrument};

use crate::Error;

/// MongoDB implementation of the offer port
#[derive(Clone)]
pub struct MongoOfferRepository {
    collection: Collection<Offer>,
}

impl MongoOfferRepository {
    pub fn new(collection: Collection<Offer>) -> Self {
        Self { collection }
    }

    async fn find_many(&self, filter: Document) -> crate::Result<Vec<Offer>> {
        let offers = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(offers)
    }
}

/// `$set` document for the editable offer fields. `vendors` is never touched.
fn fields_set(fields: &OfferFields) -> crate::Result<Document> {
    let optional = |v: Option<bson::DateTime>| v.map_or(Bson::Null, Bson::DateTime);
    Ok(doc! {
        "title": fields.title.as_str(),
        "description": fields.description.as_str(),
        "offerType": to_bson(&fields.offer_type)?,
        "offerAmount": fields.offer_amount,
        "pincode": fields.pincode.as_str(),
        "promocode": fields.promocode.clone().map_or(Bson::Null, Bson::String),
        "promoType": to_bson(&fields.promo_type)?,
        "startValidity": optional(fields.start_bson()),
        "endValidity": optional(fields.end_bson()),
        "bank": fields.bank.clone(),
        "bins": to_bson(&fields.bins)?,
        "minValue": fields.min_value,
        "isActive": fields.is_active,
    })
}

#[async_trait]
impl OfferRepositoryPort for MongoOfferRepository {
    #[instrument(skip(self, offer), fields(offer_id = %offer.id))]
    async fn insert(&self, offer: &Offer) -> ApplicationResult<()> {
        self.collection.insert_one(offer).await.map_err(Error::from)?;
        debug!("Offer inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: OfferId) -> ApplicationResult<Option<Offer>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Error::from)?)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ApplicationResult<Vec<Offer>> {
        Ok(self.find_many(doc! {}).await?)
    }

    #[instrument(skip(self))]
    async fn find_active_by_pincode(&self, pincode: &str) -> ApplicationResult<Vec<Offer>> {
        Ok(self
            .find_many(doc! { "pincode": pincode, "isActive": true })
            .await?)
    }

    #[instrument(skip(self, fields))]
    async fn update_fields(
        &self,
        id: OfferId,
        fields: &OfferFields,
    ) -> ApplicationResult<Option<Offer>> {
        let set = fields_set(fields)?;
        let offer = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(Error::from)?;
        Ok(offer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodhub_domain::{OfferType, PromoType};

    fn fields() -> OfferFields {
        OfferFields {
            title: "Flat 50".to_string(),
            description: String::new(),
            offer_type: OfferType::Generic,
            offer_amount: 50.0,
            pincode: "560001".to_string(),
            promocode: None,
            promo_type: PromoType::Bank,
            start_validity: None,
            end_validity: None,
            bank: vec!["HDFC".to_string()],
            bins: vec![411111],
            min_value: 0.0,
            is_active: true,
        }
    }

    #[test]
    fn test_set_uses_stored_field_names() {
        let set = fields_set(&fields()).unwrap();
        assert_eq!(set.get_str("offerType").unwrap(), "GENERIC");
        assert_eq!(set.get_str("promoType").unwrap(), "BANK");
        assert_eq!(set.get("promocode"), Some(&Bson::Null));
        assert!(!set.contains_key("vendors"));
        assert!(set.contains_key("isActive"));
    }
}
