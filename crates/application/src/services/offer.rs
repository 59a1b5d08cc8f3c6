//! Offer Service

use chrono::{DateTime, Utc};
use foodhub_domain::{
    offer::{check_validity_window, visible_offers},
    Offer, OfferId, OfferType, PromoType, VendorId,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::found;
use crate::ports::{OfferRepositoryPort, VendorRepositoryPort};
use crate::{ApplicationError, ApplicationResult};

/// The fields a vendor may set when creating or editing an offer
#[derive(Debug, Clone, PartialEq)]
pub struct OfferFields {
    pub title: String,
    pub description: String,
    pub offer_type: OfferType,
    pub offer_amount: f64,
    pub pincode: String,
    pub promocode: Option<String>,
    pub promo_type: PromoType,
    pub start_validity: Option<DateTime<Utc>>,
    pub end_validity: Option<DateTime<Utc>>,
    pub bank: Vec<String>,
    pub bins: Vec<u32>,
    pub min_value: f64,
    pub is_active: bool,
}

impl OfferFields {
    fn check(&self) -> ApplicationResult<()> {
        check_validity_window(self.start_bson(), self.end_bson())?;
        Ok(())
    }

    pub fn start_bson(&self) -> Option<bson::DateTime> {
        self.start_validity.map(bson::DateTime::from_chrono)
    }

    pub fn end_bson(&self) -> Option<bson::DateTime> {
        self.end_validity.map(bson::DateTime::from_chrono)
    }

    /// Overwrite the editable fields of `offer`
    pub fn apply(&self, offer: &mut Offer) {
        offer.title = self.title.clone();
        offer.description = self.description.clone();
        offer.offer_type = self.offer_type;
        offer.offer_amount = self.offer_amount;
        offer.pincode = self.pincode.clone();
        offer.promocode = self.promocode.clone();
        offer.promo_type = self.promo_type;
        offer.start_validity = self.start_bson();
        offer.end_validity = self.end_bson();
        offer.bank = self.bank.clone();
        offer.bins = self.bins.clone();
        offer.min_value = self.min_value;
        offer.is_active = self.is_active;
    }

    fn into_offer(self, vendor: VendorId) -> Offer {
        let mut offer = Offer {
            id: OfferId::new(),
            offer_type: self.offer_type,
            vendors: vec![vendor],
            title: String::new(),
            description: String::new(),
            min_value: 0.0,
            offer_amount: 0.0,
            start_validity: None,
            end_validity: None,
            promocode: None,
            promo_type: PromoType::default(),
            bank: Vec::new(),
            bins: Vec::new(),
            pincode: String::new(),
            is_active: false,
        };
        self.apply(&mut offer);
        offer
    }
}

/// Offer service implementation
#[derive(Clone)]
pub struct OfferService {
    offers: Arc<dyn OfferRepositoryPort>,
    vendors: Arc<dyn VendorRepositoryPort>,
}

impl OfferService {
    pub fn new(offers: Arc<dyn OfferRepositoryPort>, vendors: Arc<dyn VendorRepositoryPort>) -> Self {
        Self { offers, vendors }
    }

    /// Offers visible to the vendor: every generic offer plus those listing the vendor.
    ///
    /// This scans the whole collection.
    #[instrument(skip(self))]
    pub async fn list_for_vendor(&self, vendor_id: VendorId) -> ApplicationResult<Vec<Offer>> {
        found(self.vendors.find_by_id(vendor_id).await?, "Vendor not found")?;
        let offers = self.offers.find_all().await?;
        Ok(visible_offers(offers, &vendor_id))
    }

    /// Create an offer associated with the calling vendor only
    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn add(&self, vendor_id: VendorId, fields: OfferFields) -> ApplicationResult<Offer> {
        fields.check()?;
        found(self.vendors.find_by_id(vendor_id).await?, "Vendor not found")?;

        let offer = fields.into_offer(vendor_id);
        self.offers.insert(&offer).await?;
        info!(offer_id = %offer.id, vendor_id = %vendor_id, "offer created");
        Ok(offer)
    }

    /// Overwrite an offer's fields. The vendor association never changes.
    #[instrument(skip(self, fields))]
    pub async fn edit(
        &self,
        vendor_id: VendorId,
        id: OfferId,
        fields: OfferFields,
    ) -> ApplicationResult<Offer> {
        fields.check()?;
        let existing = found(self.offers.find_by_id(id).await?, "Offer not found")?;
        if !existing.vendors.contains(&vendor_id) {
            return Err(ApplicationError::Forbidden(
                "Offer is not associated with this vendor".to_string(),
            ));
        }

        let offer = found(
            self.offers.update_fields(id, &fields).await?,
            "Offer not found",
        )?;
        info!(offer_id = %id, "offer updated");
        Ok(offer)
    }
}
