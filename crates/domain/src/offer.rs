//! Discount offers.

use std::collections::HashSet;

use bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{OfferId, VendorId};

/// Scope of an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferType {
    /// Applies to every vendor
    Generic,
    /// Applies only to the vendors it lists
    Vendor,
}

/// Who may redeem an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PromoType {
    User,
    #[default]
    All,
    Bank,
    Card,
}

/// A discount record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "_id")]
    pub id: OfferId,
    pub offer_type: OfferType,
    #[serde(default)]
    pub vendors: Vec<VendorId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub min_value: f64,
    pub offer_amount: f64,
    #[serde(default)]
    pub start_validity: Option<DateTime>,
    #[serde(default)]
    pub end_validity: Option<DateTime>,
    #[serde(default)]
    pub promocode: Option<String>,
    #[serde(default)]
    pub promo_type: PromoType,
    #[serde(default)]
    pub bank: Vec<String>,
    #[serde(default)]
    pub bins: Vec<u32>,
    pub pincode: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Offer {
    /// An offer is visible to a vendor if it is generic or lists the vendor.
    pub fn is_visible_to(&self, vendor: &VendorId) -> bool {
        self.offer_type == OfferType::Generic || self.vendors.contains(vendor)
    }
}

/// Reject validity windows that end before they start.
///
/// Open-ended windows are always valid.
pub fn check_validity_window(start: Option<DateTime>, end: Option<DateTime>) -> DomainResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(DomainError::InvalidValidityWindow),
        _ => Ok(()),
    }
}

/// Keep the offers visible to `vendor`, each exactly once, in input order.
pub fn visible_offers(offers: Vec<Offer>, vendor: &VendorId) -> Vec<Offer> {
    let mut seen: HashSet<OfferId> = HashSet::new();
    offers
        .into_iter()
        .filter(|offer| offer.is_visible_to(vendor) && seen.insert(offer.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(offer_type: OfferType, vendors: Vec<VendorId>) -> Offer {
        Offer {
            id: OfferId::new(),
            offer_type,
            vendors,
            title: "Flat 50".to_string(),
            description: String::new(),
            min_value: 200.0,
            offer_amount: 50.0,
            start_validity: None,
            end_validity: None,
            promocode: None,
            promo_type: PromoType::All,
            bank: vec![],
            bins: vec![],
            pincode: "560001".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_offer_type_wire_names() {
        assert_eq!(serde_json::to_string(&OfferType::Generic).unwrap(), "\"GENERIC\"");
        assert_eq!(serde_json::to_string(&PromoType::Bank).unwrap(), "\"BANK\"");
    }

    #[test]
    fn test_generic_offer_visible_to_everyone() {
        let o = offer(OfferType::Generic, vec![]);
        assert!(o.is_visible_to(&VendorId::new()));
    }

    #[test]
    fn test_vendor_offer_visible_only_to_listed_vendors() {
        let listed = VendorId::new();
        let o = offer(OfferType::Vendor, vec![listed]);
        assert!(o.is_visible_to(&listed));
        assert!(!o.is_visible_to(&VendorId::new()));
    }

    #[test]
    fn test_generic_offer_listing_the_vendor_appears_once() {
        let vendor = VendorId::new();
        let both = offer(OfferType::Generic, vec![vendor]);
        let other = offer(OfferType::Vendor, vec![VendorId::new()]);
        let visible = visible_offers(vec![both.clone(), other, both.clone()], &vendor);
        assert_eq!(visible, vec![both]);
    }

    #[test]
    fn test_repeated_offers_keep_first_position() {
        let vendor = VendorId::new();
        let a = offer(OfferType::Generic, vec![]);
        let b = offer(OfferType::Vendor, vec![vendor]);
        let visible = visible_offers(
            vec![b.clone(), a.clone(), b.clone(), a.clone(), b.clone()],
            &vendor,
        );
        assert_eq!(visible, vec![b, a]);
    }

    #[test]
    fn test_validity_window() {
        let start = DateTime::from_millis(1_000);
        let end = DateTime::from_millis(2_000);
        assert!(check_validity_window(Some(start), Some(end)).is_ok());
        assert!(check_validity_window(None, Some(end)).is_ok());
        assert_eq!(
            check_validity_window(Some(end), Some(start)),
            Err(DomainError::InvalidValidityWindow)
        );
    }
}
