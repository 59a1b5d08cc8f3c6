//! Property tests for offer visibility
//!
//! A generic offer is visible to every vendor; a vendor-scoped offer only to
//! the vendors it lists. Listings never contain the same offer twice.

use foodhub_domain::{
    offer::{visible_offers, Offer, OfferType, PromoType},
    OfferId, VendorId,
};
use proptest::prelude::*;

fn make_offer(generic: bool, vendors: Vec<VendorId>) -> Offer {
    Offer {
        id: OfferId::new(),
        offer_type: if generic { OfferType::Generic } else { OfferType::Vendor },
        vendors,
        title: "offer".to_string(),
        description: String::new(),
        min_value: 0.0,
        offer_amount: 10.0,
        start_validity: None,
        end_validity: None,
        promocode: None,
        promo_type: PromoType::All,
        bank: vec![],
        bins: vec![],
        pincode: "000000".to_string(),
        is_active: true,
    }
}

proptest! {
    #[test]
    fn visibility_matches_invariant(
        shape in prop::collection::vec((any::<bool>(), any::<bool>()), 0..40)
    ) {
        let me = VendorId::new();
        let other = VendorId::new();

        let offers: Vec<Offer> = shape
            .iter()
            .map(|(generic, lists_me)| {
                let vendors = if *lists_me { vec![me] } else { vec![other] };
                make_offer(*generic, vendors)
            })
            .collect();

        let expected: Vec<OfferId> = offers
            .iter()
            .filter(|o| o.offer_type == OfferType::Generic || o.vendors.contains(&me))
            .map(|o| o.id)
            .collect();

        let visible: Vec<OfferId> = visible_offers(offers, &me).iter().map(|o| o.id).collect();
        prop_assert_eq!(visible, expected);
    }
}

#[test]
fn test_generic_offers_reach_every_vendor() {
    let offers = vec![make_offer(true, vec![])];
    for _ in 0..5 {
        assert_eq!(visible_offers(offers.clone(), &VendorId::new()).len(), 1);
    }
}

#[test]
fn test_repeated_offer_is_listed_once() {
    let me = VendorId::new();
    let offer = make_offer(true, vec![me]);
    let visible = visible_offers(vec![offer.clone(), offer], &me);
    assert_eq!(visible.len(), 1);
}
