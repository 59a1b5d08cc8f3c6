//! Test fixtures for generating domain entities with realistic data.
//!
//! Every fixture gets a fresh id and fake names and emails, so fixtures can be
//! inserted side by side without tripping unique indexes.

use bson::DateTime;
use fake::{
    faker::{
        address::en::{StreetName, ZipCode},
        company::en::CompanyName,
        internet::en::FreeEmail,
        lorem::en::{Sentence, Word},
        name::en::{FirstName, LastName, Name},
        phone_number::en::PhoneNumber,
    },
    Fake,
};
use foodhub_domain::{
    Customer, CustomerId, DeliveryPerson, DeliveryPersonId, Food, FoodId, Offer, OfferId,
    OfferType, Order, OrderId, OrderItem, OrderStatus, PromoType, Vendor, VendorId,
};

/// Pincode used by fixtures that do not pick their own
pub const TEST_PINCODE: &str = "560001";

/// Create a vendor that is not yet serving
pub fn create_test_vendor() -> Vendor {
    let now = DateTime::now();
    Vendor {
        id: VendorId::new(),
        name: CompanyName().fake(),
        owner_name: Name().fake(),
        food_type: vec!["veg".to_string()],
        pincode: TEST_PINCODE.to_string(),
        address: StreetName().fake(),
        phone: PhoneNumber().fake(),
        email: FreeEmail().fake(),
        password_hash: "plain$password123".to_string(),
        service_available: false,
        cover_images: Vec::new(),
        rating: 0.0,
        foods: Vec::new(),
        lat: None,
        lng: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a serving vendor in `pincode` with the given rating
pub fn create_available_vendor(pincode: &str, rating: f64) -> Vendor {
    Vendor {
        pincode: pincode.to_string(),
        rating,
        service_available: true,
        ..create_test_vendor()
    }
}

/// Create a food owned by `vendor`
pub fn create_test_food(vendor: VendorId) -> Food {
    Food {
        id: FoodId::new(),
        vendor_id: vendor,
        name: Word().fake(),
        description: Sentence(3..6).fake(),
        category: "main".to_string(),
        food_type: "veg".to_string(),
        ready_time: (5..60u32).fake(),
        price: (50..500u32).fake::<u32>() as f64,
        rating: 0.0,
        images: Vec::new(),
    }
}

/// Create a waiting order for `vendor` with one unit of each food
pub fn create_test_order(vendor: VendorId, foods: &[FoodId]) -> Order {
    Order {
        id: OrderId::new(),
        order_number: format!("ORD-{}", (10_000..99_999u32).fake::<u32>()),
        vendor_id: vendor,
        customer_id: None,
        items: foods
            .iter()
            .map(|food| OrderItem { food: *food, unit: 1 })
            .collect(),
        total_amount: 0.0,
        order_date: DateTime::now(),
        paid_through: "COD".to_string(),
        payment_response: String::new(),
        order_status: OrderStatus::waiting(),
        remarks: String::new(),
        delivery_id: None,
        applied_offers: false,
        offer_id: None,
        ready_time: None,
    }
}

/// Create an active offer of the given type for the listed vendors
pub fn create_test_offer(offer_type: OfferType, vendors: Vec<VendorId>) -> Offer {
    Offer {
        id: OfferId::new(),
        offer_type,
        vendors,
        title: Sentence(2..4).fake(),
        description: Sentence(4..8).fake(),
        min_value: 100.0,
        offer_amount: 50.0,
        start_validity: None,
        end_validity: None,
        promocode: Some(Word().fake::<String>().to_uppercase()),
        promo_type: PromoType::All,
        bank: Vec::new(),
        bins: Vec::new(),
        pincode: TEST_PINCODE.to_string(),
        is_active: true,
    }
}

/// Create a customer whose password is `password123` under [`crate::PlainPasswordHasher`]
pub fn create_test_customer() -> Customer {
    let now = DateTime::now();
    Customer {
        id: CustomerId::new(),
        email: FreeEmail().fake(),
        password_hash: "plain$password123".to_string(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        address: StreetName().fake(),
        phone: PhoneNumber().fake(),
        verified: false,
        lat: None,
        lng: None,
        orders: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Create an unverified, unavailable delivery person
pub fn create_test_delivery_person() -> DeliveryPerson {
    let now = DateTime::now();
    DeliveryPerson {
        id: DeliveryPersonId::new(),
        email: FreeEmail().fake(),
        password_hash: "plain$password123".to_string(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        address: StreetName().fake(),
        phone: PhoneNumber().fake(),
        pincode: ZipCode().fake(),
        verified: false,
        lat: None,
        lng: None,
        is_available: false,
        created_at: now,
        updated_at: now,
    }
}
