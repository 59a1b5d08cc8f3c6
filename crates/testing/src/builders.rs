//! Fluent builders for the inputs services take.

use chrono::{DateTime, Utc};
use foodhub_application::services::{NewFood, NewVendor, OfferFields};
use foodhub_domain::{OfferType, PromoType};

use crate::fixtures::TEST_PINCODE;

/// Builder for vendor onboarding requests
#[derive(Clone)]
pub struct NewVendorBuilder {
    inner: NewVendor,
}

impl NewVendorBuilder {
    pub fn new() -> Self {
        Self {
            inner: NewVendor {
                name: "Spice Route".to_string(),
                owner_name: "Asha Rao".to_string(),
                food_type: vec!["veg".to_string()],
                pincode: TEST_PINCODE.to_string(),
                address: "12 MG Road".to_string(),
                phone: "9876543210".to_string(),
                email: "spice@example.com".to_string(),
                password: "password123".to_string(),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.inner.email = email.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.inner.password = password.into();
        self
    }

    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.inner.pincode = pincode.into();
        self
    }

    pub fn build(self) -> NewVendor {
        self.inner
    }
}

impl Default for NewVendorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for food creation requests
#[derive(Clone)]
pub struct NewFoodBuilder {
    inner: NewFood,
}

impl NewFoodBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: NewFood {
                name: name.into(),
                description: String::new(),
                category: "main".to_string(),
                food_type: "veg".to_string(),
                ready_time: 20,
                price: 150.0,
                images: Vec::new(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn with_ready_time(mut self, minutes: u32) -> Self {
        self.inner.ready_time = minutes;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.inner.price = price;
        self
    }

    pub fn build(self) -> NewFood {
        self.inner
    }
}

/// Builder for offer create/edit payloads
#[derive(Clone)]
pub struct OfferFieldsBuilder {
    inner: OfferFields,
}

impl OfferFieldsBuilder {
    pub fn new() -> Self {
        Self {
            inner: OfferFields {
                title: "Flat 50".to_string(),
                description: "Flat 50 off on orders above 200".to_string(),
                offer_type: OfferType::Vendor,
                offer_amount: 50.0,
                pincode: TEST_PINCODE.to_string(),
                promocode: Some("FLAT50".to_string()),
                promo_type: PromoType::All,
                start_validity: None,
                end_validity: None,
                bank: Vec::new(),
                bins: Vec::new(),
                min_value: 200.0,
                is_active: true,
            },
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.inner.title = title.into();
        self
    }

    pub fn with_type(mut self, offer_type: OfferType) -> Self {
        self.inner.offer_type = offer_type;
        self
    }

    pub fn with_validity(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.inner.start_validity = Some(start);
        self.inner.end_validity = Some(end);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.inner.is_active = false;
        self
    }

    pub fn build(self) -> OfferFields {
        self.inner
    }
}

impl Default for OfferFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
