//! Vendor accounts.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::identifiers::{FoodId, VendorId};
use crate::location::Coordinates;

/// A merchant offering food items and offers.
///
/// Stored in the `vendors` collection. The password field holds an argon2
/// PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[serde(rename = "_id")]
    pub id: VendorId,
    pub name: String,
    pub owner_name: String,
    #[serde(default)]
    pub food_type: Vec<String>,
    pub pincode: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub service_available: bool,
    #[serde(default)]
    pub cover_images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub foods: Vec<FoodId>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Vendor {
    /// Current service-area coordinates, if both are known
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// Flip service availability, moving the service area when coordinates are given.
    pub fn toggle_service(&mut self, coordinates: Option<Coordinates>) {
        self.service_available = !self.service_available;
        if let Some(c) = coordinates {
            self.lat = Some(c.lat);
            self.lng = Some(c.lng);
        }
    }

    /// Append food references, skipping ids already present.
    ///
    /// Returns the number of ids actually added.
    pub fn append_foods(&mut self, ids: &[FoodId]) -> usize {
        let before = self.foods.len();
        for id in ids {
            if !self.foods.contains(id) {
                self.foods.push(*id);
            }
        }
        self.foods.len() - before
    }

    /// Append cover image references in order. Existing images are kept.
    pub fn append_cover_images<I>(&mut self, images: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.cover_images.extend(images);
    }
}

/// Profile fields a vendor may change about themselves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorProfilePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub food_type: Option<Vec<String>>,
}

impl VendorProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.food_type.is_none()
    }

    /// Apply the provided fields to a vendor in place
    pub fn apply(&self, vendor: &mut Vendor) {
        if let Some(name) = &self.name {
            vendor.name = name.clone();
        }
        if let Some(address) = &self.address {
            vendor.address = address.clone();
        }
        if let Some(phone) = &self.phone {
            vendor.phone = phone.clone();
        }
        if let Some(food_type) = &self.food_type {
            vendor.food_type = food_type.clone();
        }
    }
}
