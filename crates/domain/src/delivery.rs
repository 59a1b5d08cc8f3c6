//! Delivery personnel.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::customer::PersonProfilePatch;
use crate::identifiers::DeliveryPersonId;
use crate::location::Coordinates;

/// A courier who picks up orders from vendors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPerson {
    #[serde(rename = "_id")]
    pub id: DeliveryPersonId,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub is_available: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl DeliveryPerson {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Flip availability, updating the position when coordinates are given
    pub fn toggle_availability(&mut self, coordinates: Option<Coordinates>) {
        self.is_available = !self.is_available;
        if let Some(c) = coordinates {
            self.lat = Some(c.lat);
            self.lng = Some(c.lng);
        }
    }
}

impl PersonProfilePatch {
    pub fn apply_to_delivery(&self, person: &mut DeliveryPerson) {
        if let Some(v) = &self.first_name {
            person.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            person.last_name = v.clone();
        }
        if let Some(v) = &self.address {
            person.address = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_availability() {
        let mut p = DeliveryPerson {
            id: DeliveryPersonId::new(),
            email: "d@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Sam".to_string(),
            last_name: "K".to_string(),
            address: String::new(),
            phone: "1234567".to_string(),
            pincode: "560001".to_string(),
            verified: false,
            lat: None,
            lng: None,
            is_available: false,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        };
        p.toggle_availability(Some(Coordinates { lat: 1.5, lng: 2.5 }));
        assert!(p.is_available);
        assert_eq!(p.lat, Some(1.5));
        p.toggle_availability(None);
        assert!(!p.is_available);
        assert_eq!(p.lng, Some(2.5));
        assert_eq!(p.display_name(), "Sam K");
    }
}
