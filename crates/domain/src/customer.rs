//! Customer accounts.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::identifiers::{CustomerId, OrderId};

/// A customer who browses vendors and places orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
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
    pub verified: bool,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub orders: Vec<OrderId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Customer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Profile fields shared by customers and delivery personnel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}

impl PersonProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.address.is_none()
    }

    pub fn apply_to_customer(&self, customer: &mut Customer) {
        if let Some(v) = &self.first_name {
            customer.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            customer.last_name = v.clone();
        }
        if let Some(v) = &self.address {
            customer.address = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims_missing_parts() {
        let c = Customer {
            id: CustomerId::new(),
            email: "c@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Ravi".to_string(),
            last_name: String::new(),
            address: String::new(),
            phone: "1234567".to_string(),
            verified: false,
            lat: None,
            lng: None,
            orders: vec![],
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        };
        assert_eq!(c.display_name(), "Ravi");
    }
}
