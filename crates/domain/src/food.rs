//! Food items listed by vendors.

use serde::{Deserialize, Serialize};

use crate::identifiers::{FoodId, VendorId};

/// A menu item. Owned by one vendor, referenced by order line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(rename = "_id")]
    pub id: FoodId,
    pub vendor_id: VendorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub food_type: String,
    /// Preparation time in minutes
    #[serde(default)]
    pub ready_time: u32,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Food {
    /// Case-insensitive substring match on name or description
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
