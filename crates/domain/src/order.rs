//! Orders and their line items.

use bson::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DomainError, DomainResult};
use crate::food::Food;
use crate::identifiers::{CustomerId, DeliveryPersonId, FoodId, OfferId, OrderId, VendorId};

/// Order status as recorded by the vendor.
///
/// Any non-empty value is accepted; no transition table is enforced. The
/// associated constants name the values clients conventionally send.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub const WAITING: &'static str = "Waiting";
    pub const ACCEPT: &'static str = "Accept";
    pub const REJECT: &'static str = "Reject";
    pub const FAILED: &'static str = "Failed";
    pub const IN_PROGRESS: &'static str = "In-Progress";
    pub const READY: &'static str = "Ready";

    /// Wrap a status string verbatim. Only blank values are rejected.
    pub fn new(status: impl Into<String>) -> DomainResult<Self> {
        let status = status.into();
        if status.trim().is_empty() {
            return Err(DomainError::EmptyOrderStatus);
        }
        Ok(Self(status))
    }

    pub fn waiting() -> Self {
        Self(Self::WAITING.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the conventional values
    pub fn is_well_known(&self) -> bool {
        [
            Self::WAITING,
            Self::ACCEPT,
            Self::REJECT,
            Self::FAILED,
            Self::IN_PROGRESS,
            Self::READY,
        ]
        .contains(&self.0.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::waiting()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub food: FoodId,
    pub unit: u32,
}

/// A customer order placed with a single vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "orderID", default)]
    pub order_number: String,
    pub vendor_id: VendorId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: f64,
    pub order_date: DateTime,
    #[serde(default)]
    pub paid_through: String,
    #[serde(default)]
    pub payment_response: String,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub delivery_id: Option<DeliveryPersonId>,
    #[serde(default)]
    pub applied_offers: bool,
    #[serde(default)]
    pub offer_id: Option<OfferId>,
    /// Estimated preparation time in minutes
    #[serde(default)]
    pub ready_time: Option<u32>,
}

impl Order {
    /// Record a vendor decision on this order.
    ///
    /// Status and remarks are always overwritten; ready time only when given.
    pub fn process(&mut self, status: OrderStatus, remarks: String, ready_time: Option<u32>) {
        self.order_status = status;
        self.remarks = remarks;
        if let Some(minutes) = ready_time {
            self.ready_time = Some(minutes);
        }
    }

    /// Distinct food ids referenced by the line items
    pub fn food_ids(&self) -> Vec<FoodId> {
        let mut ids: Vec<FoodId> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !ids.contains(&item.food) {
                ids.push(item.food);
            }
        }
        ids
    }
}

/// A line item with its food resolved; `food` is `None` for dangling references
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub food: Option<Food>,
    pub food_id: FoodId,
    pub unit: u32,
}

/// An order with its line items resolved against the food collection
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderDetails {
    /// Resolve line items against the given foods
    pub fn populate(order: Order, foods: &[Food]) -> Self {
        let lines = order
            .items
            .iter()
            .map(|item| OrderLine {
                food: foods.iter().find(|f| f.id == item.food).cloned(),
                food_id: item.food,
                unit: item.unit,
            })
            .collect();
        Self { order, lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new(),
            order_number: "ORD-1".to_string(),
            vendor_id: VendorId::new(),
            customer_id: None,
            items: vec![],
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

    #[test]
    fn test_any_status_is_accepted_verbatim() {
        let status = OrderStatus::new("Out-for-delivery").unwrap();
        assert_eq!(status.as_str(), "Out-for-delivery");
        assert!(!status.is_well_known());
        assert!(OrderStatus::new(OrderStatus::READY).unwrap().is_well_known());
    }

    #[test]
    fn test_blank_status_is_rejected() {
        assert_eq!(OrderStatus::new("  "), Err(DomainError::EmptyOrderStatus));
    }

    #[test]
    fn test_process_overwrites_without_transition_check() {
        let mut o = order();
        o.process(OrderStatus::new("Failed").unwrap(), "oops".to_string(), None);
        o.process(OrderStatus::new("Ready").unwrap(), "done".to_string(), Some(15));
        assert_eq!(o.order_status.as_str(), "Ready");
        assert_eq!(o.remarks, "done");
        assert_eq!(o.ready_time, Some(15));

        o.process(OrderStatus::new("Accept").unwrap(), String::new(), None);
        assert_eq!(o.ready_time, Some(15));
    }

    #[test]
    fn test_populate_keeps_dangling_references() {
        let known = FoodId::new();
        let missing = FoodId::new();
        let mut o = order();
        o.items = vec![
            OrderItem { food: known, unit: 2 },
            OrderItem { food: missing, unit: 1 },
        ];
        let food = Food {
            id: known,
            vendor_id: o.vendor_id,
            name: "Dosa".to_string(),
            description: String::new(),
            category: String::new(),
            food_type: String::new(),
            ready_time: 10,
            price: 60.0,
            rating: 0.0,
            images: vec![],
        };

        let details = OrderDetails::populate(o, &[food]);
        assert_eq!(details.lines.len(), 2);
        assert_eq!(details.lines[0].food.as_ref().map(|f| f.name.as_str()), Some("Dosa"));
        assert!(details.lines[1].food.is_none());
        assert_eq!(details.lines[1].food_id, missing);
    }

    #[test]
    fn test_food_ids_are_distinct() {
        let a = FoodId::new();
        let mut o = order();
        o.items = vec![OrderItem { food: a, unit: 1 }, OrderItem { food: a, unit: 3 }];
        assert_eq!(o.food_ids(), vec![a]);
    }
}
