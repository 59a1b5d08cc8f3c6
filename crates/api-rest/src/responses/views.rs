//! JSON shapes of the stored documents.
//!
//! Ids are hex strings, timestamps RFC 3339. Password hashes never leave
//! the server.

use bson::DateTime;
use chrono::SecondsFormat;
use foodhub_application::services::Restaurant;
use foodhub_common::PaginatedResult;
use foodhub_domain::{
    Customer, DeliveryPerson, Food, Offer, Order, OrderDetails, OrderLine, Vendor,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn rfc3339(value: DateTime) -> String {
    value.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn hex_ids<T: ToString>(ids: &[T]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

/// A signed bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenView {
    pub token: String,
}

/// Vendor without credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorView {
    pub id: String,
    pub name: String,
    pub owner_name: String,
    pub food_type: Vec<String>,
    pub pincode: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub service_available: bool,
    pub cover_images: Vec<String>,
    pub rating: f64,
    pub foods: Vec<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Vendor> for VendorView {
    fn from(v: Vendor) -> Self {
        Self {
            id: v.id.to_string(),
            foods: hex_ids(&v.foods),
            name: v.name,
            owner_name: v.owner_name,
            food_type: v.food_type,
            pincode: v.pincode,
            address: v.address,
            phone: v.phone,
            email: v.email,
            service_available: v.service_available,
            cover_images: v.cover_images,
            rating: v.rating,
            lat: v.lat,
            lng: v.lng,
            created_at: rfc3339(v.created_at),
            updated_at: rfc3339(v.updated_at),
        }
    }
}

/// One page of the vendor listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorPageView {
    pub data: Vec<VendorView>,
    pub page: u32,
    pub per_page: u32,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

impl From<PaginatedResult<Vendor>> for VendorPageView {
    fn from(result: PaginatedResult<Vendor>) -> Self {
        Self {
            page: result.page,
            per_page: result.limit,
            total_count: result.total,
            data: result.data.into_iter().map(VendorView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodView {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub food_type: String,
    pub ready_time: u32,
    pub price: f64,
    pub rating: f64,
    pub images: Vec<String>,
}

impl From<Food> for FoodView {
    fn from(f: Food) -> Self {
        Self {
            id: f.id.to_string(),
            vendor_id: f.vendor_id.to_string(),
            name: f.name,
            description: f.description,
            category: f.category,
            food_type: f.food_type,
            ready_time: f.ready_time,
            price: f.price,
            rating: f.rating,
            images: f.images,
        }
    }
}

/// One page of a vendor's menu
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodPageView {
    pub foods: Vec<FoodView>,
    pub page: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl From<PaginatedResult<Food>> for FoodPageView {
    fn from(result: PaginatedResult<Food>) -> Self {
        Self {
            page: result.page,
            total_count: result.total,
            total_pages: result.pages,
            foods: result.data.into_iter().map(FoodView::from).collect(),
        }
    }
}

/// Order line; `food` is null when the order was not populated or the
/// referenced food no longer exists
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub food: Option<FoodView>,
    pub food_id: String,
    pub unit: u32,
}

impl From<OrderLine> for OrderLineView {
    fn from(line: OrderLine) -> Self {
        Self {
            food: line.food.map(FoodView::from),
            food_id: line.food_id.to_string(),
            unit: line.unit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    #[serde(rename = "orderID")]
    pub order_number: String,
    pub vendor_id: String,
    pub customer_id: Option<String>,
    pub items: Vec<OrderLineView>,
    pub total_amount: f64,
    pub order_date: String,
    pub paid_through: String,
    pub payment_response: String,
    pub order_status: String,
    pub remarks: String,
    pub delivery_id: Option<String>,
    pub applied_offers: bool,
    pub offer_id: Option<String>,
    pub ready_time: Option<u32>,
}

impl OrderView {
    fn with_lines(order: Order, items: Vec<OrderLineView>) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number,
            vendor_id: order.vendor_id.to_string(),
            customer_id: order.customer_id.map(|id| id.to_string()),
            items,
            total_amount: order.total_amount,
            order_date: rfc3339(order.order_date),
            paid_through: order.paid_through,
            payment_response: order.payment_response,
            order_status: order.order_status.as_str().to_string(),
            remarks: order.remarks,
            delivery_id: order.delivery_id.map(|id| id.to_string()),
            applied_offers: order.applied_offers,
            offer_id: order.offer_id.map(|id| id.to_string()),
            ready_time: order.ready_time,
        }
    }
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| OrderLineView {
                food: None,
                food_id: item.food.to_string(),
                unit: item.unit,
            })
            .collect();
        Self::with_lines(order, items)
    }
}

impl From<OrderDetails> for OrderView {
    fn from(details: OrderDetails) -> Self {
        let items = details.lines.into_iter().map(OrderLineView::from).collect();
        Self::with_lines(details.order, items)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    /// `GENERIC` or `VENDOR`
    pub offer_type: String,
    pub vendors: Vec<String>,
    pub title: String,
    pub description: String,
    pub min_value: f64,
    pub offer_amount: f64,
    pub start_validity: Option<String>,
    pub end_validity: Option<String>,
    pub promocode: Option<String>,
    /// `USER`, `ALL`, `BANK` or `CARD`
    pub promo_type: String,
    pub bank: Vec<String>,
    pub bins: Vec<u32>,
    pub pincode: String,
    pub is_active: bool,
}

/// Wire name of a unit-variant enum
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

impl From<Offer> for OfferView {
    fn from(o: Offer) -> Self {
        Self {
            id: o.id.to_string(),
            offer_type: wire_name(&o.offer_type),
            vendors: hex_ids(&o.vendors),
            title: o.title,
            description: o.description,
            min_value: o.min_value,
            offer_amount: o.offer_amount,
            start_validity: o.start_validity.map(rfc3339),
            end_validity: o.end_validity.map(rfc3339),
            promocode: o.promocode,
            promo_type: wire_name(&o.promo_type),
            bank: o.bank,
            bins: o.bins,
            pincode: o.pincode,
            is_active: o.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub verified: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub orders: Vec<String>,
}

impl From<Customer> for CustomerView {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id.to_string(),
            orders: hex_ids(&c.orders),
            email: c.email,
            first_name: c.first_name,
            last_name: c.last_name,
            address: c.address,
            phone: c.phone,
            verified: c.verified,
            lat: c.lat,
            lng: c.lng,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub pincode: String,
    pub verified: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub is_available: bool,
}

impl From<DeliveryPerson> for DeliveryView {
    fn from(p: DeliveryPerson) -> Self {
        Self {
            id: p.id.to_string(),
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            address: p.address,
            phone: p.phone,
            pincode: p.pincode,
            verified: p.verified,
            lat: p.lat,
            lng: p.lng,
            is_available: p.is_available,
        }
    }
}

/// A vendor with its menu
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantView {
    pub vendor: VendorView,
    pub foods: Vec<FoodView>,
}

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        Self {
            vendor: r.vendor.into(),
            foods: r.foods.into_iter().map(FoodView::from).collect(),
        }
    }
}

/// Reference to a stored upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadView {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Convert every element of a list
pub fn views<T, V: From<T>>(items: Vec<T>) -> Vec<V> {
    items.into_iter().map(V::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodhub_domain::{FoodId, OfferType, VendorId};
    use foodhub_testing::fixtures::{create_test_food, create_test_offer, create_test_order, create_test_vendor};

    #[test]
    fn test_vendor_view_hides_password() {
        let vendor = create_test_vendor();
        let json = serde_json::to_value(VendorView::from(vendor.clone())).unwrap();
        assert_eq!(json["id"], vendor.id.to_string());
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["serviceAvailable"], false);
    }

    #[test]
    fn test_offer_view_uses_wire_enum_names() {
        let offer = create_test_offer(OfferType::Generic, vec![VendorId::new()]);
        let view = OfferView::from(offer);
        assert_eq!(view.offer_type, "GENERIC");
        assert_eq!(view.vendors.len(), 1);
    }

    #[test]
    fn test_populated_order_lines() {
        let vendor = VendorId::new();
        let food = create_test_food(vendor);
        let missing = FoodId::new();
        let order = create_test_order(vendor, &[food.id, missing]);

        let view = OrderView::from(OrderDetails::populate(order, &[food.clone()]));
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].food.as_ref().unwrap().name, food.name);
        assert!(view.items[1].food.is_none());
        assert_eq!(view.items[1].food_id, missing.to_string());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("orderID").is_some());
    }
}
