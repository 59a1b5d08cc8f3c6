//! Order Service
//!
//! Vendors read their orders with line items resolved and record decisions
//! on them. Status values are stored verbatim.

use foodhub_domain::{CustomerId, Order, OrderDetails, OrderId, OrderStatus, VendorId};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::found;
use crate::ports::{FoodRepositoryPort, OrderRepositoryPort};
use crate::ApplicationResult;

const ORDER_NOT_FOUND: &str = "Order Not found";

/// A vendor's decision on an order
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOrder {
    pub status: String,
    pub remarks: String,
    /// Minutes until the order is ready
    pub ready_time: Option<u32>,
}

/// Order service implementation
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepositoryPort>,
    foods: Arc<dyn FoodRepositoryPort>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepositoryPort>, foods: Arc<dyn FoodRepositoryPort>) -> Self {
        Self { orders, foods }
    }

    /// Resolve line items of many orders with a single food lookup
    async fn populate(&self, orders: Vec<Order>) -> ApplicationResult<Vec<OrderDetails>> {
        let mut ids = Vec::new();
        for order in &orders {
            for id in order.food_ids() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        let foods = if ids.is_empty() {
            Vec::new()
        } else {
            self.foods.find_by_ids(&ids).await?
        };
        Ok(orders
            .into_iter()
            .map(|order| OrderDetails::populate(order, &foods))
            .collect())
    }

    /// Orders belonging to `vendor_id`; others are reported as missing
    async fn owned_order(&self, vendor_id: VendorId, id: OrderId) -> ApplicationResult<Order> {
        let order = found(self.orders.find_by_id(id).await?, ORDER_NOT_FOUND)?;
        found(
            (order.vendor_id == vendor_id).then_some(order),
            ORDER_NOT_FOUND,
        )
    }

    #[instrument(skip(self))]
    pub async fn list_for_vendor(&self, vendor_id: VendorId) -> ApplicationResult<Vec<OrderDetails>> {
        let orders = self.orders.find_by_vendor(vendor_id).await?;
        self.populate(orders).await
    }

    #[instrument(skip(self))]
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> ApplicationResult<Vec<OrderDetails>> {
        let orders = self.orders.find_by_customer(customer_id).await?;
        self.populate(orders).await
    }

    #[instrument(skip(self))]
    pub async fn get_for_vendor(
        &self,
        vendor_id: VendorId,
        id: OrderId,
    ) -> ApplicationResult<OrderDetails> {
        let order = self.owned_order(vendor_id, id).await?;
        let mut details = self.populate(vec![order]).await?;
        found(details.pop(), ORDER_NOT_FOUND)
    }

    /// Overwrite status and remarks, and the ready time when given.
    ///
    /// No transition rules apply: any non-blank status is accepted.
    #[instrument(skip(self, decision), fields(status = %decision.status))]
    pub async fn process(
        &self,
        vendor_id: VendorId,
        id: OrderId,
        decision: ProcessOrder,
    ) -> ApplicationResult<Order> {
        let status = OrderStatus::new(decision.status)?;
        self.owned_order(vendor_id, id).await?;
        if !status.is_well_known() {
            debug!(order_id = %id, status = %status, "storing unconventional order status");
        }

        let order = found(
            self.orders
                .update_processing(id, &status, &decision.remarks, decision.ready_time)
                .await?,
            ORDER_NOT_FOUND,
        )?;
        info!(order_id = %id, status = %order.order_status, "order processed");
        Ok(order)
    }
}
