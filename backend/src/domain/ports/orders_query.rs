//! Driving port for customer-scoped order reads.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AddressSnapshot, Error, Order, OrderItem, OrderStatus, OrderSummary, PaymentMode, UserId,
};

/// One purchased line in an order payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    /// Item identifier.
    pub id: Uuid,
    /// Product the line refers to.
    pub product_id: Uuid,
    /// Units purchased.
    pub quantity: i32,
    /// Price per unit at purchase time.
    pub unit_price: BigDecimal,
}

impl From<&OrderItem> for OrderItemPayload {
    fn from(value: &OrderItem) -> Self {
        Self {
            id: value.id(),
            product_id: value.product_id(),
            quantity: value.quantity(),
            unit_price: value.unit_price().clone(),
        }
    }
}

/// Serialisable order with items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Order identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: UserId,
    /// Settled total after any discount.
    pub total: BigDecimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// How the order was paid.
    pub payment_mode: PaymentMode,
    /// Embedded shipping snapshot.
    pub shipping_address: AddressSnapshot,
    /// Purchased lines.
    pub items: Vec<OrderItemPayload>,
    /// Carrier name once shipped.
    pub tracking_carrier: Option<String>,
    /// Tracking reference once shipped.
    pub tracking_number: Option<String>,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderPayload {
    fn from(value: Order) -> Self {
        Self {
            id: value.id(),
            customer_id: value.customer_id().clone(),
            total: value.total().clone(),
            status: value.status(),
            payment_mode: value.payment_mode(),
            shipping_address: value.shipping_address().clone(),
            items: value.items().iter().map(OrderItemPayload::from).collect(),
            tracking_carrier: value.tracking_carrier().map(str::to_owned),
            tracking_number: value.tracking_number().map(str::to_owned),
            created_at: value.created_at(),
        }
    }
}

/// Serialisable order header for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryPayload {
    /// Order identifier.
    pub id: Uuid,
    /// Settled total after any discount.
    pub total: BigDecimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// How the order was paid.
    pub payment_mode: PaymentMode,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<OrderSummary> for OrderSummaryPayload {
    fn from(value: OrderSummary) -> Self {
        Self {
            id: value.id,
            total: value.total,
            status: value.status,
            payment_mode: value.payment_mode,
            created_at: value.created_at,
        }
    }
}

/// Request to read one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrderRequest {
    /// Requesting customer; only the owner may read an order.
    pub customer_id: UserId,
    /// Order to read.
    pub order_id: Uuid,
}

/// Request to list a customer's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrdersRequest {
    /// Requesting customer.
    pub customer_id: UserId,
}

/// Driving port for order read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersQuery: Send + Sync {
    /// Read one order with items; not-found when absent or owned by someone
    /// else.
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderPayload, Error>;

    /// List the customer's order headers, newest first.
    async fn list_orders(&self, request: ListOrdersRequest)
        -> Result<Vec<OrderSummaryPayload>, Error>;
}

/// Fixture query returning a deterministic sample order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrdersQuery;

fn fixture_order(customer_id: UserId, order_id: Uuid) -> OrderPayload {
    OrderPayload {
        id: order_id,
        customer_id,
        total: BigDecimal::from(250),
        status: OrderStatus::Paid,
        payment_mode: PaymentMode::Simulated,
        shipping_address: AddressSnapshot {
            recipient: "Ada Lovelace".to_owned(),
            line1: "1 Analytical Way".to_owned(),
            line2: None,
            city: "London".to_owned(),
            postal_code: "N1 9GU".to_owned(),
            country: "GB".to_owned(),
        },
        items: vec![OrderItemPayload {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 1,
            unit_price: BigDecimal::from(250),
        }],
        tracking_carrier: None,
        tracking_number: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl OrdersQuery for FixtureOrdersQuery {
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderPayload, Error> {
        Ok(fixture_order(request.customer_id, request.order_id))
    }

    async fn list_orders(
        &self,
        request: ListOrdersRequest,
    ) -> Result<Vec<OrderSummaryPayload>, Error> {
        let order = fixture_order(request.customer_id, Uuid::new_v4());
        Ok(vec![OrderSummaryPayload {
            id: order.id,
            total: order.total,
            status: order.status,
            payment_mode: order.payment_mode,
            created_at: order.created_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_get_echoes_requested_ids() {
        let customer = UserId::random();
        let order_id = Uuid::new_v4();
        let payload = FixtureOrdersQuery
            .get_order(GetOrderRequest {
                customer_id: customer.clone(),
                order_id,
            })
            .await
            .expect("fixture read succeeds");

        assert_eq!(payload.id, order_id);
        assert_eq!(payload.customer_id, customer);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_list_returns_one_header() {
        let listed = FixtureOrdersQuery
            .list_orders(ListOrdersRequest {
                customer_id: UserId::random(),
            })
            .await
            .expect("fixture list succeeds");
        assert_eq!(listed.len(), 1);
    }
}
