//! Driving port for order placement.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, PaymentMode, UserId};

/// One cart line in a placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    /// Product to purchase.
    pub product_id: Uuid,
    /// Units to purchase.
    pub quantity: i32,
}

/// Request to place an order.
///
/// Carries the authenticated customer explicitly; no prices, because the
/// settlement transaction computes them from the product store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Customer placing the order.
    pub customer_id: UserId,
    /// Cart lines.
    pub lines: Vec<OrderLinePayload>,
    /// Shipping address to snapshot.
    pub address_id: Uuid,
    /// How the order is paid.
    pub payment_mode: PaymentMode,
    /// Optional coupon code.
    pub coupon_code: Option<String>,
}

/// Response from placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// Identifier of the new order.
    pub order_id: Uuid,
    /// Authoritative total the order settled at.
    pub total: BigDecimal,
}

/// Driving port for the order settlement use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutCommand: Send + Sync {
    /// Place an order atomically; on any failure nothing is persisted.
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, Error>;
}

/// Unit price the fixture settles every line at.
pub const FIXTURE_UNIT_PRICE: u32 = 100;

/// Fixture command for tests that do not exercise persistence.
///
/// Settles every line at [`FIXTURE_UNIT_PRICE`] and ignores coupons, after
/// running the same payload validation as the real service.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCheckoutCommand;

#[async_trait]
impl CheckoutCommand for FixtureCheckoutCommand {
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, Error> {
        crate::domain::validate_place_order(&request)?;
        let units: i64 = request
            .lines
            .iter()
            .map(|line| i64::from(line.quantity))
            .sum();
        Ok(PlaceOrderResponse {
            order_id: Uuid::new_v4(),
            total: BigDecimal::from(units * i64::from(FIXTURE_UNIT_PRICE)),
        })
    }
}
