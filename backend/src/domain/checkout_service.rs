//! Checkout domain service: the driving side of order settlement.
//!
//! Validates the placement payload, hands a price-free draft to the order
//! repository (the transaction computes authoritative prices itself), and
//! maps repository failures onto transport-agnostic errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CheckoutCommand, OrderRepository, OrderRepositoryError, PlaceOrderRequest, PlaceOrderResponse,
    SettlementDraft, SettlementLine,
};
use crate::domain::Error;

/// Validate a placement payload before it reaches the settlement transaction.
///
/// Shared with the fixture command so handler tests exercise the same rules
/// as production wiring.
pub fn validate_place_order(request: &PlaceOrderRequest) -> Result<(), Error> {
    if request.lines.is_empty() {
        return Err(Error::invalid_request("order must contain at least one item")
            .with_details(json!({ "field": "items", "code": "empty_items" })));
    }
    for (index, line) in request.lines.iter().enumerate() {
        if line.quantity <= 0 {
            return Err(
                Error::invalid_request("item quantity must be positive").with_details(json!({
                    "field": "items",
                    "index": index,
                    "value": line.quantity,
                    "code": "non_positive_quantity",
                })),
            );
        }
    }
    if let Some(code) = request.coupon_code.as_deref() {
        if code.trim().is_empty() {
            return Err(Error::invalid_request("coupon code must not be blank")
                .with_details(json!({ "field": "couponCode", "code": "blank_coupon_code" })));
        }
    }
    Ok(())
}

fn map_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        // Not-owned maps to not-found so the response does not reveal whether
        // a foreign address id exists.
        OrderRepositoryError::AddressNotFound | OrderRepositoryError::AddressNotOwned => {
            Error::not_found("shipping address not found")
                .with_details(json!({ "field": "addressId", "code": "address_not_found" }))
        }
        OrderRepositoryError::CouponNotRedeemable => {
            Error::invalid_request("coupon is not redeemable").with_details(
                json!({ "field": "couponCode", "code": "coupon_not_redeemable" }),
            )
        }
        OrderRepositoryError::ProductNotFound { product_id } => {
            Error::invalid_request("cart references an unknown product").with_details(json!({
                "field": "items",
                "productId": product_id.to_string(),
                "code": "unknown_product",
            }))
        }
        OrderRepositoryError::InsufficientStock { product_id } => {
            Error::conflict("insufficient stock for a cart item").with_details(json!({
                "field": "items",
                "productId": product_id.to_string(),
                "code": "insufficient_stock",
            }))
        }
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

/// Checkout service implementing the placement driving port.
#[derive(Clone)]
pub struct CheckoutService<R> {
    order_repo: Arc<R>,
}

impl<R> CheckoutService<R> {
    /// Create a new checkout service over the order repository.
    pub fn new(order_repo: Arc<R>) -> Self {
        Self { order_repo }
    }
}

#[async_trait]
impl<R> CheckoutCommand for CheckoutService<R>
where
    R: OrderRepository,
{
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlaceOrderResponse, Error> {
        validate_place_order(&request)?;

        let draft = SettlementDraft {
            customer_id: request.customer_id,
            lines: request
                .lines
                .iter()
                .map(|line| SettlementLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
            address_id: request.address_id,
            payment_mode: request.payment_mode,
            coupon_code: request.coupon_code,
        };

        let outcome = self
            .order_repo
            .settle(&draft)
            .await
            .map_err(map_repository_error)?;

        Ok(PlaceOrderResponse {
            order_id: outcome.order_id,
            total: outcome.total,
        })
    }
}

#[cfg(test)]
#[path = "checkout_service_tests.rs"]
mod tests;
