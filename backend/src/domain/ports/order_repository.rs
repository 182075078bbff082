//! Driven port for order settlement and order reads.
//!
//! Settlement is the one write path in this crate: a single transaction that
//! resolves the shipping address, redeems the coupon, prices and decrements
//! stock, and inserts the order with its items. The adapter must guarantee
//! that a failure at any step leaves no partial effects.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::{Order, OrderSummary, PaymentMode, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    ///
    /// The first five variants abort the settlement transaction with a
    /// business outcome; `Connection` and `Query` are infrastructure faults.
    pub enum OrderRepositoryError {
        /// No address row matched the requested id.
        AddressNotFound =>
            "shipping address not found",
        /// The address exists but belongs to another user.
        AddressNotOwned =>
            "shipping address belongs to another user",
        /// The coupon code matched no redeemable row (missing, inactive,
        /// expired, or exhausted; deliberately undifferentiated).
        CouponNotRedeemable =>
            "coupon is not redeemable",
        /// A cart line referenced a product that does not exist.
        ProductNotFound { product_id: Uuid } =>
            "product {product_id} not found",
        /// A cart line asked for more units than are in stock.
        InsufficientStock { product_id: Uuid } =>
            "insufficient stock for product {product_id}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
    }
}

/// One cart line submitted for settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLine {
    /// Product to purchase.
    pub product_id: Uuid,
    /// Units to purchase; validated positive before reaching the adapter.
    pub quantity: i32,
}

/// Everything the settlement transaction needs, with the authenticated
/// customer passed explicitly rather than read from ambient state.
///
/// Prices and the total are deliberately absent: the adapter reads prices
/// inside the transaction and computes the authoritative total itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementDraft {
    /// Customer placing the order.
    pub customer_id: UserId,
    /// Cart lines; validated non-empty before reaching the adapter.
    pub lines: Vec<SettlementLine>,
    /// Shipping address to snapshot.
    pub address_id: Uuid,
    /// How the order is paid.
    pub payment_mode: PaymentMode,
    /// Optional coupon code to redeem atomically with the order.
    pub coupon_code: Option<String>,
}

/// What a committed settlement produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    /// Identifier of the new order.
    pub order_id: Uuid,
    /// Authoritative total the order settled at.
    pub total: BigDecimal,
}

/// Port for the order settlement transaction and customer-scoped reads.
///
/// Settlement is not idempotent: submitting the same draft twice creates two
/// orders and decrements stock twice. Nothing partial survives a failure, so
/// retrying after an error is safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Atomically place an order: snapshot the address, redeem the coupon,
    /// decrement stock with a floor check, and insert the order and items.
    async fn settle(
        &self,
        draft: &SettlementDraft,
    ) -> Result<SettlementOutcome, OrderRepositoryError>;

    /// Load one order with items, scoped to its owning customer.
    async fn find_for_customer(
        &self,
        customer_id: &UserId,
        order_id: Uuid,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// List a customer's order headers, newest first.
    async fn list_for_customer(
        &self,
        customer_id: &UserId,
    ) -> Result<Vec<OrderSummary>, OrderRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn insufficient_stock_names_the_product() {
        let id = Uuid::new_v4();
        let err = OrderRepositoryError::insufficient_stock(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[rstest]
    fn connection_error_carries_message() {
        let err = OrderRepositoryError::connection("connection refused");
        assert!(matches!(err, OrderRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}
