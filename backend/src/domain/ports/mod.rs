//! Domain ports: driving use-case traits and driven repository traits.
//!
//! Driving ports (`CheckoutCommand`, `OrdersQuery`, `CouponsQuery`) are what
//! inbound adapters call; driven ports (`OrderRepository`,
//! `CouponRepository`) are what outbound adapters implement. Fixture
//! implementations back handler tests without I/O.

mod checkout_command;
mod coupon_repository;
mod coupons_query;
mod macros;
mod order_repository;
mod orders_query;

pub(crate) use macros::define_port_error;

pub use checkout_command::{
    CheckoutCommand, FixtureCheckoutCommand, OrderLinePayload, PlaceOrderRequest,
    PlaceOrderResponse, FIXTURE_UNIT_PRICE,
};
pub use coupon_repository::{CouponRepository, CouponRepositoryError};
pub use coupons_query::{CheckCouponRequest, CouponStatusPayload, CouponsQuery, FixtureCouponsQuery};
pub use order_repository::{
    OrderRepository, OrderRepositoryError, SettlementDraft, SettlementLine, SettlementOutcome,
};
pub use orders_query::{
    FixtureOrdersQuery, GetOrderRequest, ListOrdersRequest, OrderItemPayload, OrderPayload,
    OrderSummaryPayload, OrdersQuery,
};

#[cfg(test)]
pub use checkout_command::MockCheckoutCommand;
#[cfg(test)]
pub use coupon_repository::MockCouponRepository;
#[cfg(test)]
pub use coupons_query::MockCouponsQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use orders_query::MockOrdersQuery;
