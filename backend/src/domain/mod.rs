//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed marketplace entities used by the API
//! and persistence layers, plus the services that implement the driving
//! ports over them. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — API error response payload and stable identifiers.
//! - UserId / Role / LoginCredentials — authenticated identity.
//! - Order aggregate and OrderSummary — settled orders and listing headers.
//! - Coupon — percentage discount with usage cap and expiry.
//! - money — shared settlement arithmetic.
//! - CheckoutService / OrdersQueryService / CouponsQueryService — driving
//!   port implementations over the repository ports.

pub mod checkout_service;
pub mod coupon;
pub mod coupons_service;
pub mod error;
pub mod money;
pub mod order;
pub mod orders_service;
pub mod ports;
pub mod user;

pub use self::checkout_service::{validate_place_order, CheckoutService};
pub use self::coupon::{Coupon, CouponDraft, CouponValidationError};
pub use self::coupons_service::CouponsQueryService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::order::{
    AddressSnapshot, Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus, OrderSummary,
    OrderValidationError, PaymentMode,
};
pub use self::orders_service::OrdersQueryService;
pub use self::user::{LoginCredentials, LoginValidationError, Role, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use market_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
