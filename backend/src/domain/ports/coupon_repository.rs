//! Driven port for read-only coupon lookups.
//!
//! Redemption never goes through this port; it is a conditional update inside
//! the settlement transaction. This port backs the cart-facing coupon check.

use async_trait::async_trait;

use crate::domain::Coupon;

use super::define_port_error;

define_port_error! {
    /// Errors raised by coupon repository adapters.
    pub enum CouponRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "coupon repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "coupon repository query failed: {message}",
    }
}

/// Port for reading coupons by code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Find a coupon by its exact code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponRepositoryError>;
}
