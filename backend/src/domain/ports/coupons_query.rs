//! Driving port for the cart-facing coupon check.
//!
//! Read-only: carts call this to preview a discount before checkout. It never
//! consumes a use; redemption happens inside the settlement transaction.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Request to check a coupon code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCouponRequest {
    /// Code as typed by the customer.
    pub code: String,
}

/// Coupon status reported to carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponStatusPayload {
    /// Coupon code.
    pub code: String,
    /// Percentage the coupon takes off the total.
    pub discount_percentage: BigDecimal,
    /// Whether a redemption right now would succeed.
    pub redeemable: bool,
    /// Uses left under the cap.
    pub remaining_uses: i32,
    /// Expiry; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Driving port for coupon status reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponsQuery: Send + Sync {
    /// Report the status of a coupon code; not-found for unknown codes.
    async fn check_coupon(&self, request: CheckCouponRequest)
        -> Result<CouponStatusPayload, Error>;
}

/// Fixture query knowing a single redeemable `SAVE10` coupon.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCouponsQuery;

#[async_trait]
impl CouponsQuery for FixtureCouponsQuery {
    async fn check_coupon(
        &self,
        request: CheckCouponRequest,
    ) -> Result<CouponStatusPayload, Error> {
        if request.code == "SAVE10" {
            Ok(CouponStatusPayload {
                code: request.code,
                discount_percentage: BigDecimal::from(10),
                redeemable: true,
                remaining_uses: 1,
                expires_at: None,
            })
        } else {
            Err(Error::not_found(format!("coupon {} not found", request.code)))
        }
    }
}
