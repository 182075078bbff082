//! Coupon HTTP handlers.
//!
//! ```text
//! GET /api/v1/coupons/{code}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckCouponRequest, CouponStatusPayload};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Coupon status response payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponStatusBody {
    pub code: String,
    /// Discount percentage as a decimal string, e.g. `"10"`.
    pub discount_percentage: String,
    pub redeemable: bool,
    pub remaining_uses: i32,
    #[schema(format = "date-time")]
    pub expires_at: Option<String>,
}

impl From<CouponStatusPayload> for CouponStatusBody {
    fn from(value: CouponStatusPayload) -> Self {
        Self {
            code: value.code,
            discount_percentage: value.discount_percentage.to_string(),
            redeemable: value.redeemable,
            remaining_uses: value.remaining_uses,
            expires_at: value.expires_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// Check a coupon code without consuming a use.
///
/// Carts call this to preview a discount; redemption only happens inside
/// order settlement.
#[utoipa::path(
    get,
    path = "/api/v1/coupons/{code}",
    params(("code" = String, Path, description = "Coupon code")),
    responses(
        (status = 200, description = "Coupon status", body = CouponStatusBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown coupon", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "checkCoupon"
)]
#[get("/coupons/{code}")]
pub async fn check_coupon(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CouponStatusBody>> {
    session.require_user_id()?;
    let status = state
        .coupons
        .check_coupon(CheckCouponRequest {
            code: path.into_inner(),
        })
        .await?;
    Ok(web::Json(CouponStatusBody::from(status)))
}
