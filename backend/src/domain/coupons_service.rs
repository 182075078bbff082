//! Coupon status domain service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CheckCouponRequest, CouponRepository, CouponRepositoryError, CouponStatusPayload, CouponsQuery,
};
use crate::domain::Error;

fn map_repository_error(error: CouponRepositoryError) -> Error {
    match error {
        CouponRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("coupon repository unavailable: {message}"))
        }
        CouponRepositoryError::Query { message } => {
            Error::internal(format!("coupon repository error: {message}"))
        }
    }
}

/// Coupon query service implementing the cart-facing check port.
#[derive(Clone)]
pub struct CouponsQueryService<R> {
    coupon_repo: Arc<R>,
}

impl<R> CouponsQueryService<R> {
    /// Create a new query service over the coupon repository.
    pub fn new(coupon_repo: Arc<R>) -> Self {
        Self { coupon_repo }
    }
}

#[async_trait]
impl<R> CouponsQuery for CouponsQueryService<R>
where
    R: CouponRepository,
{
    async fn check_coupon(
        &self,
        request: CheckCouponRequest,
    ) -> Result<CouponStatusPayload, Error> {
        let coupon = self
            .coupon_repo
            .find_by_code(&request.code)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("coupon {} not found", request.code)))?;

        Ok(CouponStatusPayload {
            code: coupon.code().to_owned(),
            discount_percentage: coupon.discount_percentage().clone(),
            redeemable: coupon.is_redeemable(Utc::now()),
            remaining_uses: coupon.max_uses() - coupon.current_uses(),
            expires_at: coupon.expires_at(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use bigdecimal::BigDecimal;
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockCouponRepository;
    use crate::domain::{Coupon, CouponDraft, ErrorCode};

    fn coupon(current_uses: i32, active: bool) -> Coupon {
        Coupon::new(CouponDraft {
            code: "SAVE10".to_owned(),
            discount_percentage: BigDecimal::from(10),
            max_uses: 5,
            current_uses,
            expires_at: Some(Utc::now() + Duration::days(7)),
            active,
        })
        .expect("valid coupon")
    }

    #[rstest]
    #[case::fresh(0, true, true, 5)]
    #[case::exhausted(5, true, false, 0)]
    #[case::inactive(0, false, false, 5)]
    #[tokio::test]
    async fn check_reports_redeemability(
        #[case] current_uses: i32,
        #[case] active: bool,
        #[case] expected_redeemable: bool,
        #[case] expected_remaining: i32,
    ) {
        let mut repo = MockCouponRepository::new();
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(coupon(current_uses, active))));

        let status = CouponsQueryService::new(Arc::new(repo))
            .check_coupon(CheckCouponRequest {
                code: "SAVE10".to_owned(),
            })
            .await
            .expect("coupon found");

        assert_eq!(status.redeemable, expected_redeemable);
        assert_eq!(status.remaining_uses, expected_remaining);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_code_maps_to_not_found() {
        let mut repo = MockCouponRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let err = CouponsQueryService::new(Arc::new(repo))
            .check_coupon(CheckCouponRequest {
                code: "NOPE".to_owned(),
            })
            .await
            .expect_err("unknown code");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failure_maps_to_service_unavailable() {
        let mut repo = MockCouponRepository::new();
        repo.expect_find_by_code()
            .returning(|_| Err(CouponRepositoryError::connection("refused")));

        let err = CouponsQueryService::new(Arc::new(repo))
            .check_coupon(CheckCouponRequest {
                code: "SAVE10".to_owned(),
            })
            .await
            .expect_err("connection failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
