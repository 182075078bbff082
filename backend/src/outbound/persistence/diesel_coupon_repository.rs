//! PostgreSQL-backed `CouponRepository` implementation using Diesel ORM.
//!
//! Read-only: carts check coupon status here; redemption happens inside the
//! settlement transaction with a compare-and-increment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CouponRepository, CouponRepositoryError};
use crate::domain::{Coupon, CouponDraft};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CouponRow;
use super::pool::{DbPool, PoolError};
use super::schema::coupons;

/// Diesel-backed implementation of the coupon repository port.
#[derive(Clone)]
pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> CouponRepositoryError {
    map_basic_pool_error(error, CouponRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> CouponRepositoryError {
    map_basic_diesel_error(
        error,
        CouponRepositoryError::query,
        CouponRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain coupon.
fn row_to_coupon(row: CouponRow) -> Result<Coupon, CouponRepositoryError> {
    let CouponRow {
        code,
        discount_percentage,
        max_uses,
        current_uses,
        expires_at,
        active,
    } = row;

    Coupon::new(CouponDraft {
        code,
        discount_percentage,
        max_uses,
        current_uses,
        expires_at,
        active,
    })
    .map_err(|err| CouponRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CouponRepository for DieselCouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = coupons::table
            .filter(coupons::code.eq(code))
            .select(CouponRow::as_select())
            .first::<CouponRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coupon).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; queries need a live database.

    use bigdecimal::BigDecimal;
    use rstest::rstest;

    use super::*;

    fn sample_row() -> CouponRow {
        CouponRow {
            code: "SAVE10".to_owned(),
            discount_percentage: BigDecimal::from(10),
            max_uses: 100,
            current_uses: 3,
            expires_at: None,
            active: true,
        }
    }

    #[rstest]
    fn valid_rows_convert_to_domain_coupons() {
        let coupon = row_to_coupon(sample_row()).expect("valid row converts");
        assert_eq!(coupon.code(), "SAVE10");
        assert_eq!(coupon.current_uses(), 3);
    }

    #[rstest]
    fn corrupt_rows_surface_as_query_errors() {
        let mut row = sample_row();
        row.discount_percentage = BigDecimal::from(250);
        let err = row_to_coupon(row).expect_err("out-of-range discount rejected");
        assert!(matches!(err, CouponRepositoryError::Query { .. }));
    }
}
