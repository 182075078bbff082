//! Coupon entity and the redeemability rule.
//!
//! Redemption itself happens as a single conditional UPDATE inside the
//! settlement transaction; this entity exists so the rule the SQL predicate
//! encodes is stated once in the domain and unit-testable, and so the
//! read-only coupon check endpoint can report status to carts.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

/// Validation errors raised by [`Coupon::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponValidationError {
    /// Codes are non-blank.
    #[error("coupon code must not be blank")]
    BlankCode,
    /// Discount percentage must sit in `[0, 100]`.
    #[error("discount percentage must be between 0 and 100")]
    DiscountOutOfRange,
    /// Usage counters are non-negative and capped.
    #[error("current uses {current_uses} exceeds max uses {max_uses}")]
    UsesExceedCap {
        /// Recorded redemptions.
        current_uses: i32,
        /// Redemption cap.
        max_uses: i32,
    },
}

/// A discount code with a usage cap.
///
/// Invariant: `current_uses <= max_uses`. The settlement transaction
/// preserves it by only incrementing through a compare-and-increment
/// statement; rows violating it are rejected here when read back.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    code: String,
    discount_percentage: BigDecimal,
    max_uses: i32,
    current_uses: i32,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
}

/// Unvalidated coupon input.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponDraft {
    /// Unique code customers type in.
    pub code: String,
    /// Percentage taken off the order total.
    pub discount_percentage: BigDecimal,
    /// Redemption cap.
    pub max_uses: i32,
    /// Redemptions so far.
    pub current_uses: i32,
    /// Expiry; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the coupon is enabled at all.
    pub active: bool,
}

impl Coupon {
    /// Validate and construct a coupon.
    pub fn new(draft: CouponDraft) -> Result<Self, CouponValidationError> {
        if draft.code.trim().is_empty() {
            return Err(CouponValidationError::BlankCode);
        }
        let zero = BigDecimal::from(0);
        let hundred = BigDecimal::from(100);
        if draft.discount_percentage < zero || draft.discount_percentage > hundred {
            return Err(CouponValidationError::DiscountOutOfRange);
        }
        if draft.current_uses < 0 || draft.current_uses > draft.max_uses {
            return Err(CouponValidationError::UsesExceedCap {
                current_uses: draft.current_uses,
                max_uses: draft.max_uses,
            });
        }
        Ok(Self {
            code: draft.code,
            discount_percentage: draft.discount_percentage,
            max_uses: draft.max_uses,
            current_uses: draft.current_uses,
            expires_at: draft.expires_at,
            active: draft.active,
        })
    }

    /// Unique code customers type in.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Percentage taken off the order total.
    pub fn discount_percentage(&self) -> &BigDecimal {
        &self.discount_percentage
    }

    /// Redemption cap.
    pub fn max_uses(&self) -> i32 {
        self.max_uses
    }

    /// Redemptions so far.
    pub fn current_uses(&self) -> i32 {
        self.current_uses
    }

    /// Expiry; `None` never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the coupon is enabled at all.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether a redemption at `now` would succeed.
    ///
    /// Mirrors the predicate of the settlement transaction's conditional
    /// update: active, unexpired, and below the usage cap.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.expires_at.is_none_or(|expiry| now < expiry)
            && self.current_uses < self.max_uses
    }
}
