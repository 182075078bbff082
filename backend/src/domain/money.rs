//! Monetary arithmetic for settlement.
//!
//! All amounts are [`BigDecimal`]; floats never touch money. Totals are
//! computed server-side from prices read inside the settlement transaction,
//! so client-supplied amounts are display hints only.

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;

/// Scale used for settled amounts (two decimal places).
pub const MONEY_SCALE: i64 = 2;

/// The unit price a line settles at: the sale price when one is set,
/// otherwise the base price.
pub fn effective_unit_price(base_price: &BigDecimal, sale_price: Option<&BigDecimal>) -> BigDecimal {
    sale_price.unwrap_or(base_price).clone()
}

/// Total for one line: unit price times quantity.
pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    unit_price * BigDecimal::from(quantity)
}

/// Sum of line totals before any discount.
pub fn lines_total<'a, I>(lines: I) -> BigDecimal
where
    I: IntoIterator<Item = (&'a BigDecimal, i32)>,
{
    lines
        .into_iter()
        .map(|(unit_price, quantity)| line_total(unit_price, quantity))
        .sum()
}

/// Apply a percentage discount and normalise to [`MONEY_SCALE`].
///
/// `discount_percentage` is expected in `[0, 100]`; the coupon constructor
/// enforces the range before a percentage ever reaches settlement.
pub fn apply_discount(total: &BigDecimal, discount_percentage: &BigDecimal) -> BigDecimal {
    let hundred = BigDecimal::from(100);
    let discounted = total * (&hundred - discount_percentage) / hundred;
    discounted.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}
