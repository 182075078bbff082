//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Settlement runs as a single database transaction: resolve and snapshot the
//! shipping address, redeem the coupon with a compare-and-increment, read
//! prices under row locks, decrement stock with a floor guard, and insert the
//! order with its items. An error at any step rolls the whole thing back.

use async_trait::async_trait;
use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    OrderRepository, OrderRepositoryError, SettlementDraft, SettlementLine, SettlementOutcome,
};
use crate::domain::{
    money, AddressSnapshot, Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus,
    OrderSummary, PaymentMode, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AddressRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductPricingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{addresses, coupons, order_items, orders, products};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

/// Error type threaded through the settlement transaction closure.
///
/// `Abort` carries a typed business outcome that must roll the transaction
/// back; `Diesel` is an infrastructure failure. The `From` impl lets `?`
/// promote raw Diesel errors inside the closure.
#[derive(Debug)]
enum TxError {
    Abort(OrderRepositoryError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_tx_error(error: TxError) -> OrderRepositoryError {
    match error {
        TxError::Abort(err) => err,
        TxError::Diesel(err) => map_diesel_error(err),
    }
}

/// A cart line with the unit price settlement decided on.
struct PricedLine {
    product_id: Uuid,
    quantity: i32,
    unit_price: BigDecimal,
}

/// Load the shipping address and verify the customer owns it.
///
/// A foreign address reads the same as a missing one so settlement does not
/// confirm other customers' address ids.
async fn load_owned_address(
    conn: &mut AsyncPgConnection,
    customer_id: &UserId,
    address_id: Uuid,
) -> Result<AddressRow, TxError> {
    let row = addresses::table
        .filter(addresses::id.eq(address_id))
        .select(AddressRow::as_select())
        .first::<AddressRow>(conn)
        .await
        .optional()?
        .ok_or(TxError::Abort(OrderRepositoryError::address_not_found()))?;

    if row.user_id != *customer_id.as_uuid() {
        return Err(TxError::Abort(OrderRepositoryError::address_not_owned()));
    }
    Ok(row)
}

/// Redeem one use of a coupon and return its discount percentage.
///
/// The compare-and-increment runs as a single conditional UPDATE so two
/// concurrent settlements can never push `current_uses` past `max_uses`.
/// Zero rows updated means the code was missing, inactive, expired, or
/// exhausted; the variants are deliberately collapsed.
async fn redeem_coupon(conn: &mut AsyncPgConnection, code: &str) -> Result<BigDecimal, TxError> {
    let now = Utc::now();
    let discount = diesel::update(
        coupons::table.filter(
            coupons::code
                .eq(code)
                .and(coupons::active.eq(true))
                .and(coupons::expires_at.is_null().or(coupons::expires_at.gt(now)))
                .and(coupons::current_uses.lt(coupons::max_uses)),
        ),
    )
    .set(coupons::current_uses.eq(coupons::current_uses + 1))
    .returning(coupons::discount_percentage)
    .get_result::<BigDecimal>(conn)
    .await
    .optional()?;

    discount.ok_or(TxError::Abort(OrderRepositoryError::coupon_not_redeemable()))
}

/// Visit cart lines in a stable order so two carts holding overlapping
/// products always lock their rows in the same sequence and cannot deadlock.
fn lock_order(lines: &[SettlementLine]) -> Vec<&SettlementLine> {
    let mut ordered: Vec<&SettlementLine> = lines.iter().collect();
    ordered.sort_unstable_by_key(|line| line.product_id);
    ordered
}

/// Price each line from the product store and reserve its stock.
///
/// Prices are read under `FOR UPDATE` row locks; the decrement carries a
/// `stock >= quantity` guard so the counter never goes negative.
async fn price_and_reserve_lines(
    conn: &mut AsyncPgConnection,
    lines: &[SettlementLine],
) -> Result<Vec<PricedLine>, TxError> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lock_order(lines) {
        let product = products::table
            .filter(products::id.eq(line.product_id))
            .select(ProductPricingRow::as_select())
            .for_update()
            .first::<ProductPricingRow>(conn)
            .await
            .optional()?
            .ok_or(TxError::Abort(OrderRepositoryError::product_not_found(
                line.product_id,
            )))?;

        // The row is locked, so this read cannot go stale before the update.
        if product.stock < line.quantity {
            return Err(TxError::Abort(OrderRepositoryError::insufficient_stock(
                line.product_id,
            )));
        }

        let updated = diesel::update(
            products::table.filter(
                products::id
                    .eq(line.product_id)
                    .and(products::stock.ge(line.quantity)),
            ),
        )
        .set(products::stock.eq(products::stock - line.quantity))
        .execute(conn)
        .await?;
        if updated == 0 {
            return Err(TxError::Abort(OrderRepositoryError::insufficient_stock(
                line.product_id,
            )));
        }

        priced.push(PricedLine {
            product_id: product.id,
            quantity: line.quantity,
            unit_price: money::effective_unit_price(
                &product.base_price,
                product.sale_price.as_ref(),
            ),
        });
    }
    Ok(priced)
}

/// Authoritative total: priced lines summed, discount applied, normalised to
/// two decimal places.
fn compute_total(lines: &[PricedLine], discount: Option<&BigDecimal>) -> BigDecimal {
    let subtotal = money::lines_total(lines.iter().map(|line| (&line.unit_price, line.quantity)));
    match discount {
        Some(pct) => money::apply_discount(&subtotal, pct),
        None => subtotal.with_scale_round(money::MONEY_SCALE, RoundingMode::HalfUp),
    }
}

async fn insert_order(
    conn: &mut AsyncPgConnection,
    draft: &SettlementDraft,
    address: &AddressRow,
    total: &BigDecimal,
    lines: &[PricedLine],
) -> Result<SettlementOutcome, TxError> {
    let order_id = Uuid::new_v4();
    let order_row = NewOrderRow {
        id: order_id,
        customer_id: *draft.customer_id.as_uuid(),
        total,
        status: OrderStatus::Paid.as_str(),
        payment_mode: draft.payment_mode.as_str(),
        coupon_code: draft.coupon_code.as_deref(),
        ship_recipient: &address.recipient,
        ship_line1: &address.line1,
        ship_line2: address.line2.as_deref(),
        ship_city: &address.city,
        ship_postal_code: &address.postal_code,
        ship_country: &address.country,
    };
    diesel::insert_into(orders::table)
        .values(&order_row)
        .execute(conn)
        .await?;

    let item_rows: Vec<NewOrderItemRow<'_>> = lines
        .iter()
        .map(|line| NewOrderItemRow {
            id: Uuid::new_v4(),
            order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: &line.unit_price,
        })
        .collect();
    diesel::insert_into(order_items::table)
        .values(&item_rows)
        .execute(conn)
        .await?;

    Ok(SettlementOutcome {
        order_id,
        total: total.clone(),
    })
}

/// Convert database rows into a validated domain order.
fn row_to_order(row: OrderRow, item_rows: Vec<OrderItemRow>) -> Result<Order, OrderRepositoryError> {
    let OrderRow {
        id,
        customer_id,
        total,
        status,
        payment_mode,
        ship_recipient,
        ship_line1,
        ship_line2,
        ship_city,
        ship_postal_code,
        ship_country,
        tracking_carrier,
        tracking_number,
        created_at,
    } = row;

    let status: OrderStatus = status
        .parse()
        .map_err(|err: crate::domain::OrderValidationError| {
            OrderRepositoryError::query(err.to_string())
        })?;
    let payment_mode: PaymentMode = payment_mode
        .parse()
        .map_err(|()| OrderRepositoryError::query(format!("unknown payment mode for order {id}")))?;

    let items = item_rows
        .into_iter()
        .map(|item| {
            OrderItem::new(OrderItemDraft {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| OrderRepositoryError::query(err.to_string()))?;

    Order::new(OrderDraft {
        id,
        customer_id: UserId::from_uuid(customer_id),
        total,
        status,
        payment_mode,
        shipping_address: AddressSnapshot {
            recipient: ship_recipient,
            line1: ship_line1,
            line2: ship_line2,
            city: ship_city,
            postal_code: ship_postal_code,
            country: ship_country,
        },
        items,
        tracking_carrier,
        tracking_number,
        created_at,
    })
    .map_err(|err| OrderRepositoryError::query(err.to_string()))
}

/// Convert an order row into a listing header.
fn row_to_summary(row: OrderRow) -> Result<OrderSummary, OrderRepositoryError> {
    let status: OrderStatus = row
        .status
        .parse()
        .map_err(|err: crate::domain::OrderValidationError| {
            OrderRepositoryError::query(err.to_string())
        })?;
    let payment_mode: PaymentMode = row.payment_mode.parse().map_err(|()| {
        OrderRepositoryError::query(format!("unknown payment mode for order {}", row.id))
    })?;

    Ok(OrderSummary {
        id: row.id,
        total: row.total,
        status,
        payment_mode,
        created_at: row.created_at,
    })
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn settle(
        &self,
        draft: &SettlementDraft,
    ) -> Result<SettlementOutcome, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<SettlementOutcome, TxError, _>(|conn| {
            async move {
                let address =
                    load_owned_address(conn, &draft.customer_id, draft.address_id).await?;
                let discount = match draft.coupon_code.as_deref() {
                    Some(code) => Some(redeem_coupon(conn, code).await?),
                    None => None,
                };
                let lines = price_and_reserve_lines(conn, &draft.lines).await?;
                let total = compute_total(&lines, discount.as_ref());
                insert_order(conn, draft, &address, &total, &lines).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn find_for_customer(
        &self,
        customer_id: &UserId,
        order_id: Uuid,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = orders::table
            .filter(
                orders::id
                    .eq(order_id)
                    .and(orders::customer_id.eq(customer_id.as_uuid())),
            )
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows: Vec<OrderItemRow> = order_items::table
            .filter(order_items::order_id.eq(row.id))
            .order(order_items::id.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_order(row, item_rows).map(Some)
    }

    async fn list_for_customer(
        &self,
        customer_id: &UserId,
    ) -> Result<Vec<OrderSummary>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::customer_id.eq(customer_id.as_uuid()))
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Conversion and arithmetic coverage; transaction behaviour itself needs
    //! a live database and lives in `tests/diesel_order_repository.rs`.

    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).expect("decimal literal")
    }

    fn priced(quantity: i32, unit_price: &str) -> PricedLine {
        PricedLine {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: dec(unit_price),
        }
    }

    fn sample_order_row() -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            total: dec("225.00"),
            status: "PAID".to_owned(),
            payment_mode: "card".to_owned(),
            ship_recipient: "Amina Okafor".to_owned(),
            ship_line1: "12 Weaver Lane".to_owned(),
            ship_line2: None,
            ship_city: "Jaipur".to_owned(),
            ship_postal_code: "302001".to_owned(),
            ship_country: "IN".to_owned(),
            tracking_carrier: None,
            tracking_number: None,
            created_at: Utc::now(),
        }
    }

    fn sample_item_row() -> OrderItemRow {
        OrderItemRow {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 2,
            unit_price: dec("100"),
        }
    }

    #[rstest]
    fn lock_order_sorts_lines_by_product_id() {
        let later = SettlementLine {
            product_id: Uuid::from_u128(2),
            quantity: 1,
        };
        let earlier = SettlementLine {
            product_id: Uuid::from_u128(1),
            quantity: 3,
        };
        let lines = vec![later.clone(), earlier.clone()];
        assert_eq!(lock_order(&lines), vec![&earlier, &later]);
    }

    #[rstest]
    fn compute_total_sums_without_discount_at_money_scale() {
        let lines = [priced(2, "100"), priced(1, "50")];
        assert_eq!(compute_total(&lines, None), dec("250.00"));
    }

    #[rstest]
    fn compute_total_applies_the_discount() {
        let lines = [priced(2, "100"), priced(1, "50")];
        assert_eq!(compute_total(&lines, Some(&dec("10"))), dec("225.00"));
    }

    #[rstest]
    fn row_to_order_builds_the_domain_aggregate() {
        let row = sample_order_row();
        let expected_id = row.id;
        let order = row_to_order(row, vec![sample_item_row()]).expect("valid rows convert");

        assert_eq!(order.id(), expected_id);
        assert_eq!(order.status(), OrderStatus::Paid);
        assert_eq!(order.payment_mode(), PaymentMode::Card);
        assert_eq!(order.items().len(), 1);
    }

    #[rstest]
    fn row_to_order_rejects_unknown_status_labels() {
        let mut row = sample_order_row();
        row.status = "MISPLACED".to_owned();
        let err = row_to_order(row, vec![sample_item_row()]).expect_err("unknown status");
        assert!(matches!(err, OrderRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_to_summary_carries_the_header_fields() {
        let row = sample_order_row();
        let expected_total = row.total.clone();
        let summary = row_to_summary(row).expect("valid row converts");
        assert_eq!(summary.total, expected_total);
        assert_eq!(summary.status, OrderStatus::Paid);
    }

    #[rstest]
    fn tx_abort_passes_the_business_error_through() {
        let id = Uuid::new_v4();
        let mapped = map_tx_error(TxError::Abort(OrderRepositoryError::insufficient_stock(id)));
        assert_eq!(mapped, OrderRepositoryError::insufficient_stock(id));
    }

    #[rstest]
    fn tx_diesel_errors_map_to_infrastructure_variants() {
        let mapped = map_tx_error(TxError::Diesel(diesel::result::Error::NotFound));
        assert!(matches!(mapped, OrderRepositoryError::Query { .. }));
    }
}
