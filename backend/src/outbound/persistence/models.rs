//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{addresses, coupons, order_items, orders, products};

/// Row struct for reading shipping addresses.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Pricing and stock columns read (and locked) during settlement.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductPricingRow {
    pub id: Uuid,
    pub base_price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock: i32,
}

/// Row struct for reading coupons.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CouponRow {
    pub code: String,
    pub discount_percentage: BigDecimal,
    pub max_uses: i32,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Row struct for reading settled orders.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub total: BigDecimal,
    pub status: String,
    pub payment_mode: String,
    pub ship_recipient: String,
    pub ship_line1: String,
    pub ship_line2: Option<String>,
    pub ship_city: String,
    pub ship_postal_code: String,
    pub ship_country: String,
    pub tracking_carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating the order row during settlement.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub total: &'a BigDecimal,
    pub status: &'a str,
    pub payment_mode: &'a str,
    pub coupon_code: Option<&'a str>,
    pub ship_recipient: &'a str,
    pub ship_line1: &'a str,
    pub ship_line2: Option<&'a str>,
    pub ship_city: &'a str,
    pub ship_postal_code: &'a str,
    pub ship_country: &'a str,
}

/// Row struct for reading purchased lines.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderItemRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// Insertable struct for creating purchased lines during settlement.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: &'a BigDecimal,
}
