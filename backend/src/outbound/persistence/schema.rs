//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Customer shipping addresses.
    ///
    /// Owned by a customer via `user_id`; orders embed a snapshot of the
    /// chosen address rather than referencing this table.
    addresses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning customer.
        user_id -> Uuid,
        /// Name of the person receiving the delivery.
        recipient -> Varchar,
        /// First street line.
        line1 -> Varchar,
        /// Optional second street line.
        line2 -> Nullable<Varchar>,
        /// City or town.
        city -> Varchar,
        /// Postal or ZIP code.
        postal_code -> Varchar,
        /// ISO country code.
        country -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Products offered for sale.
    ///
    /// `stock` is decremented inside the settlement transaction with a
    /// guard, so it never goes negative.
    products (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Regular unit price.
        base_price -> Numeric,
        /// Discounted unit price, when on sale.
        sale_price -> Nullable<Numeric>,
        /// Units available.
        stock -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Percentage discount coupons.
    ///
    /// `current_uses` is incremented with a compare-and-increment inside the
    /// settlement transaction, so it never exceeds `max_uses`.
    coupons (code) {
        /// Primary key: customer-facing coupon code.
        code -> Varchar,
        /// Percentage taken off the order total (0 to 100).
        discount_percentage -> Numeric,
        /// Redemption cap.
        max_uses -> Int4,
        /// Redemptions so far.
        current_uses -> Int4,
        /// Expiry; null never expires.
        expires_at -> Nullable<Timestamptz>,
        /// Administrative kill switch.
        active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Settled orders with embedded shipping snapshot.
    orders (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Customer who placed the order.
        customer_id -> Uuid,
        /// Authoritative total the order settled at.
        total -> Numeric,
        /// Lifecycle status label, e.g. `PAID`.
        status -> Varchar,
        /// Payment mode label, e.g. `simulated`.
        payment_mode -> Varchar,
        /// Coupon redeemed by this order, if any.
        coupon_code -> Nullable<Varchar>,
        /// Snapshot: delivery recipient.
        ship_recipient -> Varchar,
        /// Snapshot: first street line.
        ship_line1 -> Varchar,
        /// Snapshot: optional second street line.
        ship_line2 -> Nullable<Varchar>,
        /// Snapshot: city or town.
        ship_city -> Varchar,
        /// Snapshot: postal or ZIP code.
        ship_postal_code -> Varchar,
        /// Snapshot: ISO country code.
        ship_country -> Varchar,
        /// Carrier name once shipped.
        tracking_carrier -> Nullable<Varchar>,
        /// Tracking reference once shipped.
        tracking_number -> Nullable<Varchar>,
        /// Placement timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Purchased lines belonging to an order.
    order_items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning order.
        order_id -> Uuid,
        /// Product purchased.
        product_id -> Uuid,
        /// Units purchased.
        quantity -> Int4,
        /// Unit price at purchase time.
        unit_price -> Numeric,
    }
}

diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(addresses, products, coupons, orders, order_items);
