//! Order aggregate: header, line items, status, and the shipping snapshot.
//!
//! An order is created exactly once at settlement and only mutated by status
//! transitions afterwards. The shipping address and the per-line unit prices
//! are snapshot fields: values copied at placement that never track later
//! changes to their source rows.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by order constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// An order must contain at least one line item.
    #[error("order must contain at least one item")]
    EmptyItems,
    /// Line quantities are strictly positive.
    #[error("item quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The offending quantity.
        quantity: i32,
    },
    /// Snapshot unit prices are never negative.
    #[error("item unit price must not be negative")]
    NegativeUnitPrice,
    /// The settled total is never negative.
    #[error("order total must not be negative")]
    NegativeTotal,
    /// A status label from storage did not match any known status.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
    /// A required address snapshot field is blank.
    #[error("address snapshot field {0} must not be blank")]
    BlankAddressField(&'static str),
}

/// Order lifecycle status.
///
/// Settlement creates orders directly in [`OrderStatus::Paid`]; the remaining
/// states belong to fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created but not yet paid (unused by settlement, kept for fulfilment).
    Pending,
    /// Paid at placement.
    Paid,
    /// Handed to a carrier.
    Shipped,
    /// Confirmed received.
    Delivered,
    /// Cancelled before shipment.
    Cancelled,
}

impl OrderStatus {
    /// Stable label stored in the orders table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(OrderValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Settled on delivery.
    CashOnDelivery,
    /// Card payment (captured by an external processor).
    Card,
    /// Demo-environment payment that always succeeds.
    Simulated,
}

impl PaymentMode {
    /// Stable label stored in the orders table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::Card => "card",
            Self::Simulated => "simulated",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            "card" => Ok(Self::Card),
            "simulated" => Ok(Self::Simulated),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipping address copied into the order at placement.
///
/// Mutating or deleting the source address afterwards must never alter
/// historical orders, so the order row embeds these values rather than a
/// foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    /// Person the parcel is addressed to.
    pub recipient: String,
    /// First street line.
    pub line1: String,
    /// Optional second street line.
    pub line2: Option<String>,
    /// City or town.
    pub city: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Country name or ISO code as stored.
    pub country: String,
}

impl AddressSnapshot {
    /// Validate that the required snapshot fields are non-blank.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        let required: [(&'static str, &str); 5] = [
            ("recipient", &self.recipient),
            ("line1", &self.line1),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(OrderValidationError::BlankAddressField(name));
            }
        }
        Ok(())
    }
}

/// One purchased line inside an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: BigDecimal,
}

/// Unvalidated order item input.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    /// Item identifier.
    pub id: Uuid,
    /// Product the line refers to (informational; the product may be deleted
    /// later without touching the order).
    pub product_id: Uuid,
    /// Units purchased.
    pub quantity: i32,
    /// Price per unit at purchase time.
    pub unit_price: BigDecimal,
}

impl OrderItem {
    /// Validate and construct an order item.
    pub fn new(draft: OrderItemDraft) -> Result<Self, OrderValidationError> {
        if draft.quantity <= 0 {
            return Err(OrderValidationError::NonPositiveQuantity {
                quantity: draft.quantity,
            });
        }
        if draft.unit_price < BigDecimal::from(0) {
            return Err(OrderValidationError::NegativeUnitPrice);
        }
        Ok(Self {
            id: draft.id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
        })
    }

    /// Item identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Product the line refers to.
    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    /// Units purchased.
    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Price per unit at purchase time.
    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }
}

/// Unvalidated order input.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Order identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: UserId,
    /// Settled total after any discount.
    pub total: BigDecimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// How the order is paid.
    pub payment_mode: PaymentMode,
    /// Embedded shipping snapshot.
    pub shipping_address: AddressSnapshot,
    /// Purchased lines.
    pub items: Vec<OrderItem>,
    /// Carrier name once shipped.
    pub tracking_carrier: Option<String>,
    /// Tracking reference once shipped.
    pub tracking_number: Option<String>,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

/// A settled order with its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Uuid,
    customer_id: UserId,
    total: BigDecimal,
    status: OrderStatus,
    payment_mode: PaymentMode,
    shipping_address: AddressSnapshot,
    items: Vec<OrderItem>,
    tracking_carrier: Option<String>,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Validate and construct an order from a draft.
    pub fn new(draft: OrderDraft) -> Result<Self, OrderValidationError> {
        if draft.items.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }
        if draft.total < BigDecimal::from(0) {
            return Err(OrderValidationError::NegativeTotal);
        }
        draft.shipping_address.validate()?;
        Ok(Self {
            id: draft.id,
            customer_id: draft.customer_id,
            total: draft.total,
            status: draft.status,
            payment_mode: draft.payment_mode,
            shipping_address: draft.shipping_address,
            items: draft.items,
            tracking_carrier: draft.tracking_carrier,
            tracking_number: draft.tracking_number,
            created_at: draft.created_at,
        })
    }

    /// Order identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning customer.
    pub fn customer_id(&self) -> &UserId {
        &self.customer_id
    }

    /// Settled total after any discount.
    pub fn total(&self) -> &BigDecimal {
        &self.total
    }

    /// Lifecycle status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// How the order is paid.
    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    /// Embedded shipping snapshot.
    pub fn shipping_address(&self) -> &AddressSnapshot {
        &self.shipping_address
    }

    /// Purchased lines.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Carrier name once shipped.
    pub fn tracking_carrier(&self) -> Option<&str> {
        self.tracking_carrier.as_deref()
    }

    /// Tracking reference once shipped.
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    /// Placement timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Order header without line items, used by listings.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    /// Order identifier.
    pub id: Uuid,
    /// Settled total after any discount.
    pub total: BigDecimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// How the order is paid.
    pub payment_mode: PaymentMode,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}
