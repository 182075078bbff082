//! Order HTTP handlers.
//!
//! ```text
//! POST /api/v1/orders
//! GET  /api/v1/orders
//! GET  /api/v1/orders/{orderId}
//! ```

use std::str::FromStr;

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    GetOrderRequest, ListOrdersRequest, OrderItemPayload, OrderLinePayload, OrderPayload,
    OrderSummaryPayload, PlaceOrderRequest, PlaceOrderResponse,
};
use crate::domain::{AddressSnapshot, Error, PaymentMode, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_uuid, parse_uuid_at, FieldName};
use crate::inbound::http::ApiResult;

/// One cart line in the placement request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineBody {
    #[schema(format = "uuid")]
    pub product_id: String,
    pub quantity: i32,
}

/// Request payload for placing an order.
///
/// Clients may send `displayTotal` (the total their cart showed); the server
/// recomputes every price and the settled total from the product store and
/// the value is never trusted.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequestBody {
    pub lines: Vec<OrderLineBody>,
    #[schema(format = "uuid")]
    pub address_id: String,
    pub payment_mode: String,
    pub coupon_code: Option<String>,
    pub display_total: Option<String>,
}

/// Response payload for order placement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponseBody {
    #[schema(format = "uuid")]
    pub order_id: String,
    /// Settled total as a decimal string, e.g. `"225.00"`.
    pub total: String,
}

impl From<PlaceOrderResponse> for PlaceOrderResponseBody {
    fn from(value: PlaceOrderResponse) -> Self {
        Self {
            order_id: value.order_id.to_string(),
            total: value.total.to_string(),
        }
    }
}

/// Shipping snapshot embedded in order responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<AddressSnapshot> for AddressBody {
    fn from(value: AddressSnapshot) -> Self {
        Self {
            recipient: value.recipient,
            line1: value.line1,
            line2: value.line2,
            city: value.city,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

/// One purchased line in an order response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub product_id: String,
    pub quantity: i32,
    /// Unit price at purchase time as a decimal string.
    pub unit_price: String,
}

impl From<OrderItemPayload> for OrderItemBody {
    fn from(value: OrderItemPayload) -> Self {
        Self {
            id: value.id.to_string(),
            product_id: value.product_id.to_string(),
            quantity: value.quantity,
            unit_price: value.unit_price.to_string(),
        }
    }
}

/// Full order response payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub total: String,
    pub status: String,
    pub payment_mode: String,
    pub shipping_address: AddressBody,
    pub items: Vec<OrderItemBody>,
    pub tracking_carrier: Option<String>,
    pub tracking_number: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<OrderPayload> for OrderBody {
    fn from(value: OrderPayload) -> Self {
        Self {
            id: value.id.to_string(),
            total: value.total.to_string(),
            status: value.status.to_string(),
            payment_mode: value.payment_mode.to_string(),
            shipping_address: value.shipping_address.into(),
            items: value.items.into_iter().map(OrderItemBody::from).collect(),
            tracking_carrier: value.tracking_carrier,
            tracking_number: value.tracking_number,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Order header in listing responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub total: String,
    pub status: String,
    pub payment_mode: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<OrderSummaryPayload> for OrderSummaryBody {
    fn from(value: OrderSummaryPayload) -> Self {
        Self {
            id: value.id.to_string(),
            total: value.total.to_string(),
            status: value.status.to_string(),
            payment_mode: value.payment_mode.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

fn parse_lines(lines: Vec<OrderLineBody>) -> Result<Vec<OrderLinePayload>, Error> {
    let mut parsed = Vec::with_capacity(lines.len());
    for (index, line) in lines.into_iter().enumerate() {
        parsed.push(OrderLinePayload {
            product_id: parse_uuid_at(line.product_id, FieldName::new("lines"), index)?,
            quantity: line.quantity,
        });
    }
    Ok(parsed)
}

fn parse_payment_mode(raw: String) -> Result<PaymentMode, Error> {
    PaymentMode::from_str(raw.as_str()).map_err(|()| {
        Error::invalid_request("paymentMode must be cash_on_delivery, card, or simulated")
            .with_details(json!({
                "field": "paymentMode",
                "value": raw,
                "code": "invalid_payment_mode",
            }))
    })
}

fn parse_place_order_payload(
    payload: PlaceOrderRequestBody,
    customer_id: UserId,
) -> Result<PlaceOrderRequest, Error> {
    if let Some(display_total) = payload.display_total.as_deref() {
        tracing::debug!(%display_total, "ignoring client-supplied total");
    }
    Ok(PlaceOrderRequest {
        customer_id,
        lines: parse_lines(payload.lines)?,
        address_id: parse_uuid(payload.address_id, FieldName::new("addressId"))?,
        payment_mode: parse_payment_mode(payload.payment_mode)?,
        coupon_code: payload.coupon_code,
    })
}

/// Place an order.
///
/// Settles the cart atomically: prices are re-read from the product store,
/// the coupon (if any) is redeemed, and stock is decremented, all in one
/// transaction. On any failure nothing is persisted.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequestBody,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Shipping address not found", body = ErrorSchema),
        (status = 409, description = "Insufficient stock", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<PlaceOrderRequestBody>,
) -> ApiResult<HttpResponse> {
    let customer_id = session.require_customer()?;
    let request = parse_place_order_payload(payload.into_inner(), customer_id)?;
    let response = state.checkout.place_order(request).await?;
    Ok(HttpResponse::Created().json(PlaceOrderResponseBody::from(response)))
}

/// List the authenticated customer's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Orders", body = [OrderSummaryBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<OrderSummaryBody>>> {
    let customer_id = session.require_customer()?;
    let summaries = state
        .orders
        .list_orders(ListOrdersRequest { customer_id })
        .await?;
    Ok(web::Json(
        summaries.into_iter().map(OrderSummaryBody::from).collect(),
    ))
}

/// Read one of the authenticated customer's orders.
///
/// Orders owned by other customers read as `404 Not Found` rather than
/// `403 Forbidden` so the endpoint does not confirm foreign order ids.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{orderId}",
    params(("orderId" = String, Path, format = "uuid", description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{orderId}")]
pub async fn get_order(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderBody>> {
    let customer_id = session.require_customer()?;
    let order_id = parse_uuid(path.into_inner(), FieldName::new("orderId"))?;
    let order = state
        .orders
        .get_order(GetOrderRequest {
            customer_id,
            order_id,
        })
        .await?;
    Ok(web::Json(OrderBody::from(order)))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
