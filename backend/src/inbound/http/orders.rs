//! Order endpoints: checkout, inspection, processing, and receipts.
//!
//! ```text
//! POST /api/v1/checkout
//! GET  /api/v1/orders/{order_id}
//! POST /api/v1/orders/{order_id}/process
//! GET  /api/v1/orders/{order_id}/receipt
//! ```
//!
//! Checkout turns the session cart into a placed order for the logged-in
//! account. Inspection and processing are administrative; receipts are
//! scoped to the session's own account, so another account's order id looks
//! exactly like a missing one.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Order, OrderId, Receipt, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_i32};

const ORDER_ID_FIELD: FieldName = FieldName::new("orderId");

#[derive(Debug, Deserialize)]
struct OrderPath {
    order_id: String,
}

fn parse_order_id(path: OrderPath) -> Result<OrderId, Error> {
    parse_i32(&path.order_id, ORDER_ID_FIELD).map(OrderId::new)
}

/// Priced line in an order payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineBody {
    /// Product the line refers to.
    pub product_id: i32,
    /// Product name captured at checkout time.
    #[schema(example = "Kitten Chow")]
    pub description: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price in cents captured at checkout time.
    pub unit_price_cents: i64,
    /// Line total before discounts, in cents.
    pub extension_cents: i64,
}

/// Full order payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Order identifier.
    pub id: i32,
    /// Account that placed the order.
    pub account_id: i32,
    /// Lifecycle state: `placed` or `processed`.
    #[schema(example = "placed")]
    pub status: String,
    /// Priced order lines.
    pub lines: Vec<OrderLineBody>,
    /// Sum of line extensions, in cents.
    pub subtotal_cents: i64,
    /// Discount recorded during processing, in cents.
    pub discount_cents: i64,
    /// Amount payable, in cents.
    pub total_cents: i64,
    /// ISO 8601 timestamp the order was placed.
    #[schema(example = "2026-01-15T12:00:00+00:00")]
    pub created_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().value(),
            account_id: order.account_id().value(),
            status: order.status().to_string(),
            lines: order
                .lines()
                .iter()
                .map(|line| OrderLineBody {
                    product_id: line.product_id.value(),
                    description: line.description.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    extension_cents: line.extension_cents(),
                })
                .collect(),
            subtotal_cents: order.subtotal_cents(),
            discount_cents: order.discount_cents(),
            total_cents: order.total_cents(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

/// Line item on a receipt payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLineBody {
    /// Product name captured at checkout time.
    pub description: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Line total in cents.
    pub extension_cents: i64,
}

/// Receipt payload projected from an order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    /// Order the receipt describes.
    pub order_id: i32,
    /// Account that placed the order.
    pub account_id: i32,
    /// Order status at projection time.
    #[schema(example = "processed")]
    pub status: String,
    /// Priced receipt lines.
    pub lines: Vec<ReceiptLineBody>,
    /// Sum of line extensions, in cents.
    pub subtotal_cents: i64,
    /// Discount deducted, in cents.
    pub discount_cents: i64,
    /// Amount payable, in cents.
    pub total_cents: i64,
    /// ISO 8601 timestamp the order was placed.
    #[schema(example = "2026-01-15T12:00:00+00:00")]
    pub created_at: String,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            order_id: receipt.order_id.value(),
            account_id: receipt.account_id.value(),
            status: receipt.status.to_string(),
            lines: receipt
                .lines
                .into_iter()
                .map(|line| ReceiptLineBody {
                    description: line.description,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    extension_cents: line.extension_cents,
                })
                .collect(),
            subtotal_cents: receipt.subtotal_cents,
            discount_cents: receipt.discount_cents,
            total_cents: receipt.total_cents,
            created_at: receipt.created_at.to_rfc3339(),
        }
    }
}

/// Place an order from the session cart.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Cart is empty", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Cart references an unknown product", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "checkout",
    security(("SessionCookie" = []))
)]
#[post("/checkout")]
pub async fn checkout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_login()?;
    let cart = session.cart();
    let order = state.orders.checkout(user.account_id, &cart).await?;
    session.clear_cart();
    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// Fetch an order by identifier. Administrators only.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    params(
        ("order_id" = i32, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder",
    security(("SessionCookie" = []))
)]
#[get("/orders/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrderPath>,
) -> ApiResult<web::Json<OrderResponse>> {
    session.require_role(Role::Admin)?;
    let order_id = parse_order_id(path.into_inner())?;
    let order = state.orders.order_by_id(order_id).await?;
    Ok(web::Json(OrderResponse::from(&order)))
}

/// Apply discounts and mark an order processed. Administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/process",
    params(
        ("order_id" = i32, Path, description = "Order identifier")
    ),
    responses(
        (status = 204, description = "Order processed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "processOrder",
    security(("SessionCookie" = []))
)]
#[post("/orders/{order_id}/process")]
pub async fn process_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrderPath>,
) -> ApiResult<HttpResponse> {
    session.require_role(Role::Admin)?;
    let order_id = parse_order_id(path.into_inner())?;
    state.orders.process_order(order_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch the receipt for one of the session account's own orders.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/receipt",
    params(
        ("order_id" = i32, Path, description = "Order identifier")
    ),
    responses(
        (
            status = 200,
            description = "Receipt",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = ReceiptResponse
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getReceipt",
    security(("SessionCookie" = []))
)]
#[get("/orders/{order_id}/receipt")]
pub async fn get_receipt(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrderPath>,
) -> ApiResult<HttpResponse> {
    let user = session.require_login()?;
    let order_id = parse_order_id(path.into_inner())?;
    let receipt = state
        .orders
        .receipt_for_account(user.account_id, order_id)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ReceiptResponse::from(receipt)))
}
