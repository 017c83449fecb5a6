//! Session cart endpoints.
//!
//! ```text
//! GET  /api/v1/cart
//! POST /api/v1/cart/items {"productId":4,"quantity":2}
//! ```
//!
//! The cart lives entirely in the session cookie; these handlers price it
//! against the current catalogue on every read. Adding items requires a
//! login so checkout always has an account to bill.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Cart, Error, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_quantity_error, missing_field_error};

const PRODUCT_ID_FIELD: FieldName = FieldName::new("productId");
const QUANTITY_FIELD: FieldName = FieldName::new("quantity");

/// Request body for `POST /api/v1/cart/items`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    /// Product to add.
    #[schema(example = 4)]
    pub product_id: Option<i32>,
    /// Units to add; accumulates with any existing entry.
    #[schema(example = 2)]
    pub quantity: Option<u32>,
}

/// Priced cart line in a cart payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineBody {
    /// Product the line refers to.
    pub product_id: i32,
    /// Product name from the catalogue.
    #[schema(example = "Kitten Chow")]
    pub name: String,
    /// Units in the cart.
    pub quantity: u32,
    /// Current unit price in cents.
    pub unit_price_cents: i64,
    /// Line total in cents.
    pub line_total_cents: i64,
}

/// Response payload for the session cart.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// Priced lines in deterministic product-id order.
    pub lines: Vec<CartLineBody>,
    /// Sum of line totals in cents.
    pub total_cents: i64,
}

/// Price the session cart against the catalogue.
///
/// A cart entry whose product has vanished from the catalogue surfaces the
/// same NotFound as checkout would, keeping the two views consistent.
async fn priced_cart(state: &HttpState, cart: &Cart) -> Result<CartResponse, Error> {
    let mut lines = Vec::with_capacity(cart.len());
    let mut total_cents = 0_i64;
    for (product_id, quantity) in cart.entries() {
        let product = state
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Product with ID: {product_id} not found")))?;
        let line_total_cents = product.price_cents * i64::from(quantity);
        total_cents += line_total_cents;
        lines.push(CartLineBody {
            product_id: product_id.value(),
            name: product.name,
            quantity,
            unit_price_cents: product.price_cents,
            line_total_cents,
        });
    }
    Ok(CartResponse { lines, total_cents })
}

/// Fetch the current session cart with priced lines.
#[utoipa::path(
    get,
    path = "/api/v1/cart",
    responses(
        (
            status = 200,
            description = "Current cart",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = CartResponse
        ),
        (status = 404, description = "Cart references an unknown product", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "getCart",
    security(("SessionCookie" = []))
)]
#[get("/cart")]
pub async fn get_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let cart = session.cart();
    let response = priced_cart(&state, &cart).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// Add units of a product to the session cart.
#[utoipa::path(
    post,
    path = "/api/v1/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (
            status = 200,
            description = "Updated cart",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = CartResponse
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown product", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "addCartItem",
    security(("SessionCookie" = []))
)]
#[post("/cart/items")]
pub async fn add_cart_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddCartItemRequest>,
) -> ApiResult<HttpResponse> {
    session.require_login()?;
    let payload = payload.into_inner();
    let Some(product_id) = payload.product_id else {
        return Err(missing_field_error(PRODUCT_ID_FIELD));
    };
    let Some(quantity) = payload.quantity else {
        return Err(missing_field_error(QUANTITY_FIELD));
    };
    if quantity == 0 {
        return Err(invalid_quantity_error(QUANTITY_FIELD, quantity));
    }

    let product_id = ProductId::new(product_id);
    if state.products.find_by_id(product_id).await?.is_none() {
        return Err(Error::not_found(format!(
            "Product with ID: {product_id} not found"
        )));
    }

    let mut cart = session.cart();
    cart.add(product_id, quantity)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.store_cart(&cart)?;

    let response = priced_cart(&state, &cart).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};

    use crate::domain::ports::{
        AuthenticatedUser, FixtureInventoryRepository, FixtureLoginService,
        FixtureProductRepository, MockOrderService,
    };
    use crate::domain::{AccountId, CategoryId, Product, Role, UserId};

    use super::*;

    fn test_state() -> HttpState {
        let products = vec![
            Product {
                id: ProductId::new(4),
                name: "Kitten Chow".to_owned(),
                category_id: CategoryId::new(2),
                price_cents: 1200,
            },
            Product {
                id: ProductId::new(5),
                name: "Catnip Toy".to_owned(),
                category_id: CategoryId::new(2),
                price_cents: 600,
            },
        ];
        HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureProductRepository::with_catalogue(vec![], products)),
            Arc::new(FixtureInventoryRepository::with_stock(Vec::new())),
            Arc::new(MockOrderService::new()),
        )
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(web::scope("/api/v1").service(get_cart).service(add_cart_item))
            .route(
                "/test-login",
                web::post().to(|session: SessionContext| async move {
                    session.persist_login(&AuthenticatedUser {
                        user_id: UserId::new(1),
                        account_id: AccountId::new(1),
                        roles: BTreeSet::from([Role::User]),
                    })?;
                    Ok::<_, Error>(HttpResponse::Ok().finish())
                }),
            )
    }

    async fn login_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post().uri("/test-login").to_request(),
        )
        .await;
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    fn session_cookie(
        response: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn guest_cart_is_empty() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/cart").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("payload");
        assert_eq!(
            value.get("lines").and_then(Value::as_array).map(Vec::len),
            Some(0)
        );
        assert_eq!(value.get("totalCents").and_then(Value::as_i64), Some(0));
    }

    #[actix_web::test]
    async fn adding_items_requires_login() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .set_json(json!({ "productId": 4, "quantity": 2 }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn added_items_accumulate_and_price_the_cart() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app).await;

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .cookie(cookie)
                .set_json(json!({ "productId": 4, "quantity": 2 }))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        let cookie = session_cookie(&first);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .cookie(cookie)
                .set_json(json!({ "productId": 4, "quantity": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(second).await).expect("payload");

        let lines = value.get("lines").and_then(Value::as_array).expect("lines");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].get("quantity").and_then(Value::as_u64), Some(3));
        assert_eq!(
            lines[0].get("unitPriceCents").and_then(Value::as_i64),
            Some(1200)
        );
        assert_eq!(
            lines[0].get("lineTotalCents").and_then(Value::as_i64),
            Some(3600)
        );
        assert_eq!(value.get("totalCents").and_then(Value::as_i64), Some(3600));
    }

    #[actix_web::test]
    async fn missing_quantity_is_rejected_with_details() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .cookie(cookie)
                .set_json(json!({ "productId": 4 }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("payload");
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("quantity")
        );
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("missing_field")
        );
    }

    #[actix_web::test]
    async fn zero_quantity_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .cookie(cookie)
                .set_json(json!({ "productId": 4, "quantity": 0 }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("quantity must be at least 1")
        );
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_quantity")
        );
    }

    #[actix_web::test]
    async fn unknown_products_cannot_be_added() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cart/items")
                .cookie(cookie)
                .set_json(json!({ "productId": 99, "quantity": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Product with ID: 99 not found")
        );
    }
}
