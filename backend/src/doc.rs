//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint in the inbound layer (landing, products,
//!   users, cart, orders, health)
//! - **Schemas**: request/response payload types plus the error envelope
//!   wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that document domain
//!   types without coupling them to the utoipa framework
//! - **Security**: the session cookie authentication scheme
//!
//! The generated specification backs Swagger UI (debug builds) and is
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::cart::{AddCartItemRequest, CartLineBody, CartResponse};
use crate::inbound::http::landing::{CategoryBody, LandingResponse};
use crate::inbound::http::orders::{OrderLineBody, OrderResponse, ReceiptLineBody, ReceiptResponse};
use crate::inbound::http::products::{ProductBody, ProductListResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pet store backend API",
        description = "HTTP interface for browsing the catalogue, managing a \
                       session cart, and processing orders.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::landing::guest_landing,
        crate::inbound::http::landing::user_landing,
        crate::inbound::http::landing::admin_landing,
        crate::inbound::http::products::list_products,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::cart::get_cart,
        crate::inbound::http::cart::add_cart_item,
        crate::inbound::http::orders::checkout,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::process_order,
        crate::inbound::http::orders::get_receipt,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LandingResponse,
        CategoryBody,
        ProductListResponse,
        ProductBody,
        LoginRequest,
        CartResponse,
        CartLineBody,
        AddCartItemRequest,
        OrderResponse,
        OrderLineBody,
        ReceiptResponse,
        ReceiptLineBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "landing", description = "Audience-specific landing pages"),
        (name = "products", description = "Catalogue browsing"),
        (name = "users", description = "Authentication and session lifecycle"),
        (name = "cart", description = "Session cart operations"),
        (name = "orders", description = "Checkout, processing, and receipts"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
