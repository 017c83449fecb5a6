//! Landing endpoints for each audience.
//!
//! ```text
//! GET /
//! GET /user
//! GET /admin
//! ```
//!
//! Each landing page returns the category list for browse navigation plus
//! the audience it was rendered for. The guest page is public; the user and
//! admin pages enforce their role via the session.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ProductCategory, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Category entry in a landing payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    /// Category identifier.
    pub id: i32,
    /// Display name.
    #[schema(example = "Cats")]
    pub name: String,
    /// Short description for navigation.
    pub description: String,
}

impl From<ProductCategory> for CategoryBody {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id.value(),
            name: category.name,
            description: category.description,
        }
    }
}

/// Response payload for the landing endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandingResponse {
    /// Audience the page was rendered for: `guest`, `user`, or `admin`.
    #[schema(example = "guest")]
    pub audience: String,
    /// Product categories for browse navigation.
    pub categories: Vec<CategoryBody>,
}

async fn landing_payload(
    state: &HttpState,
    audience: &str,
) -> ApiResult<web::Json<LandingResponse>> {
    let categories = state.products.categories().await?;
    Ok(web::Json(LandingResponse {
        audience: audience.to_owned(),
        categories: categories.into_iter().map(CategoryBody::from).collect(),
    }))
}

/// Guest landing page with the category list.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing payload", body = LandingResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["landing"],
    operation_id = "guestLanding",
    security([])
)]
#[get("/")]
pub async fn guest_landing(state: web::Data<HttpState>) -> ApiResult<web::Json<LandingResponse>> {
    landing_payload(&state, "guest").await
}

/// Landing page for authenticated shoppers.
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Landing payload", body = LandingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["landing"],
    operation_id = "userLanding",
    security(("SessionCookie" = []))
)]
#[get("/user")]
pub async fn user_landing(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LandingResponse>> {
    session.require_role(Role::User)?;
    landing_payload(&state, "user").await
}

/// Landing page for administrators.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Landing payload", body = LandingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["landing"],
    operation_id = "adminLanding",
    security(("SessionCookie" = []))
)]
#[get("/admin")]
pub async fn admin_landing(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LandingResponse>> {
    session.require_role(Role::Admin)?;
    landing_payload(&state, "admin").await
}
