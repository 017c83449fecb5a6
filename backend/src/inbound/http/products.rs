//! Product browsing endpoint.
//!
//! ```text
//! GET /products?categoryId=2
//! ```
//!
//! Returns the products of a category together with a stock map keyed by
//! product id. The map holds exactly one entry per returned product; a
//! missing inventory row counts as zero stock. An unknown category yields an
//! empty listing rather than an error.

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CategoryId, Product};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_i32};

const CATEGORY_ID_FIELD: FieldName = FieldName::new("categoryId");

/// Raw query parameters for the product listing.
///
/// The category id arrives as a string so malformed values surface the
/// shared validation error envelope instead of the framework default.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
}

/// Product entry in a listing payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    /// Product identifier.
    pub id: i32,
    /// Display name.
    #[schema(example = "Kitten Chow")]
    pub name: String,
    /// Category the product belongs to.
    pub category_id: i32,
    /// Unit price in minor currency units.
    #[schema(example = 1200)]
    pub price_cents: i64,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.value(),
            name: product.name,
            category_id: product.category_id.value(),
            price_cents: product.price_cents,
        }
    }
}

/// Response payload for the product listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    /// Category the listing was built for.
    pub category_id: i32,
    /// Products in the category, in repository order.
    pub products: Vec<ProductBody>,
    /// Stock counts keyed by product id; one entry per listed product.
    #[schema(value_type = std::collections::BTreeMap<String, i32>)]
    pub stock: BTreeMap<i32, i32>,
}

/// List a category's products with their stock counts.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("categoryId" = i32, Query, description = "Category to list products for")
    ),
    responses(
        (status = 200, description = "Product listing", body = ProductListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ListProductsQuery>,
) -> ApiResult<web::Json<ProductListResponse>> {
    let Some(raw) = query.into_inner().category_id else {
        return Err(missing_field_error(CATEGORY_ID_FIELD));
    };
    let category_id = CategoryId::new(parse_i32(&raw, CATEGORY_ID_FIELD)?);

    let products = state.products.products_by_category(category_id).await?;
    let mut stock = BTreeMap::new();
    for product in &products {
        let count = state
            .inventory
            .stock_for_product(product.id)
            .await?
            .unwrap_or(0);
        stock.insert(product.id.value(), count);
    }

    Ok(web::Json(ProductListResponse {
        category_id: category_id.value(),
        products: products.into_iter().map(ProductBody::from).collect(),
        stock,
    }))
}
