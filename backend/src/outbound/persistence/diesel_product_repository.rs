//! PostgreSQL-backed catalogue read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{CategoryId, Product, ProductCategory, ProductId};

use super::diesel_helpers;
use super::models::{ProductCategoryRow, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::{product_categories, products};

/// Diesel-backed implementation of the catalogue read port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    diesel_helpers::map_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    diesel_helpers::map_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn row_to_category(row: ProductCategoryRow) -> ProductCategory {
    ProductCategory {
        id: CategoryId::new(row.id),
        name: row.name,
        description: row.description,
    }
}

fn row_to_product(row: ProductRow) -> Product {
    Product {
        id: ProductId::new(row.id),
        category_id: CategoryId::new(row.category_id),
        name: row.name,
        price_cents: row.price_cents,
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn categories(&self) -> Result<Vec<ProductCategory>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductCategoryRow> = product_categories::table
            .select(ProductCategoryRow::as_select())
            .order_by(product_categories::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_category).collect())
    }

    async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::category_id.eq(category_id.value()))
            .select(ProductRow::as_select())
            .order_by(products::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_product).collect())
    }

    async fn find_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .find(product_id.value())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_product))
    }
}
