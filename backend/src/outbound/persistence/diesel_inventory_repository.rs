//! PostgreSQL-backed inventory read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ProductId;
use crate::domain::ports::{InventoryRepository, InventoryRepositoryError};

use super::diesel_helpers;
use super::pool::{DbPool, PoolError};
use super::schema::inventory;

/// Diesel-backed implementation of the inventory read port.
///
/// Products without an inventory row report `None`, which the stock
/// endpoint renders as zero units on hand.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InventoryRepositoryError {
    diesel_helpers::map_pool_error(error, InventoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> InventoryRepositoryError {
    diesel_helpers::map_diesel_error(
        error,
        InventoryRepositoryError::query,
        InventoryRepositoryError::connection,
    )
}

#[async_trait]
impl InventoryRepository for DieselInventoryRepository {
    async fn stock_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<i32>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        inventory::table
            .find(product_id.value())
            .select(inventory::stock)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
