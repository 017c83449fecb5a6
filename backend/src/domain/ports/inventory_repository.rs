//! Read-side port for warehouse stock levels.
//!
//! Stock is tracked separately from the catalogue: a product may exist with
//! no inventory row at all. Callers decide how to present missing rows; the
//! HTTP layer shows them as zero stock.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::catalogue::ProductId;
use crate::domain::error::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading stock levels.
    pub enum InventoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "inventory repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "inventory repository query failed: {message}",
    }
}

impl From<InventoryRepositoryError> for Error {
    fn from(err: InventoryRepositoryError) -> Self {
        match err {
            InventoryRepositoryError::Connection { message } => Error::service_unavailable(message),
            InventoryRepositoryError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for reading per-product stock levels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Units on hand for the product, or `None` when no inventory row exists.
    async fn stock_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<i32>, InventoryRepositoryError>;
}

/// In-memory implementation backed by a preloaded stock table.
#[derive(Debug, Default, Clone)]
pub struct FixtureInventoryRepository {
    stock: BTreeMap<ProductId, i32>,
}

impl FixtureInventoryRepository {
    /// Build a repository serving the given stock levels.
    #[must_use]
    pub fn with_stock(stock: impl IntoIterator<Item = (ProductId, i32)>) -> Self {
        Self {
            stock: stock.into_iter().collect(),
        }
    }
}

#[async_trait]
impl InventoryRepository for FixtureInventoryRepository {
    async fn stock_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<i32>, InventoryRepositoryError> {
        Ok(self.stock.get(&product_id).copied())
    }
}
