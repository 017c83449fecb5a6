//! Read-side port for the product catalogue.
//!
//! Landing pages, product listings, and checkout pricing all read through
//! this port, keeping persistence details behind the hexagonal boundary.

use async_trait::async_trait;

use crate::domain::catalogue::{CategoryId, Product, ProductCategory, ProductId};
use crate::domain::error::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading the product catalogue.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "product repository query failed: {message}",
    }
}

impl From<ProductRepositoryError> for Error {
    fn from(err: ProductRepositoryError) -> Self {
        match err {
            ProductRepositoryError::Connection { message } => Error::service_unavailable(message),
            ProductRepositoryError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for reading categories and products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List all categories ordered by identifier.
    async fn categories(&self) -> Result<Vec<ProductCategory>, ProductRepositoryError>;

    /// List products in a category ordered by identifier.
    ///
    /// An unknown category yields an empty list rather than an error, so
    /// browsing a stale link degrades to an empty shelf.
    async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Look up a single product.
    async fn find_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError>;
}

/// In-memory implementation backed by preloaded catalogue data.
///
/// Serves both tests and database-free deployments; the composition root
/// preloads it with the demo catalogue when no database is configured.
#[derive(Debug, Default, Clone)]
pub struct FixtureProductRepository {
    categories: Vec<ProductCategory>,
    products: Vec<Product>,
}

impl FixtureProductRepository {
    /// Build a repository serving the given catalogue.
    #[must_use]
    pub fn with_catalogue(categories: Vec<ProductCategory>, products: Vec<Product>) -> Self {
        let mut categories = categories;
        categories.sort_by_key(|category| category.id);
        let mut products = products;
        products.sort_by_key(|product| product.id);
        Self {
            categories,
            products,
        }
    }
}

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn categories(&self) -> Result<Vec<ProductCategory>, ProductRepositoryError> {
        Ok(self.categories.clone())
    }

    async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(self
            .products
            .iter()
            .filter(|product| product.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self
            .products
            .iter()
            .find(|product| product.id == product_id)
            .cloned())
    }
}
