//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{InventoryRepository, LoginService, OrderService, ProductRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub products: Arc<dyn ProductRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub orders: Arc<dyn OrderService>,
}

impl HttpState {
    /// Construct state from the ports the HTTP layer drives.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{OrderProcessingService, StandardDiscountPolicy};
    /// use backend::domain::ports::{
    ///     FixtureInventoryRepository, FixtureLoginService, FixtureOrderRepository,
    ///     FixtureProductRepository,
    /// };
    /// use backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let products = Arc::new(FixtureProductRepository::with_catalogue(vec![], vec![]));
    /// let state = HttpState::new(
    ///     Arc::new(FixtureLoginService),
    ///     products.clone(),
    ///     Arc::new(FixtureInventoryRepository::with_stock(Vec::new())),
    ///     Arc::new(OrderProcessingService::new(
    ///         Arc::new(FixtureOrderRepository::with_orders(Vec::new())),
    ///         products,
    ///         Arc::new(StandardDiscountPolicy),
    ///         Arc::new(DefaultClock),
    ///     )),
    /// );
    /// let _login = state.login.clone();
    /// ```
    #[must_use]
    pub fn new(
        login: Arc<dyn LoginService>,
        products: Arc<dyn ProductRepository>,
        inventory: Arc<dyn InventoryRepository>,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            login,
            products,
            inventory,
            orders,
        }
    }
}
