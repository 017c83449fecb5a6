//! Driving port for order checkout, inspection, and processing.
//!
//! Inbound adapters call this port to run order use-cases without knowing
//! the backing repositories. The production implementation is
//! [`crate::domain::OrderProcessingService`]; handler tests substitute the
//! generated mock instead of wiring repositories.

use async_trait::async_trait;

use crate::domain::cart::Cart;
use crate::domain::error::Error;
use crate::domain::order::{Order, OrderId, Receipt};
use crate::domain::user::AccountId;

/// Driving port for order use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place an order from the account's cart, pricing lines against the
    /// current catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `InvalidRequest`: the cart is empty.
    /// - `NotFound`: a cart entry references an unknown product.
    /// - `ServiceUnavailable` / `Internal`: repository failure.
    async fn checkout(&self, account_id: AccountId, cart: &Cart) -> Result<Order, Error>;

    /// Fetch an order regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `NotFound`: no order has the given identifier.
    /// - `ServiceUnavailable` / `Internal`: repository failure.
    async fn order_by_id(&self, order_id: OrderId) -> Result<Order, Error>;

    /// Apply the discount policy and mark the order processed.
    ///
    /// Processing is idempotent: an already-processed order is left
    /// untouched and the call succeeds without recomputing discounts.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `NotFound`: no order has the given identifier.
    /// - `ServiceUnavailable` / `Internal`: repository failure.
    async fn process_order(&self, order_id: OrderId) -> Result<(), Error>;

    /// Project a receipt for an order owned by the given account.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `NotFound`: the order does not exist or belongs to another
    ///   account; the two cases are indistinguishable to the caller.
    /// - `ServiceUnavailable` / `Internal`: repository failure.
    async fn receipt_for_account(
        &self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Receipt, Error>;
}
