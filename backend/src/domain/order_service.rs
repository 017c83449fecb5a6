//! Order use-case orchestration over the persistence ports.
//!
//! [`OrderProcessingService`] implements the [`OrderService`] driving port.
//! It prices carts against the catalogue at checkout, applies the discount
//! policy exactly once per order during processing, and projects receipts
//! scoped to the owning account.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::cart::Cart;
use crate::domain::error::Error;
use crate::domain::order::{Order, OrderId, OrderLine, Receipt};
use crate::domain::ports::{
    DiscountPolicy, NewOrder, OrderRepository, OrderService, ProductRepository,
};
use crate::domain::user::AccountId;

/// Production [`OrderService`] implementation.
#[derive(Clone)]
pub struct OrderProcessingService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    discount_policy: Arc<dyn DiscountPolicy>,
    clock: Arc<dyn Clock>,
}

impl OrderProcessingService {
    /// Build the service over its collaborating ports.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        discount_policy: Arc<dyn DiscountPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            products,
            discount_policy,
            clock,
        }
    }

    async fn price_cart(&self, cart: &Cart) -> Result<Vec<OrderLine>, Error> {
        let mut lines = Vec::with_capacity(cart.len());
        for (product_id, quantity) in cart.entries() {
            let product = self
                .products
                .find_by_id(product_id)
                .await?
                .ok_or_else(|| {
                    Error::not_found(format!("Product with ID: {product_id} not found"))
                })?;
            lines.push(OrderLine {
                product_id,
                description: product.name,
                quantity,
                unit_price_cents: product.price_cents,
            });
        }
        Ok(lines)
    }
}

#[async_trait]
impl OrderService for OrderProcessingService {
    async fn checkout(&self, account_id: AccountId, cart: &Cart) -> Result<Order, Error> {
        if cart.is_empty() {
            return Err(Error::invalid_request("cart is empty"));
        }

        let lines = self.price_cart(cart).await?;
        let new_order = NewOrder::new(account_id, self.clock.utc(), lines)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let order = self.orders.create(new_order).await?;

        info!(
            order_id = %order.id(),
            account_id = %account_id,
            total_cents = order.total_cents(),
            "order placed"
        );
        Ok(order)
    }

    async fn order_by_id(&self, order_id: OrderId) -> Result<Order, Error> {
        let order = self.orders.find_by_id(order_id).await?;
        order.ok_or_else(|| Error::not_found(format!("Order with ID: {order_id} not found")))
    }

    async fn process_order(&self, order_id: OrderId) -> Result<(), Error> {
        let mut order = self.order_by_id(order_id).await?;
        if order.is_processed() {
            debug!(order_id = %order_id, "order already processed; skipping");
            return Ok(());
        }

        let discount_cents = self.discount_policy.discount_cents(&order);
        order.apply_discount(discount_cents);
        order.mark_processed();
        self.orders.save(&order).await?;

        info!(
            order_id = %order_id,
            discount_cents = order.discount_cents(),
            total_cents = order.total_cents(),
            "order processed"
        );
        Ok(())
    }

    async fn receipt_for_account(
        &self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Receipt, Error> {
        let order = self.orders.find_for_account(account_id, order_id).await?;
        let order = order
            .ok_or_else(|| Error::not_found(format!("Order with ID: {order_id} not found")))?;
        Ok(Receipt::from_order(&order))
    }
}
