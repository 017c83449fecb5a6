//! Persistence port for orders.
//!
//! Orders are created at checkout, read back for display and receipts, and
//! updated once when processing applies discounts. Identifier allocation
//! belongs to the adapter so database sequences and in-memory counters can
//! both satisfy the port.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::Error;
use crate::domain::order::{Order, OrderId, OrderLine, OrderStatus, OrderValidationError};
use crate::domain::user::AccountId;

use super::define_port_error;

define_port_error! {
    /// Errors raised when persisting or reading orders.
    pub enum OrderPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "order repository query failed: {message}",
    }
}

impl From<OrderPersistenceError> for Error {
    fn from(err: OrderPersistenceError) -> Self {
        match err {
            OrderPersistenceError::Connection { message } => Error::service_unavailable(message),
            OrderPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Checkout payload for creating an order.
///
/// Construction validates the same line invariants as [`Order`], so an
/// adapter receiving a `NewOrder` can persist it without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    account_id: AccountId,
    created_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
}

impl NewOrder {
    /// Validate and construct a checkout payload.
    pub fn new(
        account_id: AccountId,
        created_at: DateTime<Utc>,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderValidationError> {
        if lines.is_empty() {
            return Err(OrderValidationError::EmptyLines);
        }
        if let Some(line) = lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderValidationError::ZeroQuantity {
                product_id: line.product_id,
            });
        }
        Ok(Self {
            account_id,
            created_at,
            lines,
        })
    }

    /// Account placing the order.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Timestamp the order was placed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Priced order lines.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Decompose into parts for adapter persistence.
    #[must_use]
    pub fn into_parts(self) -> (AccountId, DateTime<Utc>, Vec<OrderLine>) {
        (self.account_id, self.created_at, self.lines)
    }
}

/// Port for order persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Look up an order regardless of owner.
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, OrderPersistenceError>;

    /// Look up an order only when owned by the given account.
    ///
    /// Returns `None` both for unknown orders and for orders owned by a
    /// different account, so callers cannot probe for foreign order ids.
    async fn find_for_account(
        &self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Option<Order>, OrderPersistenceError>;

    /// Persist status and discount changes to an existing order.
    async fn save(&self, order: &Order) -> Result<(), OrderPersistenceError>;

    /// Persist a new order, allocating its identifier.
    async fn create(&self, new_order: NewOrder) -> Result<Order, OrderPersistenceError>;
}

/// In-memory implementation backed by a mutex-guarded order table.
#[derive(Debug, Default)]
pub struct FixtureOrderRepository {
    state: Mutex<FixtureOrderState>,
}

#[derive(Debug, Default)]
struct FixtureOrderState {
    orders: BTreeMap<OrderId, Order>,
    next_id: i32,
}

impl FixtureOrderRepository {
    /// Build a repository preloaded with existing orders.
    ///
    /// Identifier allocation continues after the highest preloaded id.
    #[must_use]
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders: BTreeMap<OrderId, Order> =
            orders.into_iter().map(|order| (order.id(), order)).collect();
        let next_id = orders
            .keys()
            .last()
            .map_or(1, |order_id| order_id.value() + 1);
        Self {
            state: Mutex::new(FixtureOrderState { orders, next_id }),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FixtureOrderState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, OrderPersistenceError> {
        Ok(self.lock_state().orders.get(&order_id).cloned())
    }

    async fn find_for_account(
        &self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Option<Order>, OrderPersistenceError> {
        Ok(self
            .lock_state()
            .orders
            .get(&order_id)
            .filter(|order| order.account_id() == account_id)
            .cloned())
    }

    async fn save(&self, order: &Order) -> Result<(), OrderPersistenceError> {
        let mut state = self.lock_state();
        if !state.orders.contains_key(&order.id()) {
            return Err(OrderPersistenceError::query("record not found"));
        }
        state.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn create(&self, new_order: NewOrder) -> Result<Order, OrderPersistenceError> {
        let mut state = self.lock_state();
        let order_id = OrderId::new(state.next_id);
        state.next_id += 1;

        let (account_id, created_at, lines) = new_order.into_parts();
        let order = Order::from_parts(
            order_id,
            account_id,
            OrderStatus::Placed,
            0,
            created_at,
            lines,
        )
        .map_err(|err| OrderPersistenceError::query(err.to_string()))?;
        state.orders.insert(order_id, order.clone());
        Ok(order)
    }
}
