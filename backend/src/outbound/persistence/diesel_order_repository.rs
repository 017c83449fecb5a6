//! PostgreSQL-backed order persistence adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{NewOrder, OrderPersistenceError, OrderRepository};
use crate::domain::{AccountId, Order, OrderId, OrderLine, OrderStatus, ProductId};

use super::diesel_helpers;
use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow, OrderUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{order_lines, orders};

/// Diesel-backed implementation of the order persistence port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch an order header and its lines, optionally scoped to an owner.
    ///
    /// Both reads run in one transaction so the header and lines observe a
    /// consistent MVCC snapshot while checkout inserts run concurrently.
    async fn fetch_order(
        &self,
        order_id: OrderId,
        owner: Option<AccountId>,
    ) -> Result<Option<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let loaded = conn
            .transaction(|conn| {
                async move {
                    let row: Option<OrderRow> = match owner {
                        Some(account_id) => {
                            orders::table
                                .filter(orders::id.eq(order_id.value()))
                                .filter(orders::account_id.eq(account_id.value()))
                                .select(OrderRow::as_select())
                                .first(conn)
                                .await
                                .optional()?
                        }
                        None => {
                            orders::table
                                .find(order_id.value())
                                .select(OrderRow::as_select())
                                .first(conn)
                                .await
                                .optional()?
                        }
                    };
                    let Some(order_row) = row else {
                        return Ok(None);
                    };
                    let line_rows: Vec<OrderLineRow> = order_lines::table
                        .filter(order_lines::order_id.eq(order_row.id))
                        .select(OrderLineRow::as_select())
                        .order_by(order_lines::id)
                        .load(conn)
                        .await?;
                    Ok(Some((order_row, line_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        loaded
            .map(|(order_row, line_rows)| rows_to_order(order_row, line_rows))
            .transpose()
    }
}

fn map_pool_error(error: PoolError) -> OrderPersistenceError {
    diesel_helpers::map_pool_error(error, OrderPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderPersistenceError {
    diesel_helpers::map_diesel_error(
        error,
        OrderPersistenceError::query,
        OrderPersistenceError::connection,
    )
}

fn row_to_line(row: OrderLineRow) -> OrderLine {
    OrderLine {
        product_id: ProductId::new(row.product_id),
        description: row.product_name,
        quantity: diesel_helpers::cast_quantity(row.quantity),
        unit_price_cents: row.unit_price_cents,
    }
}

fn rows_to_order(
    order_row: OrderRow,
    line_rows: Vec<OrderLineRow>,
) -> Result<Order, OrderPersistenceError> {
    let status = OrderStatus::parse(&order_row.status)
        .map_err(|error| OrderPersistenceError::query(error.to_string()))?;
    let lines = line_rows.into_iter().map(row_to_line).collect();
    Order::from_parts(
        OrderId::new(order_row.id),
        AccountId::new(order_row.account_id),
        status,
        order_row.discount_cents,
        order_row.created_at,
        lines,
    )
    .map_err(|error| OrderPersistenceError::query(error.to_string()))
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn find_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Order>, OrderPersistenceError> {
        self.fetch_order(order_id, None).await
    }

    async fn find_for_account(
        &self,
        account_id: AccountId,
        order_id: OrderId,
    ) -> Result<Option<Order>, OrderPersistenceError> {
        self.fetch_order(order_id, Some(account_id)).await
    }

    async fn save(&self, order: &Order) -> Result<(), OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = OrderUpdate {
            status: order.status().as_str(),
            discount_cents: order.discount_cents(),
        };
        let updated = diesel::update(orders::table.find(order.id().value()))
            .set(update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(OrderPersistenceError::query("record not found"));
        }
        Ok(())
    }

    async fn create(&self, new_order: NewOrder) -> Result<Order, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (account_id, created_at, lines) = new_order.into_parts();
        let (order_id, lines) = conn
            .transaction(|conn| {
                async move {
                    let order_row: OrderRow = diesel::insert_into(orders::table)
                        .values(NewOrderRow {
                            account_id: account_id.value(),
                            status: OrderStatus::Placed.as_str(),
                            discount_cents: 0,
                            created_at,
                        })
                        .returning(OrderRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let line_rows: Vec<NewOrderLineRow<'_>> = lines
                        .iter()
                        .map(|line| NewOrderLineRow {
                            order_id: order_row.id,
                            product_id: line.product_id.value(),
                            product_name: &line.description,
                            quantity: diesel_helpers::cast_quantity_for_db(line.quantity),
                            unit_price_cents: line.unit_price_cents,
                        })
                        .collect();
                    diesel::insert_into(order_lines::table)
                        .values(&line_rows)
                        .execute(conn)
                        .await?;
                    Ok((order_row.id, lines))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Order::from_parts(
            OrderId::new(order_id),
            account_id,
            OrderStatus::Placed,
            0,
            created_at,
            lines,
        )
        .map_err(|error| OrderPersistenceError::query(error.to_string()))
    }
}
