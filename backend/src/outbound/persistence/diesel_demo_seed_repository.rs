//! PostgreSQL-backed demo data seeding adapter.
//!
//! Applies the demo catalogue, accounts, and orders within a single
//! transaction. The category insert doubles as the seeding sentinel:
//! when every category already exists the run short-circuits without
//! touching the remaining tables.

use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use thiserror::Error;

use crate::demo::DemoDataset;
use crate::domain::{Order, Role, UserAccount};

use super::diesel_helpers;
use super::models::{
    NewInventoryRow, NewOrderLineRow, NewProductCategoryRow, NewProductRow, NewUserRow,
    SeedOrderRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{inventory, order_lines, orders, product_categories, products, users};

/// Result of a demo seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The demo data was written in this run.
    Applied,
    /// The demo data was already present; nothing was written.
    AlreadySeeded,
}

/// Errors raised while seeding demo data.
#[derive(Debug, Error)]
pub enum DemoSeedError {
    /// The database could not be reached.
    #[error("demo seed connection error: {0}")]
    Connection(String),
    /// A seeding statement failed.
    #[error("demo seed query error: {0}")]
    Query(String),
}

impl DemoSeedError {
    fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}

/// Diesel-backed demo data seeder.
#[derive(Clone)]
pub struct DieselDemoSeedRepository {
    pool: DbPool,
}

impl DieselDemoSeedRepository {
    /// Create a new seeder with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply the demo dataset unless a previous run already did.
    ///
    /// # Errors
    /// Returns [`DemoSeedError`] when the pool or any seeding statement
    /// fails; the transaction rolls back and no partial data remains.
    pub async fn seed(&self, dataset: &DemoDataset) -> Result<SeedOutcome, DemoSeedError> {
        let rows = SeedRows::from_dataset(dataset);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let rows_affected = diesel::insert_into(product_categories::table)
                    .values(&rows.categories)
                    .on_conflict(product_categories::id)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if rows_affected == 0 {
                    return Ok(SeedOutcome::AlreadySeeded);
                }

                diesel::insert_into(products::table)
                    .values(&rows.products)
                    .execute(conn)
                    .await?;
                diesel::insert_into(inventory::table)
                    .values(&rows.inventory)
                    .execute(conn)
                    .await?;
                diesel::insert_into(users::table)
                    .values(&rows.users)
                    .execute(conn)
                    .await?;
                diesel::insert_into(orders::table)
                    .values(&rows.orders)
                    .execute(conn)
                    .await?;
                diesel::insert_into(order_lines::table)
                    .values(&rows.lines)
                    .execute(conn)
                    .await?;

                // Seed orders carry explicit ids; advance the sequence so
                // checkout inserts do not collide with them.
                diesel::sql_query(
                    "SELECT setval(pg_get_serial_sequence('orders', 'id'), \
                     (SELECT COALESCE(MAX(id), 1) FROM orders))",
                )
                .execute(conn)
                .await?;

                Ok(SeedOutcome::Applied)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> DemoSeedError {
    diesel_helpers::map_pool_error(error, DemoSeedError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DemoSeedError {
    diesel_helpers::map_diesel_error(error, DemoSeedError::query, DemoSeedError::connection)
}

/// Insertable rows derived from the demo dataset.
struct SeedRows<'a> {
    categories: Vec<NewProductCategoryRow<'a>>,
    products: Vec<NewProductRow<'a>>,
    inventory: Vec<NewInventoryRow>,
    users: Vec<NewUserRow<'a>>,
    orders: Vec<SeedOrderRow<'a>>,
    lines: Vec<NewOrderLineRow<'a>>,
}

impl<'a> SeedRows<'a> {
    fn from_dataset(dataset: &'a DemoDataset) -> Self {
        let categories = dataset
            .categories
            .iter()
            .map(|category| NewProductCategoryRow {
                id: category.id.value(),
                name: &category.name,
                description: &category.description,
            })
            .collect();
        let products = dataset
            .products
            .iter()
            .map(|product| NewProductRow {
                id: product.id.value(),
                category_id: product.category_id.value(),
                name: &product.name,
                price_cents: product.price_cents,
            })
            .collect();
        let inventory = dataset
            .stock
            .iter()
            .map(|&(product_id, stock)| NewInventoryRow {
                product_id: product_id.value(),
                stock,
            })
            .collect();
        let users = dataset.accounts.iter().map(user_row).collect();
        let orders = dataset.orders.iter().map(order_row).collect();
        let lines = dataset.orders.iter().flat_map(order_line_rows).collect();
        Self {
            categories,
            products,
            inventory,
            users,
            orders,
            lines,
        }
    }
}

fn join_roles(roles: impl IntoIterator<Item = Role>) -> String {
    roles
        .into_iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn user_row(account: &UserAccount) -> NewUserRow<'_> {
    NewUserRow {
        id: account.id().value(),
        account_id: account.account_id().value(),
        username: account.username().as_ref(),
        password_hash: account.password_hash(),
        roles: join_roles(account.roles().iter().copied()),
    }
}

fn order_row(order: &Order) -> SeedOrderRow<'_> {
    SeedOrderRow {
        id: order.id().value(),
        account_id: order.account_id().value(),
        status: order.status().as_str(),
        discount_cents: order.discount_cents(),
        created_at: order.created_at(),
    }
}

fn order_line_rows(order: &Order) -> impl Iterator<Item = NewOrderLineRow<'_>> {
    order.lines().iter().map(|line| NewOrderLineRow {
        order_id: order.id().value(),
        product_id: line.product_id.value(),
        product_name: &line.description,
        quantity: diesel_helpers::cast_quantity_for_db(line.quantity),
        unit_price_cents: line.unit_price_cents,
    })
}
