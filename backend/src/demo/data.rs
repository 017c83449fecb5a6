//! Deterministic demo catalogue, accounts, and orders.
//!
//! The fixture adapters serve this dataset directly when no database is
//! configured, and the startup seeder writes it to PostgreSQL otherwise,
//! so both modes expose identical data: three categories, eight products,
//! two accounts (`user1` and `admin`), and two placed orders.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::domain::{
    AccountId, CategoryId, Order, OrderId, OrderLine, OrderValidationError, Product,
    ProductCategory, ProductId, Role, UserAccount, UserId, UserValidationError, Username,
    hash_password,
};

/// Password for the demo shopper account `user1`.
pub const DEMO_USER_PASSWORD: &str = "pass123";

/// Password for the demo administrator account `admin`.
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// Complete demo dataset shared by fixture mode and database seeding.
#[derive(Debug, Clone)]
pub struct DemoDataset {
    /// Browsable categories, ordered by identifier.
    pub categories: Vec<ProductCategory>,
    /// Products across all categories, ordered by identifier.
    pub products: Vec<Product>,
    /// Stock levels; products without an entry report as out of stock.
    pub stock: Vec<(ProductId, i32)>,
    /// Login accounts with Argon2 password hashes.
    pub accounts: Vec<UserAccount>,
    /// Preplaced orders owned by the demo accounts.
    pub orders: Vec<Order>,
}

/// Errors raised while assembling the demo dataset.
#[derive(Debug, Error)]
pub enum DemoDataError {
    /// Hashing a demo password failed.
    #[error("failed to hash demo password: {0}")]
    PasswordHash(String),
    /// A demo username failed validation.
    #[error("invalid demo username: {0}")]
    Username(#[from] UserValidationError),
    /// A demo order failed validation.
    #[error("invalid demo order: {0}")]
    Order(#[from] OrderValidationError),
    /// A demo timestamp was out of range.
    #[error("invalid demo timestamp")]
    Timestamp,
}

/// Assemble the demo dataset.
///
/// Password hashes are generated on each call, so the dataset is
/// deterministic in content but not byte-for-byte in its hashes.
///
/// # Errors
/// Returns [`DemoDataError`] when password hashing fails; the static data
/// itself always validates.
pub fn demo_dataset() -> Result<DemoDataset, DemoDataError> {
    Ok(DemoDataset {
        categories: demo_categories(),
        products: demo_products(),
        stock: demo_stock(),
        accounts: demo_accounts()?,
        orders: demo_orders()?,
    })
}

fn demo_categories() -> Vec<ProductCategory> {
    vec![
        category(1, "Dogs", "Food, toys, and comfort for dogs"),
        category(2, "Cats", "Everything a cat could ask for"),
        category(3, "Fish", "Aquarium supplies and fish food"),
    ]
}

fn category(id: i32, name: &str, description: &str) -> ProductCategory {
    ProductCategory {
        id: CategoryId::new(id),
        name: name.into(),
        description: description.into(),
    }
}

fn demo_products() -> Vec<Product> {
    vec![
        product(1, 1, "Chew Bone", 250),
        product(2, 1, "Dog Bed", 4500),
        product(3, 1, "Dog Lead", 1600),
        product(4, 2, "Kitten Chow", 1200),
        product(5, 2, "Catnip Toy", 600),
        product(6, 2, "Scratching Post", 3500),
        product(7, 3, "Aquarium Pump", 2900),
        product(8, 3, "Fish Flakes", 450),
    ]
}

fn product(id: i32, category_id: i32, name: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        category_id: CategoryId::new(category_id),
        name: name.into(),
        price_cents,
    }
}

fn demo_stock() -> Vec<(ProductId, i32)> {
    vec![
        (ProductId::new(1), 40),
        (ProductId::new(2), 12),
        (ProductId::new(3), 25),
        (ProductId::new(4), 30),
        (ProductId::new(5), 50),
        // The scratching post (6) deliberately has no stock row.
        (ProductId::new(7), 8),
        (ProductId::new(8), 60),
    ]
}

fn demo_accounts() -> Result<Vec<UserAccount>, DemoDataError> {
    let user_hash = hash_demo_password(DEMO_USER_PASSWORD)?;
    let admin_hash = hash_demo_password(DEMO_ADMIN_PASSWORD)?;
    Ok(vec![
        UserAccount::new(
            UserId::new(1),
            AccountId::new(1),
            Username::new("user1")?,
            user_hash,
            BTreeSet::from([Role::User]),
        ),
        UserAccount::new(
            UserId::new(2),
            AccountId::new(2),
            Username::new("admin")?,
            admin_hash,
            BTreeSet::from([Role::User, Role::Admin]),
        ),
    ])
}

fn hash_demo_password(password: &str) -> Result<String, DemoDataError> {
    hash_password(password).map_err(|error| DemoDataError::PasswordHash(error.to_string()))
}

fn demo_orders() -> Result<Vec<Order>, DemoDataError> {
    let first = Order::place(
        OrderId::new(7),
        AccountId::new(1),
        demo_timestamp(2026, 1, 5, 9)?,
        vec![line(4, "Kitten Chow", 2, 1200), line(5, "Catnip Toy", 3, 600)],
    )?;
    let second = Order::place(
        OrderId::new(8),
        AccountId::new(2),
        demo_timestamp(2026, 1, 12, 16)?,
        vec![line(1, "Chew Bone", 12, 250), line(2, "Dog Bed", 2, 4500)],
    )?;
    Ok(vec![first, second])
}

fn line(product_id: i32, description: &str, quantity: u32, unit_price_cents: i64) -> OrderLine {
    OrderLine {
        product_id: ProductId::new(product_id),
        description: description.into(),
        quantity,
        unit_price_cents,
    }
}

fn demo_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
) -> Result<DateTime<Utc>, DemoDataError> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .ok_or(DemoDataError::Timestamp)
}
