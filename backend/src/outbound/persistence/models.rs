//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{inventory, order_lines, orders, product_categories, products, users};

/// Row struct for reading from the product_categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductCategoryRow {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Insertable struct for seeding product categories.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product_categories)]
pub(crate) struct NewProductCategoryRow<'a> {
    pub id: i32,
    pub name: &'a str,
    pub description: &'a str,
}

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub price_cents: i64,
}

/// Insertable struct for seeding products.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: i32,
    pub category_id: i32,
    pub name: &'a str,
    pub price_cents: i64,
}

/// Insertable struct for seeding inventory levels.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory)]
pub(crate) struct NewInventoryRow {
    pub product_id: i32,
    pub stock: i32,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub account_id: i32,
    pub username: String,
    pub password_hash: String,
    /// Comma-joined role names, split and parsed during row conversion.
    pub roles: String,
}

/// Insertable struct for seeding user accounts.
///
/// `roles` is owned because the comma-joined list is derived from the
/// domain's role set rather than borrowed from it.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: i32,
    pub account_id: i32,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub roles: String,
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i32,
    pub account_id: i32,
    pub status: String,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating orders at checkout.
///
/// The identifier is allocated by the database sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub account_id: i32,
    pub status: &'a str,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for seeding orders with fixed identifiers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct SeedOrderRow<'a> {
    pub id: i32,
    pub account_id: i32,
    pub status: &'a str,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for persisting processing results.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
pub(crate) struct OrderUpdate<'a> {
    pub status: &'a str,
    pub discount_cents: i64,
}

/// Row struct for reading order lines.
///
/// Selects only the columns the domain carries; the surrogate line id and
/// the owning order id stay in the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderLineRow {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

/// Insertable struct for creating order lines.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_lines)]
pub(crate) struct NewOrderLineRow<'a> {
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: &'a str,
    pub quantity: i32,
    pub unit_price_cents: i64,
}
