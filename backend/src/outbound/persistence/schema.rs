//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; `diesel print-schema` can regenerate them from a live
//! database when the migrations change.

diesel::table! {
    /// Product categories shown on the landing pages.
    product_categories (id) {
        /// Primary key.
        id -> Int4,
        /// Display name, e.g. "Dogs".
        name -> Varchar,
        /// Short description shown alongside the name.
        description -> Varchar,
    }
}

diesel::table! {
    /// Catalogue products available for purchase.
    products (id) {
        /// Primary key.
        id -> Int4,
        /// Owning category.
        category_id -> Int4,
        /// Display name, e.g. "Kitten Chow".
        name -> Varchar,
        /// Unit price in cents.
        price_cents -> Int8,
    }
}

diesel::table! {
    /// Warehouse stock levels, one row per stocked product.
    ///
    /// Products without a row are treated as out of stock by callers.
    inventory (product_id) {
        /// Product the stock count belongs to.
        product_id -> Int4,
        /// Units on hand.
        stock -> Int4,
    }
}

diesel::table! {
    /// User accounts with login credentials and access roles.
    users (id) {
        /// Primary key.
        id -> Int4,
        /// Commerce identity recorded on orders.
        account_id -> Int4,
        /// Unique login name.
        username -> Varchar,
        /// PHC-format Argon2 password hash.
        password_hash -> Varchar,
        /// Comma-joined role names, e.g. "user,admin".
        roles -> Varchar,
    }
}

diesel::table! {
    /// Orders placed at checkout.
    orders (id) {
        /// Primary key, allocated by the database sequence.
        id -> Int4,
        /// Account that placed the order.
        account_id -> Int4,
        /// Lifecycle state: "placed" or "processed".
        status -> Varchar,
        /// Discount applied during processing, in cents.
        discount_cents -> Int8,
        /// Timestamp the order was placed.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Priced line items belonging to orders.
    order_lines (id) {
        /// Primary key, allocated by the database sequence.
        id -> Int4,
        /// Owning order.
        order_id -> Int4,
        /// Product the line refers to.
        product_id -> Int4,
        /// Product name captured at checkout time.
        product_name -> Varchar,
        /// Units ordered.
        quantity -> Int4,
        /// Unit price in cents captured at checkout time.
        unit_price_cents -> Int8,
    }
}
