//! Order aggregate and receipt projection.
//!
//! An order is a priced snapshot of a cart at checkout time. Lines capture
//! the unit price in force when the order was placed, so later catalogue
//! price changes never alter existing orders. Discounts are recorded as a
//! single order-level amount; line unit prices stay untouched and receipts
//! present the deduction explicitly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalogue::ProductId;
use crate::domain::user::AccountId;

/// Identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i32);

impl OrderId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Checked out and awaiting processing.
    Placed,
    /// Processed with discounts applied; terminal.
    Processed,
}

impl OrderStatus {
    /// Canonical lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Processed => "processed",
        }
    }

    /// Parse a stored status name.
    pub fn parse(name: &str) -> Result<Self, OrderValidationError> {
        match name {
            "placed" => Ok(Self::Placed),
            "processed" => Ok(Self::Processed),
            other => Err(OrderValidationError::UnknownStatus {
                name: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors raised when constructing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// An order must contain at least one line.
    EmptyLines,
    /// Line quantities must be at least one.
    ZeroQuantity { product_id: ProductId },
    /// Stored status name was not recognised.
    UnknownStatus { name: String },
}

impl fmt::Display for OrderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLines => write!(f, "order must contain at least one line"),
            Self::ZeroQuantity { product_id } => {
                write!(f, "order line for product {product_id} has zero quantity")
            }
            Self::UnknownStatus { name } => write!(f, "unknown order status: {name}"),
        }
    }
}

impl std::error::Error for OrderValidationError {}

/// Single priced line within an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Product name captured at checkout time.
    pub description: String,
    /// Number of units ordered.
    pub quantity: u32,
    /// Unit price in cents captured at checkout time.
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Line total before discounts, in cents.
    #[must_use]
    pub fn extension_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// Placed order owned by an account.
///
/// ## Invariants
/// - `lines` is never empty and every line quantity is at least one.
/// - `discount_cents` is non-negative and never exceeds the subtotal.
/// - Status only moves forwards: `Placed` to `Processed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    account_id: AccountId,
    status: OrderStatus,
    discount_cents: i64,
    lines: Vec<OrderLine>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Construct a freshly placed order with no discount.
    pub fn place(
        id: OrderId,
        account_id: AccountId,
        created_at: DateTime<Utc>,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderValidationError> {
        Self::from_parts(id, account_id, OrderStatus::Placed, 0, created_at, lines)
    }

    /// Reconstruct an order from stored state.
    pub fn from_parts(
        id: OrderId,
        account_id: AccountId,
        status: OrderStatus,
        discount_cents: i64,
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

        let mut order = Self {
            id,
            account_id,
            status,
            discount_cents: 0,
            lines,
            created_at,
        };
        order.discount_cents = discount_cents.clamp(0, order.subtotal_cents());
        Ok(order)
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Account that placed the order.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Order lines in checkout order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Discount applied during processing, in cents.
    #[must_use]
    pub const fn discount_cents(&self) -> i64 {
        self.discount_cents
    }

    /// Timestamp the order was placed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of line extensions before discounts, in cents.
    #[must_use]
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(OrderLine::extension_cents).sum()
    }

    /// Amount payable after discounts, in cents.
    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents() - self.discount_cents
    }

    /// Whether processing has already completed.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.status == OrderStatus::Processed
    }

    /// Record the discount computed during processing.
    ///
    /// Negative amounts are clamped to zero and the discount never exceeds
    /// the subtotal, so the payable total stays non-negative.
    pub fn apply_discount(&mut self, discount_cents: i64) {
        self.discount_cents = discount_cents.clamp(0, self.subtotal_cents());
    }

    /// Advance the order to its processed state.
    pub fn mark_processed(&mut self) {
        self.status = OrderStatus::Processed;
    }
}

/// Line item presented on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product name captured at checkout time.
    pub description: String,
    /// Number of units ordered.
    pub quantity: u32,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Line total in cents.
    pub extension_cents: i64,
}

/// Immutable receipt projected from an order.
///
/// A receipt is derived state: it reads whatever the order holds at
/// projection time and stores nothing of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Order the receipt describes.
    pub order_id: OrderId,
    /// Account that placed the order.
    pub account_id: AccountId,
    /// Order status at projection time.
    pub status: OrderStatus,
    /// Priced receipt lines.
    pub lines: Vec<ReceiptLine>,
    /// Sum of line extensions, in cents.
    pub subtotal_cents: i64,
    /// Discount deducted, in cents.
    pub discount_cents: i64,
    /// Amount payable, in cents.
    pub total_cents: i64,
    /// Timestamp the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Project a receipt from the order's current state.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let lines = order
            .lines()
            .iter()
            .map(|line| ReceiptLine {
                description: line.description.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                extension_cents: line.extension_cents(),
            })
            .collect();
        Self {
            order_id: order.id(),
            account_id: order.account_id(),
            status: order.status(),
            lines,
            subtotal_cents: order.subtotal_cents(),
            discount_cents: order.discount_cents(),
            total_cents: order.total_cents(),
            created_at: order.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn placed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid timestamp")
    }

    fn line(product: i32, description: &str, quantity: u32, unit_price_cents: i64) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(product),
            description: description.to_owned(),
            quantity,
            unit_price_cents,
        }
    }

    fn two_line_order() -> Order {
        Order::place(
            OrderId::new(7),
            AccountId::new(1),
            placed_at(),
            vec![
                line(4, "Kitten Chow", 2, 1200),
                line(5, "Catnip Toy", 3, 600),
            ],
        )
        .expect("valid order")
    }

    #[test]
    fn subtotal_sums_line_extensions() {
        let order = two_line_order();
        assert_eq!(order.subtotal_cents(), 4200);
        assert_eq!(order.total_cents(), 4200);
    }

    #[test]
    fn rejects_orders_without_lines() {
        let err = Order::place(OrderId::new(1), AccountId::new(1), placed_at(), vec![])
            .expect_err("empty orders must fail");
        assert_eq!(err, OrderValidationError::EmptyLines);
    }

    #[test]
    fn rejects_zero_quantity_lines() {
        let err = Order::place(
            OrderId::new(1),
            AccountId::new(1),
            placed_at(),
            vec![line(9, "Bird Seed", 0, 500)],
        )
        .expect_err("zero quantities must fail");
        assert_eq!(
            err,
            OrderValidationError::ZeroQuantity {
                product_id: ProductId::new(9),
            }
        );
    }

    #[rstest]
    #[case(-50, 0)]
    #[case(500, 500)]
    #[case(10_000, 4200)]
    fn apply_discount_clamps_to_valid_range(#[case] requested: i64, #[case] stored: i64) {
        let mut order = two_line_order();
        order.apply_discount(requested);
        assert_eq!(order.discount_cents(), stored);
        assert_eq!(order.total_cents(), 4200 - stored);
    }

    #[test]
    fn mark_processed_is_terminal_and_idempotent() {
        let mut order = two_line_order();
        assert!(!order.is_processed());
        order.mark_processed();
        assert!(order.is_processed());
        order.mark_processed();
        assert_eq!(order.status(), OrderStatus::Processed);
    }

    #[test]
    fn receipt_reflects_order_state() {
        let mut order = two_line_order();
        order.apply_discount(200);
        order.mark_processed();

        let receipt = Receipt::from_order(&order);
        assert_eq!(receipt.order_id, OrderId::new(7));
        assert_eq!(receipt.status, OrderStatus::Processed);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].extension_cents, 2400);
        assert_eq!(receipt.lines[1].extension_cents, 1800);
        assert_eq!(receipt.subtotal_cents, 4200);
        assert_eq!(receipt.discount_cents, 200);
        assert_eq!(receipt.total_cents, 4000);
    }

    #[rstest]
    #[case("placed", OrderStatus::Placed)]
    #[case("processed", OrderStatus::Processed)]
    fn status_parses_canonical_names(#[case] name: &str, #[case] expected: OrderStatus) {
        assert_eq!(OrderStatus::parse(name).expect("known status"), expected);
        assert_eq!(expected.as_str(), name);
    }

    #[test]
    fn status_parse_rejects_unknown_names() {
        let err = OrderStatus::parse("shipped").expect_err("unknown status must fail");
        assert_eq!(
            err,
            OrderValidationError::UnknownStatus {
                name: "shipped".to_owned(),
            }
        );
    }
}
