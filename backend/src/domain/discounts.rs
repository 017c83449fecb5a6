//! Standard discount rules applied when orders are processed.
//!
//! Two rules stack, in order:
//!
//! 1. Bulk line rule: every line of at least [`LINE_DISCOUNT_MIN_QUANTITY`]
//!    units earns [`LINE_DISCOUNT_PERCENT`] percent off that line's
//!    extension.
//! 2. Order rule: when the subtotal net of line discounts reaches
//!    [`ORDER_DISCOUNT_MIN_SUBTOTAL_CENTS`], a further
//!    [`ORDER_DISCOUNT_PERCENT`] percent comes off that net amount.
//!
//! All arithmetic is integer cents; percentages round down, so the shop
//! never grants fractional cents.

use crate::domain::order::Order;
use crate::domain::ports::DiscountPolicy;

/// Minimum units on a line before the bulk discount applies.
pub const LINE_DISCOUNT_MIN_QUANTITY: u32 = 10;
/// Percentage taken off qualifying line extensions.
pub const LINE_DISCOUNT_PERCENT: i64 = 5;
/// Net subtotal, in cents, at which the order discount starts.
pub const ORDER_DISCOUNT_MIN_SUBTOTAL_CENTS: i64 = 10_000;
/// Percentage taken off the net subtotal of qualifying orders.
pub const ORDER_DISCOUNT_PERCENT: i64 = 10;

/// Production discount policy combining the bulk and order rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDiscountPolicy;

impl DiscountPolicy for StandardDiscountPolicy {
    fn discount_cents(&self, order: &Order) -> i64 {
        let line_discount: i64 = order
            .lines()
            .iter()
            .filter(|line| line.quantity >= LINE_DISCOUNT_MIN_QUANTITY)
            .map(|line| line.extension_cents() * LINE_DISCOUNT_PERCENT / 100)
            .sum();

        let net_subtotal = order.subtotal_cents() - line_discount;
        let order_discount = if net_subtotal >= ORDER_DISCOUNT_MIN_SUBTOTAL_CENTS {
            net_subtotal * ORDER_DISCOUNT_PERCENT / 100
        } else {
            0
        };

        line_discount + order_discount
    }
}
