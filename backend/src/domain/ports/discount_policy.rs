//! Pricing port applied when an order is processed.
//!
//! The policy is synchronous: it computes over an order already in memory
//! and touches no infrastructure. Keeping it behind a trait lets processing
//! tests assert service behaviour with a scripted policy.

use crate::domain::order::Order;

/// Port computing the discount for an order being processed.
#[cfg_attr(test, mockall::automock)]
pub trait DiscountPolicy: Send + Sync {
    /// Discount to record on the order, in cents.
    ///
    /// Implementations read the order's lines and subtotal; they must not
    /// mutate the order. The caller records the returned amount and the
    /// order clamps it into the valid range.
    fn discount_cents(&self, order: &Order) -> i64;
}
