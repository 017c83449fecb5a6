//! Shopping cart held in the visitor's session.
//!
//! The cart stores product identifiers and quantities only; prices are
//! resolved against the catalogue when the cart is viewed or checked out, so
//! a long-lived cart always reflects current prices.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::catalogue::ProductId;

/// Validation errors raised when mutating a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartValidationError {
    /// Quantities must be at least one.
    ZeroQuantity,
}

impl fmt::Display for CartValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroQuantity => write!(f, "quantity must be at least 1"),
        }
    }
}

impl std::error::Error for CartValidationError {}

/// Product quantities selected by a visitor.
///
/// ## Invariants
/// - Every stored quantity is at least one; adding zero units is rejected
///   and entries are removed rather than set to zero.
///
/// # Examples
/// ```
/// use backend::domain::{Cart, ProductId};
///
/// let mut cart = Cart::default();
/// assert!(cart.is_empty());
/// cart.add(ProductId::new(4), 2).unwrap();
/// cart.add(ProductId::new(4), 1).unwrap();
/// assert_eq!(cart.quantity_of(ProductId::new(4)), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all products.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.values().map(|quantity| u64::from(*quantity)).sum()
    }

    /// Units of the given product currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items.get(&product_id).copied().unwrap_or(0)
    }

    /// Add units of a product, accumulating with any existing entry.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartValidationError> {
        if quantity == 0 {
            return Err(CartValidationError::ZeroQuantity);
        }
        let entry = self.items.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(quantity);
        Ok(())
    }

    /// Remove a product entirely from the cart.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.remove(&product_id);
    }

    /// Iterate entries in ascending product identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.items.iter().map(|(id, quantity)| (*id, *quantity))
    }
}
