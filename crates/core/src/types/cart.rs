//! Shopping cart lines.
//!
//! Carts are transient and owned by the browsing session; nothing here is
//! persisted. A quote request embeds the cart lines when it is submitted.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductColor};

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("quantity must be a positive integer (got {0})")]
    InvalidQuantity(i64),
    #[error("cart line {0} does not exist")]
    LineNotFound(usize),
    #[error("cart total is out of range")]
    Overflow,
}

/// A strictly positive item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, rejecting zero, negatives and values above `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for non-positive values.
    pub fn new(value: i64) -> Result<Self, CartError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(CartError::InvalidQuantity(value))
    }

    /// The count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    #[must_use]
    fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }
}

impl TryFrom<i64> for Quantity {
    type Error = CartError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product line in a cart.
///
/// `selected_color` is `None` for products without color variants. Whether
/// the selected size and color belong to the product is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub selected_size: String,
    pub selected_color: Option<ProductColor>,
    pub quantity: Quantity,
}

impl CartItem {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is not positive.
    pub fn new(
        product: Product,
        selected_size: impl Into<String>,
        selected_color: Option<ProductColor>,
        quantity: i64,
    ) -> Result<Self, CartError> {
        Ok(Self {
            product,
            selected_size: selected_size.into(),
            selected_color,
            quantity: Quantity::new(quantity)?,
        })
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if the product does not fit a `Decimal`.
    pub fn line_total(&self) -> Result<Decimal, CartError> {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity.get()))
            .ok_or(CartError::Overflow)
    }

    /// Whether two lines describe the same product, size and color.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        self.product.id == other.product.id
            && self.selected_size == other.selected_size
            && self.selected_color.as_ref().map(|c| &c.name)
                == other.selected_color.as_ref().map(|c| &c.name)
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add a line, merging it into an existing line for the same variant.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.same_variant(&item)) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if there is no such line.
    pub fn remove(&mut self, index: usize) -> Result<CartItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::LineNotFound(index));
        }
        Ok(self.items.remove(index))
    }

    /// Replace the quantity of the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the quantity is not
    /// positive. The cart is unchanged on error.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity)?;
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if a line or the sum is out of range.
    pub fn total(&self) -> Result<Decimal, CartError> {
        sum_lines(&self.items)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the lines out of the cart.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

/// Checked sum of line totals.
pub(crate) fn sum_lines(items: &[CartItem]) -> Result<Decimal, CartError> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.line_total()?).ok_or(CartError::Overflow)
    })
}
