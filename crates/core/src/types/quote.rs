//! Quote requests (cotizaciones) submitted from a cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{CartError, CartItem, sum_lines};
use super::id::QuoteId;

/// A quote request as stored in the backend's `quotes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Total recomputed from the line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if a line or the sum is out of range.
    pub fn items_total(&self) -> Result<Decimal, CartError> {
        sum_lines(&self.items)
    }

    /// The recomputed total when it disagrees with the stored one.
    ///
    /// Prices may change after a quote is submitted, so this is informational.
    ///
    /// # Errors
    ///
    /// See [`Quote::items_total`].
    pub fn total_mismatch(&self) -> Result<Option<Decimal>, CartError> {
        let computed = self.items_total()?;
        Ok((computed != self.total).then_some(computed))
    }

    /// Number of units requested.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::tests::sample_product;

    #[test]
    fn test_quote_deserializes_with_embedded_cart_items() {
        let item = serde_json::to_value(CartItem::new(sample_product(), "M", None, 2).unwrap())
            .unwrap();
        let quote: Quote = serde_json::from_value(serde_json::json!({
            "id": "6f0b2d8e-1c4b-4c3e-9a8e-2b9d7c6a5f40",
            "customer_name": "Ana",
            "items": [item],
            "total": 699,
            "created_at": "2024-03-02T10:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(quote.customer_phone, None);
        assert_eq!(quote.item_count(), 2);
        assert_eq!(quote.items_total().unwrap(), Decimal::new(699, 0));
        assert_eq!(quote.total_mismatch().unwrap(), None);
    }

    #[test]
    fn test_out_of_range_line_is_an_error_not_a_panic() {
        let mut product = serde_json::to_value(sample_product()).unwrap();
        product["price"] = serde_json::json!(1e20);
        let quote: Quote = serde_json::from_value(serde_json::json!({
            "id": "6f0b2d8e-1c4b-4c3e-9a8e-2b9d7c6a5f40",
            "customer_name": "Ana",
            "items": [{
                "product": product,
                "selectedSize": "M",
                "selectedColor": null,
                "quantity": 4_000_000_000_u32
            }],
            "total": 1,
            "created_at": "2024-03-02T10:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(quote.items_total(), Err(CartError::Overflow));
        assert_eq!(quote.total_mismatch(), Err(CartError::Overflow));
    }
}
