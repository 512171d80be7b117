//! Quote administration view.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use di_catalog_core::{CartError, CartItem, Quote, View};
use tracing::{error, instrument, warn};

use super::{Layout, format_price, format_timestamp};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::supabase::{Order, QUOTES_TABLE};

/// Quote display data for templates.
#[derive(Debug, Clone)]
pub struct QuoteView {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub created_at: String,
    pub lines: Vec<QuoteLineView>,
    pub item_count: u64,
    pub total: String,
    /// Recomputed line total when it disagrees with the stored total.
    pub computed_total: Option<String>,
}

/// One requested product inside a quote.
#[derive(Debug, Clone)]
pub struct QuoteLineView {
    pub product_name: String,
    pub size: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl TryFrom<&CartItem> for QuoteLineView {
    type Error = CartError;

    fn try_from(item: &CartItem) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            product_name: item.product.name.clone(),
            size: item.selected_size.clone(),
            color: item.selected_color.as_ref().map(|c| c.name.clone()),
            quantity: item.quantity.get(),
            unit_price: format_price(item.product.price),
            line_total: format_price(item.line_total()?),
        })
    }
}

impl TryFrom<&Quote> for QuoteView {
    type Error = CartError;

    fn try_from(quote: &Quote) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: quote.id.to_string(),
            customer_name: quote.customer_name.clone(),
            customer_phone: quote.customer_phone.clone().filter(|p| !p.is_empty()),
            created_at: format_timestamp(quote.created_at),
            lines: quote
                .items
                .iter()
                .map(QuoteLineView::try_from)
                .collect::<std::result::Result<_, _>>()?,
            item_count: quote.item_count(),
            total: format_price(quote.total),
            computed_total: quote.total_mismatch()?.map(format_price),
        })
    }
}

/// Quote list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_orders.html")]
pub struct AdminOrdersTemplate {
    pub layout: Layout,
    pub quotes: Vec<QuoteView>,
}

/// Display submitted quotes, newest first.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<AdminOrdersTemplate> {
    let quotes: Vec<Quote> = state
        .supabase()
        .from(QUOTES_TABLE)
        .order("created_at", Order::Descending)
        .fetch()
        .await?;

    let mut views = Vec::with_capacity(quotes.len());
    for quote in &quotes {
        let view = QuoteView::try_from(quote).map_err(|e| {
            error!(quote_id = %quote.id, error = %e, "Quote row cannot be totalled");
            AppError::Record(e)
        })?;
        if let Some(computed) = &view.computed_total {
            warn!(
                quote_id = %quote.id,
                stored = %quote.total,
                computed = %computed,
                "Quote total does not match its lines"
            );
        }
        views.push(view);
    }

    Ok(AdminOrdersTemplate {
        layout: Layout::for_view(&state, View::AdminOrders),
        quotes: views,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rust_decimal::Decimal;

    use super::*;

    fn quote(total: f64) -> Quote {
        serde_json::from_value(serde_json::json!({
            "id": "5d1c1e2a-8f0b-4c39-a1f4-0e6a2b7d9c10",
            "customer_name": "Ana López",
            "customer_phone": "",
            "items": [{
                "product": {
                    "id": "0b7f3c8e-6a1d-4a53-9d53-3f1f9b0c2a11",
                    "name": "Blusa de lino",
                    "category": "Blusas",
                    "gender": "dama",
                    "price": 349.5,
                    "size_type": "tallas_disponibles",
                    "available_sizes": ["CH", "M"],
                    "available_colors": [],
                    "image_url": "",
                    "description": "",
                    "created_at": "2024-03-01T18:30:00Z"
                },
                "selectedSize": "M",
                "selectedColor": null,
                "quantity": 2
            }],
            "total": total,
            "created_at": "2024-03-02T09:05:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_quote_view() {
        let view = QuoteView::try_from(&quote(699.0)).unwrap();
        assert_eq!(view.customer_name, "Ana López");
        assert_eq!(view.customer_phone, None);
        assert_eq!(view.created_at, "02/03/2024 09:05");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "$699.00");
        assert_eq!(view.computed_total, None);

        let line = &view.lines[0];
        assert_eq!(line.size, "M");
        assert_eq!(line.color, None);
        assert_eq!(line.unit_price, "$349.50");
        assert_eq!(line.line_total, "$699.00");
    }

    #[test]
    fn test_mismatched_total_is_flagged() {
        let view = QuoteView::try_from(&quote(500.0)).unwrap();
        assert_eq!(view.total, "$500.00");
        assert_eq!(view.computed_total.as_deref(), Some("$699.00"));
    }

    #[test]
    fn test_out_of_range_quote_is_an_error() {
        let mut record = quote(1.0);
        record.items[0].product.price = Decimal::MAX;
        record.items[0].quantity = di_catalog_core::Quantity::new(2).unwrap();

        let err = QuoteView::try_from(&record).unwrap_err();
        assert_eq!(err, CartError::Overflow);
        assert_eq!(
            AppError::Record(err).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
