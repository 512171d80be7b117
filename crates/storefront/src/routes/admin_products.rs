//! Product administration view and actions.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use di_catalog_core::{
    COLOR_PALETTE, ColorOption, Gender, NewProduct, Product, ProductColor, ProductError,
    ProductId, SizeType, View, find_color,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};

use super::catalog::ProductView;
use super::{Layout, format_timestamp};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::supabase::{Order, PRODUCTS_TABLE};

/// Form target for creating a product.
pub const CREATE_PATH: &str = "/di-admin/productos";

/// Form target for deleting a product.
pub const DELETE_PATH: &str = "/di-admin/productos/{id}/eliminar";

/// A product row in the admin table.
#[derive(Debug, Clone)]
pub struct AdminProductRow {
    pub product: ProductView,
    pub created_at: String,
    pub delete_action: String,
}

/// Select option for gender and size type inputs.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Product administration page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_products.html")]
pub struct AdminProductsTemplate {
    pub layout: Layout,
    pub products: Vec<AdminProductRow>,
    pub notice: Option<&'static str>,
    pub create_action: &'static str,
    pub genders: Vec<SelectOption>,
    pub size_types: Vec<SelectOption>,
    pub palette: &'static [ColorOption],
}

/// Outcome flags carried back by the post/redirect/get cycle.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub creado: Option<String>,
    pub eliminado: Option<String>,
}

impl NoticeQuery {
    fn notice(&self) -> Option<&'static str> {
        if self.creado.is_some() {
            Some("Producto creado")
        } else if self.eliminado.is_some() {
            Some("Producto eliminado")
        } else {
            None
        }
    }
}

/// Submitted product form.
///
/// Sizes and colors are comma-separated; colors are palette names.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub gender: String,
    pub price: String,
    pub size_type: String,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl ProductForm {
    /// Convert the form into a validated insert payload.
    ///
    /// # Errors
    ///
    /// Returns an error for an unparseable price, an unknown gender, size
    /// type or palette color, or a record that fails normalization.
    pub fn into_new_product(self) -> Result<NewProduct> {
        let price = parse_price(&self.price)?;
        let gender = Gender::from_str(self.gender.trim())?;
        let size_type = SizeType::from_str(self.size_type.trim())?;
        let available_colors = split_list(&self.colors)
            .map(|name| {
                find_color(name)
                    .map(|option| option.to_product_color(String::new()))
                    .ok_or_else(|| ProductError::UnknownColor(name.to_string()))
            })
            .collect::<std::result::Result<Vec<ProductColor>, _>>()?;

        let product = NewProduct {
            name: self.name,
            category: self.category,
            gender,
            price,
            size_type,
            available_sizes: split_list(&self.sizes).map(String::from).collect(),
            available_colors,
            image_url: self.image_url,
            description: self.description,
        };
        Ok(product.normalized()?)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a price typed by a person; accepts a decimal comma.
fn parse_price(value: &str) -> Result<Decimal> {
    let cleaned = value.trim().trim_start_matches('$').replace(',', ".");
    Decimal::from_str(&cleaned)
        .map_err(|_| AppError::BadRequest(format!("Precio inválido: {}", value.trim())))
}

/// Display the product table and the create form.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<AdminProductsTemplate> {
    let products: Vec<Product> = state
        .supabase()
        .from(PRODUCTS_TABLE)
        .order("created_at", Order::Descending)
        .fetch()
        .await?;

    let products = products
        .iter()
        .map(|product| AdminProductRow {
            product: ProductView::from(product),
            created_at: format_timestamp(product.created_at),
            delete_action: delete_action(&product.id),
        })
        .collect();

    Ok(AdminProductsTemplate {
        layout: Layout::for_view(&state, View::AdminProducts),
        products,
        notice: query.notice(),
        create_action: CREATE_PATH,
        genders: Gender::ALL
            .iter()
            .map(|g| SelectOption {
                value: g.as_str(),
                label: g.label(),
            })
            .collect(),
        size_types: [SizeType::TallasDisponibles, SizeType::TallaUnica]
            .iter()
            .map(|s| SelectOption {
                value: s.as_str(),
                label: s.label(),
            })
            .collect(),
        palette: &COLOR_PALETTE,
    })
}

/// Create a product and return to the admin view.
#[instrument(skip(state, form))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Result<Redirect> {
    let product = form.into_new_product()?;

    let created: Vec<Product> = state
        .supabase()
        .from(PRODUCTS_TABLE)
        .insert(&product)
        .await?;

    if let Some(product) = created.first() {
        info!(product_id = %product.id, name = %product.name, "Product created");
    }

    Ok(Redirect::to(&format!(
        "{}?creado=1",
        state.href(View::AdminProducts)
    )))
}

/// Delete a product and return to the admin view.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = ProductId::from_str(&id)
        .map_err(|_| AppError::NotFound(format!("producto {id}")))?;

    state
        .supabase()
        .from(PRODUCTS_TABLE)
        .eq("id", id)
        .delete()
        .await?;

    info!(product_id = %id, "Product deleted");

    Ok(Redirect::to(&format!(
        "{}?eliminado=1",
        state.href(View::AdminProducts)
    )))
}

fn delete_action(id: &ProductId) -> String {
    DELETE_PATH.replace("{id}", &id.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use di_catalog_core::{HistoryMode, ONE_SIZE};

    use super::*;
    use crate::routes::tests::{body_text, send};

    fn form() -> ProductForm {
        ProductForm {
            name: " Vestido midi ".to_string(),
            category: "Vestidos".to_string(),
            gender: "dama".to_string(),
            price: "1299.90".to_string(),
            size_type: "tallas_disponibles".to_string(),
            sizes: "CH, M, ,G".to_string(),
            colors: "negro, azul marino".to_string(),
            image_url: "https://cdn.example/vestido.jpg".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_form_into_new_product() {
        let product = form().into_new_product().unwrap();
        assert_eq!(product.name, "Vestido midi");
        assert_eq!(product.price, Decimal::new(129_990, 2));
        assert_eq!(product.available_sizes, vec!["CH", "M", "G"]);
        let colors: Vec<_> = product
            .available_colors
            .iter()
            .map(|c| (c.name.as_str(), c.hex.as_str()))
            .collect();
        assert_eq!(colors, vec![("Negro", "#000000"), ("Azul Marino", "#001F3F")]);
    }

    #[test]
    fn test_price_accepts_decimal_comma() {
        assert_eq!(parse_price("349,50").unwrap(), Decimal::new(34950, 2));
        assert_eq!(parse_price(" $120 ").unwrap(), Decimal::new(120, 0));
        assert!(matches!(parse_price("caro"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_single_size_form_gets_sentinel() {
        let product = ProductForm {
            size_type: "talla_unica".to_string(),
            sizes: String::new(),
            ..form()
        }
        .into_new_product()
        .unwrap();
        assert_eq!(product.available_sizes, vec![ONE_SIZE]);
    }

    #[test]
    fn test_unknown_color_is_rejected() {
        let err = ProductForm {
            colors: "Negro, Fucsia".to_string(),
            ..form()
        }
        .into_new_product()
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Product(ProductError::UnknownColor(ref name)) if name == "Fucsia"
        ));
    }

    #[test]
    fn test_notice() {
        let query = NoticeQuery {
            creado: Some("1".to_string()),
            eliminado: None,
        };
        assert_eq!(query.notice(), Some("Producto creado"));
        assert_eq!(NoticeQuery::default().notice(), None);
    }

    #[test]
    fn test_delete_action() {
        let id: ProductId = "0b7f3c8e-6a1d-4a53-9d53-3f1f9b0c2a11".parse().unwrap();
        assert_eq!(
            delete_action(&id),
            "/di-admin/productos/0b7f3c8e-6a1d-4a53-9d53-3f1f9b0c2a11/eliminar"
        );
    }

    #[tokio::test]
    async fn test_invalid_form_is_bad_request() {
        let request = Request::post(CREATE_PATH)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=&gender=dama&price=10&size_type=talla_unica",
            ))
            .unwrap();
        let response = send(HistoryMode::Hash, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("name"));
    }

    #[tokio::test]
    async fn test_delete_with_malformed_id_is_not_found() {
        let request = Request::post("/di-admin/productos/no-es-uuid/eliminar")
            .body(Body::empty())
            .unwrap();
        let response = send(HistoryMode::Path, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
