//! Public catalog view.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use di_catalog_core::{Gender, Product, ProductColor, SizeType, View};
use serde::Deserialize;
use tracing::instrument;

use super::{Layout, format_price};
use crate::error::Result;
use crate::state::AppState;
use crate::supabase::{Order, PRODUCTS_TABLE};

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub gender: &'static str,
    pub price: String,
    pub size_label: &'static str,
    pub sizes: Vec<String>,
    pub colors: Vec<ColorView>,
    pub image_url: String,
    pub description: String,
}

/// Color swatch display data for templates.
#[derive(Debug, Clone)]
pub struct ColorView {
    pub name: String,
    pub hex: String,
    pub image_url: String,
}

impl From<&ProductColor> for ColorView {
    fn from(color: &ProductColor) -> Self {
        Self {
            name: color.name.clone(),
            hex: color.hex.clone(),
            image_url: color.image_url.clone(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let sizes = match product.size_type {
            SizeType::TallaUnica => product.default_size().map(str::to_string).into_iter().collect(),
            SizeType::TallasDisponibles => product.available_sizes.clone(),
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            gender: product.gender.label(),
            price: format_price(product.price),
            size_label: product.size_type.label(),
            sizes,
            colors: product.available_colors.iter().map(ColorView::from).collect(),
            image_url: product.image_for(None).to_string(),
            description: product.description.clone(),
        }
    }
}

/// A filter link shown above the product grid.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub genero: Option<String>,
    pub categoria: Option<String>,
}

impl CatalogQuery {
    /// Parsed gender filter. Blank values mean no filter.
    fn gender(&self) -> Result<Option<Gender>> {
        match self.genero.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Ok(Some(value.to_lowercase().parse()?)),
        }
    }

    fn category(&self) -> Option<&str> {
        self.categoria
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub layout: Layout,
    pub products: Vec<ProductView>,
    pub gender_links: Vec<FilterLink>,
    pub category_links: Vec<FilterLink>,
    pub clear_href: Option<String>,
}

/// Display the product catalog, newest first.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let gender = query.gender()?;
    let category = query.category();

    let mut request = state
        .supabase()
        .from(PRODUCTS_TABLE)
        .order("created_at", Order::Descending);
    if let Some(gender) = gender {
        request = request.eq("gender", gender.as_str());
    }
    if let Some(category) = category {
        request = request.eq("category", category);
    }
    let products: Vec<Product> = request.fetch().await?;

    let base = state.href(View::Catalog);
    let gender_links = Gender::ALL
        .iter()
        .map(|g| FilterLink {
            label: g.label().to_string(),
            href: filter_href(&base, Some(g.as_str()), category),
            active: gender == Some(*g),
        })
        .collect();
    let category_links = categories(&products)
        .into_iter()
        .map(|c| FilterLink {
            href: filter_href(&base, gender.as_ref().map(Gender::as_str), Some(&c)),
            active: category == Some(c.as_str()),
            label: c,
        })
        .collect();

    Ok(CatalogTemplate {
        layout: Layout::for_view(&state, View::Catalog),
        products: products.iter().map(ProductView::from).collect(),
        gender_links,
        category_links,
        clear_href: (gender.is_some() || category.is_some()).then_some(base),
    })
}

/// Distinct categories in first-seen order.
fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Catalog link carrying the given filters.
fn filter_href(base: &str, gender: Option<&str>, category: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(gender) = gender {
        query.append_pair("genero", gender);
    }
    if let Some(category) = category {
        query.append_pair("categoria", category);
    }
    let query = query.finish();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}
