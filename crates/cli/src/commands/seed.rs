//! Seed the products table from a YAML file.
//!
//! The file is a list of products. Colors are given by palette name, with an
//! optional per-color image:
//!
//! ```yaml
//! - name: Blusa de lino
//!   category: Blusas
//!   gender: dama
//!   price: 349.50
//!   size_type: tallas_disponibles
//!   available_sizes: [CH, M, G]
//!   colors:
//!     - name: Negro
//!       image_url: https://cdn.example/blusa-negro.jpg
//!     - name: Beige
//!   image_url: https://cdn.example/blusa.jpg
//! ```

use std::path::Path;

use di_catalog_core::{Gender, NewProduct, Product, ProductError, SizeType, find_color};
use di_catalog_storefront::config::SupabaseConfig;
use di_catalog_storefront::supabase::{PRODUCTS_TABLE, SupabaseClient};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

/// A product entry that failed validation.
#[derive(Debug, Error)]
#[error("product #{index} ({name}): {source}")]
pub struct SeedError {
    pub index: usize,
    pub name: String,
    #[source]
    pub source: ProductError,
}

/// A color reference in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedColor {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

/// A product entry in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub gender: Gender,
    pub price: Decimal,
    pub size_type: SizeType,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<SeedColor>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl SeedProduct {
    /// Resolve palette colors and normalize into an insert payload.
    ///
    /// # Errors
    ///
    /// Returns an error for a color outside the palette or a record that
    /// fails normalization.
    pub fn into_new_product(self) -> Result<NewProduct, ProductError> {
        let available_colors = self
            .colors
            .iter()
            .map(|color| {
                find_color(&color.name)
                    .map(|option| option.to_product_color(color.image_url.trim()))
                    .ok_or_else(|| ProductError::UnknownColor(color.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        NewProduct {
            name: self.name,
            category: self.category,
            gender: self.gender,
            price: self.price,
            size_type: self.size_type,
            available_sizes: self.available_sizes,
            available_colors,
            image_url: self.image_url,
            description: self.description,
        }
        .normalized()
    }
}

/// Validate every entry, collecting all failures.
///
/// # Errors
///
/// Returns every entry that failed validation.
pub fn validate(entries: Vec<SeedProduct>) -> Result<Vec<NewProduct>, Vec<SeedError>> {
    let mut products = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let name = entry.name.clone();
        match entry.into_new_product() {
            Ok(product) => products.push(product),
            Err(source) => errors.push(SeedError {
                index: index + 1,
                name,
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Seed products from a YAML file.
///
/// The whole file is validated before anything is sent, so a bad entry
/// leaves the table untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, configuration is missing, or the backend rejects the insert.
pub async fn products(file: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Loading products from file");

    let content = tokio::fs::read_to_string(file).await?;
    let entries: Vec<SeedProduct> = serde_yaml::from_str(&content)?;
    info!(products = entries.len(), "Parsed seed file");

    let products = match validate(entries) {
        Ok(products) => products,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    if dry_run {
        info!(products = products.len(), "Seed file is valid (dry run, nothing inserted)");
        return Ok(());
    }
    if products.is_empty() {
        info!("Nothing to insert");
        return Ok(());
    }

    let config = SupabaseConfig::from_env()?;
    let client = SupabaseClient::new(&config)?;

    let inserted: Vec<Product> = client.from(PRODUCTS_TABLE).insert(&products).await?;
    for product in &inserted {
        info!(product_id = %product.id, name = %product.name, "Inserted");
    }
    info!(inserted = inserted.len(), "Seeding complete");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use di_catalog_core::ONE_SIZE;

    use super::*;

    const SEED: &str = r"
- name: Blusa de lino
  category: Blusas
  gender: dama
  price: 349.50
  size_type: tallas_disponibles
  available_sizes: [CH, M, G]
  colors:
    - name: negro
      image_url: https://cdn.example/blusa-negro.jpg
    - name: Beige
  image_url: https://cdn.example/blusa.jpg
- name: Gorra
  gender: hombre
  price: 199
  size_type: talla_unica
";

    #[test]
    fn test_seed_file_parses_and_validates() {
        let entries: Vec<SeedProduct> = serde_yaml::from_str(SEED).unwrap();
        let products = validate(entries).unwrap();
        assert_eq!(products.len(), 2);

        let blusa = &products[0];
        assert_eq!(blusa.price, Decimal::new(34950, 2));
        assert_eq!(blusa.available_colors[0].name, "Negro");
        assert_eq!(blusa.available_colors[0].hex, "#000000");
        assert_eq!(
            blusa.available_colors[0].image_url,
            "https://cdn.example/blusa-negro.jpg"
        );
        assert_eq!(blusa.available_colors[1].image_url, "");

        let gorra = &products[1];
        assert_eq!(gorra.available_sizes, vec![ONE_SIZE]);
        assert!(gorra.available_colors.is_empty());
    }

    #[test]
    fn test_validation_reports_every_bad_entry() {
        let yaml = r"
- name: Falda
  gender: dama
  price: 10
  size_type: tallas_disponibles
- name: Camisa
  gender: hombre
  price: 10
  size_type: talla_unica
  colors:
    - name: Fucsia
";
        let entries: Vec<SeedProduct> = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(entries).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[0].source, ProductError::NoSizes);
        assert_eq!(
            errors[1].source,
            ProductError::UnknownColor("Fucsia".to_string())
        );
        assert!(errors[1].to_string().starts_with("product #2 (Camisa)"));
    }

    #[test]
    fn test_unknown_gender_fails_to_parse() {
        let yaml = "- {name: X, gender: ninos, price: 1, size_type: talla_unica}";
        assert!(serde_yaml::from_str::<Vec<SeedProduct>>(yaml).is_err());
    }
}
