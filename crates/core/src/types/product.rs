//! Product records as stored in the backend's `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Sentinel size stored for single-size products.
pub const ONE_SIZE: &str = "Única";

/// Target audience of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Dama,
    Hombre,
}

impl Gender {
    /// All genders, in display order.
    pub const ALL: [Self; 2] = [Self::Dama, Self::Hombre];

    /// Wire value (`dama` / `hombre`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dama => "dama",
            Self::Hombre => "hombre",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dama => "Dama",
            Self::Hombre => "Hombre",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dama" => Ok(Self::Dama),
            "hombre" => Ok(Self::Hombre),
            _ => Err(ProductError::InvalidGender(s.to_string())),
        }
    }
}

/// Whether a product comes in one size or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeType {
    TallaUnica,
    TallasDisponibles,
}

impl SizeType {
    /// Wire value (`talla_unica` / `tallas_disponibles`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TallaUnica => "talla_unica",
            Self::TallasDisponibles => "tallas_disponibles",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TallaUnica => "Talla única",
            Self::TallasDisponibles => "Tallas disponibles",
        }
    }
}

impl std::fmt::Display for SizeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SizeType {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "talla_unica" => Ok(Self::TallaUnica),
            "tallas_disponibles" => Ok(Self::TallasDisponibles),
            _ => Err(ProductError::InvalidSizeType(s.to_string())),
        }
    }
}

/// Errors raised when building product records from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("a product with several sizes needs at least one size")]
    NoSizes,
    #[error("invalid gender: {0}")]
    InvalidGender(String),
    #[error("invalid size type: {0}")]
    InvalidSizeType(String),
    #[error("unknown palette color: {0}")]
    UnknownColor(String),
}

/// A color variant of a product with its own display image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
    pub image_url: String,
}

/// A catalog product.
///
/// Rows are created, updated and deleted through the backend; this type only
/// declares the shape the backend returns. Deserialization is strict so a
/// drifted schema surfaces as an error rather than a half-filled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub gender: Gender,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub size_type: SizeType,
    pub available_sizes: Vec<String>,
    pub available_colors: Vec<ProductColor>,
    pub image_url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Size preselected for a new cart line.
    ///
    /// Single-size products always use their sentinel; otherwise the first
    /// listed size, if any.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        match self.size_type {
            SizeType::TallaUnica => Some(
                self.available_sizes
                    .first()
                    .map_or(ONE_SIZE, String::as_str),
            ),
            SizeType::TallasDisponibles => self.available_sizes.first().map(String::as_str),
        }
    }

    /// Whether the product offers color variants.
    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.available_colors.is_empty()
    }

    /// Find a color variant by name.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&ProductColor> {
        self.available_colors.iter().find(|c| c.name == name)
    }

    /// Image for the given color variant, falling back to the product image.
    #[must_use]
    pub fn image_for<'a>(&'a self, color: Option<&'a ProductColor>) -> &'a str {
        color
            .map(|c| c.image_url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.image_url)
    }
}

/// Insert payload for a new product.
///
/// The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub gender: Gender,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub size_type: SizeType,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub available_colors: Vec<ProductColor>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl NewProduct {
    /// Trim text fields, drop blank sizes and apply the single-size sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the price is negative, or a
    /// multi-size product ends up with no sizes.
    pub fn normalized(mut self) -> Result<Self, ProductError> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.image_url = self.image_url.trim().to_string();
        self.description = self.description.trim().to_string();
        self.available_sizes = self
            .available_sizes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if self.name.is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice);
        }

        match self.size_type {
            SizeType::TallaUnica => {
                if self.available_sizes.len() != 1 {
                    self.available_sizes = vec![ONE_SIZE.to_string()];
                }
            }
            SizeType::TallasDisponibles => {
                if self.available_sizes.is_empty() {
                    return Err(ProductError::NoSizes);
                }
            }
        }

        Ok(self)
    }
}
