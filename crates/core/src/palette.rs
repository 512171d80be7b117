//! Fixed color palette for product color selection.
//!
//! The palette is the only source of color choices offered to the admin
//! product form. Order is display order.

use serde::Serialize;

use crate::types::ProductColor;

/// A named color offered by selection widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorOption {
    /// Display name (Spanish, as shown to shoppers).
    pub name: &'static str,
    /// Hex code in `#RRGGBB` form.
    pub hex: &'static str,
}

impl ColorOption {
    const fn new(name: &'static str, hex: &'static str) -> Self {
        Self { name, hex }
    }

    /// Build a product color variant from this palette entry.
    #[must_use]
    pub fn to_product_color(&self, image_url: impl Into<String>) -> ProductColor {
        ProductColor {
            name: self.name.to_string(),
            hex: self.hex.to_string(),
            image_url: image_url.into(),
        }
    }
}

/// All colors, in display order.
pub const COLOR_PALETTE: [ColorOption; 15] = [
    ColorOption::new("Negro", "#000000"),
    ColorOption::new("Blanco", "#FFFFFF"),
    ColorOption::new("Gris", "#808080"),
    ColorOption::new("Gris Oscuro", "#404040"),
    ColorOption::new("Beige", "#D4C5B0"),
    ColorOption::new("Café", "#6F4E37"),
    ColorOption::new("Azul Marino", "#001F3F"),
    ColorOption::new("Azul", "#0074D9"),
    ColorOption::new("Azul Claro", "#7FDBFF"),
    ColorOption::new("Verde", "#2ECC40"),
    ColorOption::new("Verde Oscuro", "#3D5A3E"),
    ColorOption::new("Rojo", "#DC143C"),
    ColorOption::new("Rosa", "#FFB6C1"),
    ColorOption::new("Amarillo", "#FFD700"),
    ColorOption::new("Naranja", "#FF851B"),
];

/// The palette as a slice.
#[must_use]
pub const fn palette() -> &'static [ColorOption] {
    &COLOR_PALETTE
}

/// Look up a palette color by name, ignoring case and surrounding whitespace.
#[must_use]
pub fn find_color(name: &str) -> Option<&'static ColorOption> {
    let wanted = name.trim().to_lowercase();
    COLOR_PALETTE
        .iter()
        .find(|color| color.name.to_lowercase() == wanted)
}
