//! Print the product color palette.

use di_catalog_core::palette;
use tracing::info;

/// Log every palette entry in display order.
pub fn list() {
    for (position, color) in palette().iter().enumerate() {
        info!(position = position + 1, hex = color.hex, "{}", color.name);
    }
}
