//! Verify configuration and backend connectivity.

use di_catalog_core::{Product, Quote};
use di_catalog_storefront::config::StorefrontConfig;
use di_catalog_storefront::supabase::{
    Order, PRODUCTS_TABLE, QUOTES_TABLE, SupabaseClient, SupabaseError,
};
use tracing::{info, warn};

/// Load configuration, then read one row from each table.
///
/// Rows are decoded into the catalog types, so a schema that drifted from
/// the expected shape fails here as well.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, the backend is
/// unreachable, or a row does not decode.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    info!(
        backend = %config.supabase.url,
        history = %config.history,
        addr = %config.socket_addr(),
        "Configuration loaded"
    );

    let client = SupabaseClient::new(&config.supabase)?;

    let newest = client
        .from(PRODUCTS_TABLE)
        .order("created_at", Order::Descending)
        .fetch_one::<Product>()
        .await;
    match newest {
        Ok(product) => info!(
            table = PRODUCTS_TABLE,
            newest = %product.name,
            created_at = %product.created_at,
            "Table reachable"
        ),
        Err(SupabaseError::NotFound(_)) => warn!(table = PRODUCTS_TABLE, "Table reachable but empty"),
        Err(e) => return Err(e.into()),
    }

    let quotes: Vec<Quote> = client.from(QUOTES_TABLE).limit(1).fetch().await?;
    info!(table = QUOTES_TABLE, rows = quotes.len(), "Table reachable");

    info!("Backend check passed");
    Ok(())
}
