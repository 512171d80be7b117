//! Client for the hosted backend (Supabase).
//!
//! # Architecture
//!
//! - Talks to the project's PostgREST endpoint (`{url}/rest/v1/{table}`)
//!   with `reqwest`
//! - The backend is the source of truth - NO local sync, no caching
//! - One [`SupabaseClient`] is built at startup and handed to every caller
//!   through `AppState`
//!
//! The client only offers a generic query capability; callers name the
//! table and filters themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use di_catalog_storefront::supabase::{Order, SupabaseClient};
//!
//! let client = SupabaseClient::new(&config.supabase)?;
//!
//! let products: Vec<Product> = client
//!     .from("products")
//!     .eq("gender", "dama")
//!     .order("created_at", Order::Descending)
//!     .fetch()
//!     .await?;
//! ```

mod client;
mod query;

pub use client::SupabaseClient;
pub use query::{Order, QueryBuilder};

use serde::Deserialize;
use thiserror::Error;

/// Table holding catalog products.
pub const PRODUCTS_TABLE: &str = "products";

/// Table holding quote requests.
pub const QUOTES_TABLE: &str = "quotes";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("{}", format_api_error(*.status, .message, .code.as_deref(), .hint.as_deref()))]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Response body did not match the expected record shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single row was requested but none matched.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Update or delete issued without any filter.
    #[error("refusing to {0} every row of '{1}' without a filter")]
    Unfiltered(&'static str, String),
}

/// Error body returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

fn format_api_error(status: u16, message: &str, code: Option<&str>, hint: Option<&str>) -> String {
    let mut out = format!("Backend error (HTTP {status})");
    if let Some(code) = code {
        out.push_str(&format!(" [{code}]"));
    }
    if !message.is_empty() {
        out.push_str(": ");
        out.push_str(message);
    }
    if let Some(hint) = hint {
        out.push_str(&format!(" (hint: {hint})"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_error_display() {
        let err = SupabaseError::NotFound("products".to_string());
        assert_eq!(err.to_string(), "Not found: products");
    }

    #[test]
    fn test_api_error_formatting() {
        let err = SupabaseError::Api {
            status: 400,
            message: "column products.colour does not exist".to_string(),
            code: Some("42703".to_string()),
            details: None,
            hint: Some("Perhaps you meant to reference the column \"colors\"".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Backend error (HTTP 400) [42703]: column products.colour does not exist \
             (hint: Perhaps you meant to reference the column \"colors\")"
        );
    }

    #[test]
    fn test_api_error_without_details() {
        let err = SupabaseError::Api {
            status: 503,
            message: String::new(),
            code: None,
            details: None,
            hint: None,
        };
        assert_eq!(err.to_string(), "Backend error (HTTP 503)");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SupabaseError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_unfiltered_error() {
        let err = SupabaseError::Unfiltered("delete", "products".to_string());
        assert_eq!(
            err.to_string(),
            "refusing to delete every row of 'products' without a filter"
        );
    }
}
