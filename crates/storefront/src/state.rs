//! Application state shared across handlers.

use std::sync::Arc;

use di_catalog_core::{HistoryMode, RouteTable, View};

use crate::config::StorefrontConfig;
use crate::supabase::{SupabaseClient, SupabaseError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the route table and configuration. It is built once at
/// startup; nothing in it changes afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    supabase: SupabaseClient,
    routes: RouteTable,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, SupabaseError> {
        let supabase = SupabaseClient::new(&config.supabase)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                routes: RouteTable::standard(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// Get the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    /// The URL addressing strategy of this deployment.
    #[must_use]
    pub fn history(&self) -> HistoryMode {
        self.inner.config.history
    }

    /// Link to a view under this deployment's history mode.
    #[must_use]
    pub fn href(&self, view: View) -> String {
        self.routes()
            .href(self.history(), view)
            .unwrap_or_else(|| self.history().href("/"))
    }
}
