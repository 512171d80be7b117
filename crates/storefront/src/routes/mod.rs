//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! The three views come from the shared route table. Where they are mounted
//! depends on the deployment's history mode:
//!
//! ```text
//! # Path history
//! GET  /                            - Catalog page
//! GET  /di-admin                    - Product administration page
//! GET  /di-cotizaciones             - Quote administration page
//!
//! # Hash history
//! GET  /                            - Application shell (loads hash-router.js)
//! GET  /views/                      - Catalog fragment
//! GET  /views/di-admin              - Product administration fragment
//! GET  /views/di-cotizaciones       - Quote administration fragment
//!
//! # Both
//! POST /di-admin/productos          - Create product (redirects to the admin view)
//! POST /di-admin/productos/{id}/eliminar - Delete product (redirects to the admin view)
//! GET  /health                      - Health check
//! GET  /static/*                    - Stylesheet and scripts
//! *                                 - Canonical redirect or not-found view
//! ```

pub mod admin_orders;
pub mod admin_products;
pub mod catalog;
pub mod fallback;
pub mod shell;

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};
use chrono::{DateTime, Utc};
use di_catalog_core::{HistoryMode, RouteTable, View};
use rust_decimal::Decimal;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Prefix under which hash-mode view fragments are served.
pub const FRAGMENT_PREFIX: &str = "/views";

/// Directory holding the stylesheet and the hash router script.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

// =============================================================================
// Shared View Data
// =============================================================================

/// A navigation entry.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Data every page template needs from its surroundings.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: &'static str,
    /// Render only the view body (hash-mode fragment).
    pub fragment: bool,
    /// Render the hash-mode shell with the router script.
    pub shell: bool,
    pub nav: Vec<NavLink>,
}

impl Layout {
    /// Layout for a view rendered by its handler.
    ///
    /// Under hash history the view handlers only ever answer fragment
    /// requests; under path history they render full pages.
    #[must_use]
    pub fn for_view(state: &AppState, view: View) -> Self {
        Self::build(state, view, state.history() == HistoryMode::Hash)
    }

    /// Full-page layout regardless of history mode.
    #[must_use]
    pub fn page(state: &AppState, view: View) -> Self {
        Self::build(state, view, false)
    }

    /// Hash-mode application shell.
    #[must_use]
    pub fn shell(state: &AppState) -> Self {
        Self {
            shell: true,
            ..Self::build(state, View::Catalog, false)
        }
    }

    fn build(state: &AppState, view: View, fragment: bool) -> Self {
        let nav = state
            .routes()
            .routes()
            .iter()
            .map(|route| NavLink {
                label: route.view.title(),
                href: state.history().href(route.path),
                active: route.view == view,
            })
            .collect();

        Self {
            title: view.title(),
            fragment,
            shell: false,
            nav,
        }
    }
}

/// Format an amount as a price (e.g., "$349.50").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Format a backend timestamp for display (e.g., "01/03/2024 18:30").
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}

// =============================================================================
// Router
// =============================================================================

/// Mount point of a route's view fragment under hash history.
#[must_use]
pub fn fragment_path(path: &str) -> String {
    format!("{FRAGMENT_PREFIX}{path}")
}

fn view_handler(view: View) -> MethodRouter<AppState> {
    match view {
        View::Catalog => get(catalog::show),
        View::AdminProducts => get(admin_products::show),
        View::AdminOrders => get(admin_orders::show),
        View::NotFound => get(fallback::not_found),
    }
}

/// Create the view and admin action routes for a history mode.
pub fn routes(table: &RouteTable, mode: HistoryMode) -> Router<AppState> {
    let mut router = table
        .routes()
        .iter()
        .fold(Router::new(), |router, route| {
            let mount = match mode {
                HistoryMode::Path => route.path.to_string(),
                HistoryMode::Hash => fragment_path(route.path),
            };
            router.route(&mount, view_handler(route.view))
        });

    if mode == HistoryMode::Hash {
        router = router.route("/", get(shell::show));
    }

    router
        .route(admin_products::CREATE_PATH, post(admin_products::create))
        .route(admin_products::DELETE_PATH, post(admin_products::delete))
}

/// Build the complete application router with middleware.
pub fn app(state: AppState) -> Router {
    let table = *state.routes();
    let mode = state.history();

    Router::new()
        .route("/health", get(health))
        .merge(routes(&table, mode))
        .fallback(fallback::fallback)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not contact the backend.
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    /// State whose backend URL refuses connections.
    pub(crate) fn test_state(mode: HistoryMode) -> AppState {
        let history = mode.as_str().to_string();
        let config = StorefrontConfig::from_lookup(move |key| match key {
            "SUPABASE_URL" => Some("http://127.0.0.1:9".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon-key".to_string()),
            "ROUTER_HISTORY" => Some(history.clone()),
            _ => None,
        })
        .unwrap();
        AppState::new(config).unwrap()
    }

    pub(crate) async fn send(mode: HistoryMode, request: Request<Body>) -> Response {
        app(test_state(mode)).oneshot(request).await.unwrap()
    }

    pub(crate) async fn get(mode: HistoryMode, uri: &str) -> Response {
        send(mode, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub(crate) async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(3495, 1)), "$349.50");
        assert_eq!(format_price(Decimal::new(250, 0)), "$250.00");
        assert_eq!(format_price(Decimal::new(19999, 3)), "$20.00");
    }

    #[test]
    fn test_fragment_path() {
        assert_eq!(fragment_path("/"), "/views/");
        assert_eq!(fragment_path("/di-admin"), "/views/di-admin");
    }

    #[tokio::test]
    async fn test_health() {
        let response = get(HistoryMode::Path, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_security_and_request_id_headers() {
        let response = get(HistoryMode::Hash, "/health").await;
        let headers = response.headers();
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(headers.contains_key(crate::middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::get("/health")
            .header(crate::middleware::REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = send(HistoryMode::Path, request).await;
        assert_eq!(response.headers()[crate::middleware::REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn test_empty_request_id_is_replaced() {
        let request = Request::get("/health")
            .header(crate::middleware::REQUEST_ID_HEADER, "")
            .body(Body::empty())
            .unwrap();
        let response = send(HistoryMode::Path, request).await;
        let id = response.headers()[crate::middleware::REQUEST_ID_HEADER]
            .to_str()
            .unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_as_bad_gateway() {
        // Path mode mounts the catalog page at "/", which queries the backend.
        let response = get(HistoryMode::Path, "/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(response).await;
        assert!(!body.contains("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_hash_mode_serves_fragments_not_pages() {
        // Every view is reachable under the fragment prefix; the backend is
        // down, so the view handlers answer with 502 rather than 404.
        for path in ["/views/", "/views/di-admin", "/views/di-cotizaciones"] {
            let response = get(HistoryMode::Hash, path).await;
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY, "{path}");
        }
    }

    #[tokio::test]
    async fn test_path_mode_mounts_every_view() {
        for path in ["/", "/di-admin", "/di-cotizaciones"] {
            let response = get(HistoryMode::Path, path).await;
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY, "{path}");
        }
    }
}
