//! Route table and history strategies.
//!
//! One table maps URL paths to the three views. A [`HistoryMode`] decides how
//! a browser location encodes that path:
//!
//! ```text
//! Path:  https://tienda.example/di-admin
//! Hash:  https://tienda.example/#/di-admin
//! ```
//!
//! The mode is chosen once per deployment; both modes share the same table.

use serde::{Deserialize, Serialize};

/// Errors from routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown history mode '{0}' (expected 'path' or 'hash')")]
    UnknownHistoryMode(String),
}

/// A page view the router can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// Public product catalog.
    Catalog,
    /// Product administration.
    AdminProducts,
    /// Order and quote administration.
    AdminOrders,
    /// No route matched.
    NotFound,
}

impl View {
    /// Route name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::AdminProducts => "AdminProducts",
            Self::AdminOrders => "AdminOrders",
            Self::NotFound => "NotFound",
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Catalog => "Catálogo",
            Self::AdminProducts => "Administrar productos",
            Self::AdminOrders => "Cotizaciones",
            Self::NotFound => "Página no encontrada",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A path-to-view mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
}

const STANDARD_ROUTES: [Route; 3] = [
    Route {
        path: "/",
        view: View::Catalog,
    },
    Route {
        path: "/di-admin",
        view: View::AdminProducts,
    },
    Route {
        path: "/di-cotizaciones",
        view: View::AdminOrders,
    },
];

/// The application's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    /// The catalog, product admin and quote admin routes.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            routes: &STANDARD_ROUTES,
        }
    }

    #[must_use]
    pub const fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Resolve a route path to its view.
    ///
    /// Matching ignores case, a trailing slash, and any query string or
    /// fragment.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<View> {
        let wanted = normalize_path(path);
        self.routes
            .iter()
            .find(|route| route.path.eq_ignore_ascii_case(&wanted))
            .map(|route| route.view)
    }

    /// Resolve a browser location under the given history mode.
    ///
    /// Unmatched locations resolve to [`View::NotFound`].
    #[must_use]
    pub fn resolve_location(&self, mode: HistoryMode, location: &str) -> View {
        self.resolve(&mode.location_path(location))
            .unwrap_or(View::NotFound)
    }

    /// The path a view is mounted at.
    #[must_use]
    pub fn path_of(&self, view: View) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|route| route.view == view)
            .map(|route| route.path)
    }

    /// Link to a view under the given history mode.
    #[must_use]
    pub fn href(&self, mode: HistoryMode, view: View) -> Option<String> {
        self.path_of(view).map(|path| mode.href(path))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a route path is encoded in the browser URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// The URL path is the route. Deep links need server-side rewrites.
    Path,
    /// The route follows `#`. Works on static hosting with no rewrites.
    #[default]
    Hash,
}

impl HistoryMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Hash => "hash",
        }
    }

    /// Extract the route path from a browser location.
    ///
    /// `location` may be an absolute URL or an origin-relative one.
    #[must_use]
    pub fn location_path(&self, location: &str) -> String {
        match self {
            Self::Path => {
                let relative = strip_origin(location);
                let end = relative.find(['?', '#']).unwrap_or(relative.len());
                normalize_path(relative.get(..end).unwrap_or_default())
            }
            Self::Hash => location
                .split_once('#')
                .map_or_else(|| "/".to_string(), |(_, fragment)| normalize_path(fragment)),
        }
    }

    /// Build a link for a route path.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        match self {
            Self::Path => path.to_string(),
            Self::Hash => format!("/#{path}"),
        }
    }
}

impl std::fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HistoryMode {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "hash" => Ok(Self::Hash),
            _ => Err(RouteError::UnknownHistoryMode(s.to_string())),
        }
    }
}

/// Drop scheme and authority from an absolute URL.
fn strip_origin(location: &str) -> &str {
    location.split_once("://").map_or(location, |(_, rest)| {
        rest.find('/').and_then(|i| rest.get(i..)).unwrap_or("/")
    })
}

/// Leading slash, no trailing slash, no query string.
fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path.get(..end).unwrap_or_default().trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MODES: [HistoryMode; 2] = [HistoryMode::Path, HistoryMode::Hash];

    #[test]
    fn test_standard_table_has_three_routes() {
        let names: Vec<_> = RouteTable::standard()
            .routes()
            .iter()
            .map(|r| (r.path, r.view.name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("/", "Catalog"),
                ("/di-admin", "AdminProducts"),
                ("/di-cotizaciones", "AdminOrders"),
            ]
        );
    }

    #[test]
    fn test_resolve_each_route_under_both_modes() {
        let table = RouteTable::standard();
        for mode in MODES {
            for route in table.routes() {
                let href = mode.href(route.path);
                assert_eq!(
                    table.resolve_location(mode, &href),
                    route.view,
                    "{mode} {href}"
                );
            }
        }
    }

    #[test]
    fn test_modes_agree_on_name_to_path_mapping() {
        let table = RouteTable::standard();
        for route in table.routes() {
            let path_view =
                table.resolve_location(HistoryMode::Path, &HistoryMode::Path.href(route.path));
            let hash_view =
                table.resolve_location(HistoryMode::Hash, &HistoryMode::Hash.href(route.path));
            assert_eq!(path_view, hash_view);
        }
    }

    #[test]
    fn test_href_encoding() {
        let table = RouteTable::standard();
        assert_eq!(
            table.href(HistoryMode::Path, View::AdminProducts).unwrap(),
            "/di-admin"
        );
        assert_eq!(
            table.href(HistoryMode::Hash, View::AdminOrders).unwrap(),
            "/#/di-cotizaciones"
        );
        assert_eq!(table.href(HistoryMode::Hash, View::Catalog).unwrap(), "/#/");
        assert!(table.href(HistoryMode::Path, View::NotFound).is_none());
    }

    #[test]
    fn test_resolve_is_lenient_like_browser_router() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/di-admin/"), Some(View::AdminProducts));
        assert_eq!(table.resolve("/DI-Admin"), Some(View::AdminProducts));
        assert_eq!(table.resolve("/di-admin?tab=2"), Some(View::AdminProducts));
        assert_eq!(table.resolve(""), Some(View::Catalog));
        assert_eq!(table.resolve("di-cotizaciones"), Some(View::AdminOrders));
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/di-admin/extra"), None);
        assert_eq!(
            table.resolve_location(HistoryMode::Path, "/carrito"),
            View::NotFound
        );
        assert_eq!(
            table.resolve_location(HistoryMode::Hash, "/#/carrito"),
            View::NotFound
        );
    }

    #[test]
    fn test_location_path_from_absolute_urls() {
        assert_eq!(
            HistoryMode::Path.location_path("https://tienda.example/di-admin?x=1#top"),
            "/di-admin"
        );
        assert_eq!(HistoryMode::Path.location_path("https://tienda.example"), "/");
        assert_eq!(
            HistoryMode::Hash.location_path("https://tienda.example/#/di-cotizaciones"),
            "/di-cotizaciones"
        );
        assert_eq!(HistoryMode::Hash.location_path("https://tienda.example/"), "/");
        assert_eq!(HistoryMode::Hash.location_path("/#"), "/");
    }

    #[test]
    fn test_hash_mode_ignores_literal_path() {
        // Under hash history the server path never selects the view.
        let table = RouteTable::standard();
        assert_eq!(
            table.resolve_location(HistoryMode::Hash, "/di-admin"),
            View::Catalog
        );
    }

    #[test]
    fn test_history_mode_parse() {
        assert_eq!("path".parse::<HistoryMode>().unwrap(), HistoryMode::Path);
        assert_eq!(" HASH ".parse::<HistoryMode>().unwrap(), HistoryMode::Hash);
        assert_eq!(
            "memory".parse::<HistoryMode>(),
            Err(RouteError::UnknownHistoryMode("memory".to_string()))
        );
        assert_eq!(
            "history".parse::<HistoryMode>(),
            Err(RouteError::UnknownHistoryMode("history".to_string()))
        );
        assert_eq!(HistoryMode::default(), HistoryMode::Hash);
    }
}
