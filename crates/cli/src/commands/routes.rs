//! Inspect the route table.

use di_catalog_core::{HistoryMode, RouteTable, View};
use tracing::{info, warn};

/// Log name, path and link of every route.
pub fn list(history: HistoryMode) {
    let table = RouteTable::standard();
    info!(%history, routes = table.routes().len(), "Route table");
    for route in table.routes() {
        info!(
            name = route.view.name(),
            path = route.path,
            href = %history.href(route.path),
            "{}",
            route.view.title()
        );
    }
}

/// Log the view a browser location opens.
pub fn resolve(history: HistoryMode, location: &str) -> View {
    let table = RouteTable::standard();
    let path = history.location_path(location);
    let view = table.resolve_location(history, location);

    if view == View::NotFound {
        warn!(%history, location, path = %path, "No route matches");
    } else {
        info!(%history, location, path = %path, view = view.name(), "{}", view.title());
    }
    view
}
