//! Unmatched requests: canonical redirects and the not-found view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use di_catalog_core::{HistoryMode, View};
use tracing::debug;

use super::{FRAGMENT_PREFIX, Layout, fragment_path};
use crate::state::AppState;

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub catalog_href: String,
}

impl NotFoundTemplate {
    fn new(state: &AppState, fragment: bool) -> Self {
        Self {
            layout: Layout {
                fragment,
                ..Layout::page(state, View::NotFound)
            },
            catalog_href: state.href(View::Catalog),
        }
    }
}

/// Render the not-found view as a full page.
pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate::new(&state, false))
}

/// Handle any request no route matched.
///
/// A path that names a route in a non-canonical spelling (case, trailing
/// slash) is redirected to the canonical location for the active history
/// mode, keeping the query string. Everything else gets the not-found view.
pub async fn fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let mode = state.history();
    let is_fragment = mode == HistoryMode::Hash && uri.path().starts_with(FRAGMENT_PREFIX);

    if method == Method::GET || method == Method::HEAD {
        if let Some(target) = canonical_location(&state, &uri) {
            debug!(from = %uri, to = %target, "Redirecting to canonical route");
            return Redirect::permanent(&target).into_response();
        }
    }

    (StatusCode::NOT_FOUND, NotFoundTemplate::new(&state, is_fragment)).into_response()
}

/// Where a non-canonical request for a known route should go.
fn canonical_location(state: &AppState, uri: &Uri) -> Option<String> {
    let mode = state.history();
    let table = state.routes();
    let path = uri.path();

    let target = match mode {
        HistoryMode::Hash => match path.strip_prefix(FRAGMENT_PREFIX) {
            Some(rest) => {
                let rest = if rest.is_empty() { "/" } else { rest };
                fragment_path(table.path_of(table.resolve(rest)?)?)
            }
            None => table.href(mode, table.resolve(path)?)?,
        },
        HistoryMode::Path => table.path_of(table.resolve(path)?)?.to_string(),
    };

    Some(match uri.query() {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target,
    })
}
