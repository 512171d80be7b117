//! Application shell for hash history.
//!
//! The shell is the only page a browser requests under hash history. It
//! carries the navigation and an empty view slot; `hash-router.js` fills the
//! slot with the fragment for the current `location.hash`.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use super::{FRAGMENT_PREFIX, Layout};
use crate::state::AppState;

/// Application shell template.
#[derive(Template, WebTemplate)]
#[template(path = "shell.html")]
pub struct ShellTemplate {
    pub layout: Layout,
    pub fragment_prefix: &'static str,
}

/// Serve the application shell.
pub async fn show(State(state): State<AppState>) -> ShellTemplate {
    ShellTemplate {
        layout: Layout::shell(&state),
        fragment_prefix: FRAGMENT_PREFIX,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use di_catalog_core::HistoryMode;

    use crate::routes::tests::{body_text, get};

    #[tokio::test]
    async fn test_shell_loads_hash_router() {
        let response = get(HistoryMode::Hash, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("/static/js/hash-router.js"));
        assert!(body.contains(r#"data-fragment-prefix="/views""#));
        assert!(body.contains(r##"href="/#/di-admin""##));
    }
}
