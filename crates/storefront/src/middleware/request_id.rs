//! Request ID middleware.
//!
//! The storefront runs behind the static host's reverse proxy, which may
//! already stamp an `x-request-id`. That id is kept so a failed Supabase call
//! in the storefront logs lines up with the proxy's access log; a missing or
//! empty header gets a fresh UUID v4. The id is tagged on the Sentry scope,
//! so a 502 reported by an admin can be traced to its backend error.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag the request with the proxy's id, or a new one, and echo it back.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Echoed so a bug report can quote it.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
