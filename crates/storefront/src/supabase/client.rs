//! Shared PostgREST client handle.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::query::QueryBuilder;
use super::{ApiErrorBody, SupabaseError};
use crate::config::SupabaseConfig;

/// Path of the REST endpoint below the project URL.
const REST_PATH: &str = "rest/v1/";

/// How much of a response body to keep in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the hosted backend.
///
/// Cheap to clone; all clones share one connection pool. Building a client
/// performs no network I/O.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    rest_url: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.inner.rest_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Http` if the HTTP client cannot be initialized.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                rest_url: rest_url(&config.url),
                anon_key: config.anon_key.clone(),
            }),
        })
    }

    /// Start a query against `table`.
    #[must_use]
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(self.clone(), table)
    }

    /// Base URL of the REST endpoint.
    #[must_use]
    pub fn rest_url(&self) -> &Url {
        &self.inner.rest_url
    }

    /// Start a request carrying the API key headers.
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let key = self.inner.anon_key.expose_secret();
        self.inner
            .http
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Send a request and decode a JSON array of rows.
    #[instrument(skip(self, request))]
    pub(crate) async fn send_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, SupabaseError> {
        let body = self.send(request).await?;
        match serde_json::from_str::<Vec<T>>(&body) {
            Ok(rows) => {
                debug!(rows = rows.len(), "Backend query succeeded");
                Ok(rows)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&body),
                    "Backend rows did not match the expected schema"
                );
                Err(SupabaseError::Parse(e))
            }
        }
    }

    /// Send a request whose response body is ignored.
    #[instrument(skip(self, request))]
    pub(crate) async fn send_empty(
        &self,
        table: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), SupabaseError> {
        self.send(request).await.map(|_| ())
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Backend returned non-success status"
            );
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Build the REST endpoint from the project URL.
///
/// The project URL may carry a path prefix (self-hosted gateways do); it is
/// kept and treated as a directory.
fn rest_url(project_url: &Url) -> Url {
    let mut base = project_url.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(REST_PATH).unwrap_or(base)
}

/// Convert an error response into `SupabaseError::Api`.
fn api_error(status: u16, body: &str) -> SupabaseError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    SupabaseError::Api {
        status,
        message: parsed.message.unwrap_or_else(|| preview(body)),
        code: parsed.code,
        details: parsed.details,
        hint: parsed.hint,
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_client() -> SupabaseClient {
        let config = SupabaseConfig::new("https://abc.supabase.co", "anon-key").unwrap();
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn test_rest_url() {
        let url = |s: &str| rest_url(&Url::parse(s).unwrap()).to_string();
        assert_eq!(url("https://abc.supabase.co"), "https://abc.supabase.co/rest/v1/");
        assert_eq!(url("https://abc.supabase.co/"), "https://abc.supabase.co/rest/v1/");
        assert_eq!(
            url("https://gateway.example/supabase?x=1"),
            "https://gateway.example/supabase/rest/v1/"
        );
    }

    #[test]
    fn test_request_carries_api_key_headers() {
        let client = test_client();
        let request = client
            .request(reqwest::Method::GET, client.rest_url().clone())
            .build()
            .unwrap();
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_api_error_parses_postgrest_body() {
        let err = api_error(
            404,
            r#"{"code":"42P01","message":"relation \"public.prods\" does not exist","details":null,"hint":null}"#,
        );
        match err {
            SupabaseError::Api {
                status,
                message,
                code,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "relation \"public.prods\" does not exist");
                assert_eq!(code.as_deref(), Some("42P01"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(502, "Bad Gateway");
        assert!(matches!(err, SupabaseError::Api { ref message, .. } if message == "Bad Gateway"));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug_output = format!("{:?}", test_client());
        assert!(!debug_output.contains("anon-key"));
    }
}
