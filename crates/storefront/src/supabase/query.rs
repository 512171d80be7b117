//! Generic PostgREST query builder.
//!
//! Filters use PostgREST's `column=op.value` syntax; see
//! <https://postgrest.org/en/stable/references/api/tables_views.html>.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::SupabaseError;
use super::client::SupabaseClient;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A query against one table.
///
/// Built with [`SupabaseClient::from`] and finished by one of the terminal
/// operations (`fetch`, `fetch_one`, `insert`, `update`, `delete`).
#[derive(Debug, Clone)]
#[must_use = "a query does nothing until a terminal operation is awaited"]
pub struct QueryBuilder {
    client: SupabaseClient,
    table: String,
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl QueryBuilder {
    pub(crate) fn new(client: SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Columns to return (default `*`).
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter(column, "eq", value)
    }

    /// Keep rows where `column` differs from `value`.
    pub fn neq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter(column, "neq", value)
    }

    fn filter(mut self, column: &str, op: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{op}.{value}")));
        self
    }

    /// Sort by `column`. Later calls add secondary sort keys.
    pub fn order(mut self, column: &str, direction: Order) -> Self {
        self.order.push(format!("{column}.{}", direction.as_str()));
        self
    }

    /// Return at most `count` rows.
    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a row does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let request = self.request(Method::GET);
        self.client.send_rows(&self.table, request).await
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::NotFound` if no row matches, or any error
    /// from [`QueryBuilder::fetch`].
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let table = self.table.clone();
        self.limit(1)
            .fetch::<T>()
            .await?
            .into_iter()
            .next()
            .ok_or(SupabaseError::NotFound(table))
    }

    /// Insert one record (or a JSON array of records) and return the stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the insert.
    pub async fn insert<B, T>(self, body: &B) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.insert_request(body);
        self.client.send_rows(&self.table, request).await
    }

    /// Patch the filtered rows and return them.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Unfiltered` if no filter was set, or an error
    /// if the backend rejects the update.
    pub async fn update<B, T>(self, body: &B) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.require_filter("update")?;
        let request = self.update_request(body);
        self.client.send_rows(&self.table, request).await
    }

    /// Delete the filtered rows.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Unfiltered` if no filter was set, or an error
    /// if the backend rejects the delete.
    pub async fn delete(self) -> Result<(), SupabaseError> {
        self.require_filter("delete")?;
        let request = self.delete_request();
        self.client.send_empty(&self.table, request).await
    }

    fn insert_request<B: Serialize + ?Sized>(&self, body: &B) -> reqwest::RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(body)
    }

    fn update_request<B: Serialize + ?Sized>(&self, body: &B) -> reqwest::RequestBuilder {
        self.request(Method::PATCH)
            .header("Prefer", "return=representation")
            .json(body)
    }

    fn delete_request(&self) -> reqwest::RequestBuilder {
        self.request(Method::DELETE)
            .header("Prefer", "return=minimal")
    }

    fn require_filter(&self, action: &'static str) -> Result<(), SupabaseError> {
        if self.filters.is_empty() {
            return Err(SupabaseError::Unfiltered(action, self.table.clone()));
        }
        Ok(())
    }

    /// Full request URL for this query.
    pub(crate) fn url(&self, method: &Method) -> Url {
        let mut url = self.client.rest_url().clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.table);
        }

        {
            let mut pairs = url.query_pairs_mut();
            if *method == Method::GET || self.columns.is_some() {
                pairs.append_pair("select", self.columns.as_deref().unwrap_or("*"));
            }
            for (column, condition) in &self.filters {
                pairs.append_pair(column, condition);
            }
            if !self.order.is_empty() {
                pairs.append_pair("order", &self.order.join(","));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        let url = self.url(&method);
        self.client.request(method, url)
    }
}
