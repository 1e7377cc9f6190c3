//! Access to the hosted content tables.
//!
//! The tables speak PostgREST conventions. [`TableStore`] abstracts the four
//! operations the repositories need so they can run against the real
//! endpoint ([`RestClient`]) or an in-process copy ([`MemoryTables`]).
//!
//! There is no retry, no circuit breaker and no concurrent-edit protocol:
//! the last write wins, and any failure ends the triggering operation.

mod memory;
mod rest;

pub use memory::MemoryTables;
pub use rest::RestClient;

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when talking to the content store.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a request URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Failed to encode a request or decode a row.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The store cannot be used.
    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

/// Filters, ordering and limit for a select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    /// Sort by `column`.
    #[must_use]
    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    /// Return at most `limit` rows.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Equality filters as `(column, value)` pairs.
    #[must_use]
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Sort column and direction.
    #[must_use]
    pub fn order(&self) -> Option<(&str, bool)> {
        self.order
            .as_ref()
            .map(|(column, ascending)| (column.as_str(), *ascending))
    }

    /// Row limit.
    #[must_use]
    pub const fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// PostgREST query-string parameters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(
            self.filters
                .iter()
                .map(|(column, value)| (column.clone(), format!("eq.{value}"))),
        );
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Row-level access to named tables.
///
/// Every row has an integer `id` primary key assigned by the store.
pub trait TableStore: Send + Sync {
    /// Rows matching `query`.
    fn select<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<T>, ContentError>> + Send;

    /// Insert rows and return them as stored.
    fn insert<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        rows: &[I],
    ) -> impl Future<Output = Result<Vec<T>, ContentError>> + Send;

    /// Patch the row with `id` and return it as stored (empty if absent).
    fn update<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        id: i64,
        patch: &I,
    ) -> impl Future<Output = Result<Vec<T>, ContentError>> + Send;

    /// Delete the row with `id`; returns the number of rows removed.
    fn delete(
        &self,
        table: &str,
        id: i64,
    ) -> impl Future<Output = Result<usize, ContentError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = Query::new()
            .eq("language", "es")
            .eq("published", true)
            .order_by("key", true)
            .limit(50);
        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("language".to_string(), "eq.es".to_string()),
                ("published".to_string(), "eq.true".to_string()),
                ("order".to_string(), "key.asc".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }
}
