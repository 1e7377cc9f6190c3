//! PostgREST client using the service-role key.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{ContentError, Query, TableStore};
use crate::config::ContentStoreAdminConfig;

/// Client for the content store REST endpoint.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ContentStoreAdminConfig) -> Result<Self, ContentError> {
        let key = config.service_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| ContentError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| ContentError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        // Writes echo the stored rows back
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url: config.url.clone(),
            }),
        })
    }

    fn table_url(&self, table: &str, params: &[(String, String)]) -> Result<Url, ContentError> {
        table_url(&self.inner.base_url, table, params)
    }

    async fn read_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, ContentError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ContentError::Parse(e.to_string()))
    }
}

impl TableStore for RestClient {
    #[instrument(skip(self, query))]
    async fn select<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, ContentError> {
        let url = self.table_url(table, &query.to_params())?;
        let response = self.inner.client.get(url).send().await?;
        Self::read_rows(response).await
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    async fn insert<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        rows: &[I],
    ) -> Result<Vec<T>, ContentError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.table_url(table, &[])?;
        let response = self.inner.client.post(url).json(rows).send().await?;
        Self::read_rows(response).await
    }

    #[instrument(skip(self, patch))]
    async fn update<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        id: i64,
        patch: &I,
    ) -> Result<Vec<T>, ContentError> {
        let url = self.table_url(table, &[("id".to_string(), format!("eq.{id}"))])?;
        let response = self.inner.client.patch(url).json(patch).send().await?;
        Self::read_rows(response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: &str, id: i64) -> Result<usize, ContentError> {
        let url = self.table_url(table, &[("id".to_string(), format!("eq.{id}"))])?;
        let response = self.inner.client.delete(url).send().await?;
        let removed: Vec<serde_json::Value> = Self::read_rows(response).await?;
        Ok(removed.len())
    }
}

/// `{base}/rest/v1/{table}?...`
fn table_url(base: &Url, table: &str, params: &[(String, String)]) -> Result<Url, ContentError> {
    let mut url = Url::parse(&format!(
        "{}/rest/v1/{table}",
        base.as_str().trim_end_matches('/')
    ))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_table_url() {
        let base = Url::parse("https://content.cantera.test").unwrap();
        let query = Query::new().eq("slug", "lime-mortar").limit(1);
        let url = table_url(&base, "products", &query.to_params()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://content.cantera.test/rest/v1/products?select=*&slug=eq.lime-mortar&limit=1"
        );

        let url = table_url(&base, "articles", &[("id".to_string(), "eq.4".to_string())]).unwrap();
        assert_eq!(url.as_str(), "https://content.cantera.test/rest/v1/articles?id=eq.4");
    }

    #[test]
    fn test_rejects_invalid_key() {
        let config = ContentStoreAdminConfig {
            url: Url::parse("https://content.cantera.test").unwrap(),
            service_key: SecretString::from("line\nbreak"),
        };
        assert!(matches!(RestClient::new(&config), Err(ContentError::Parse(_))));
    }
}
