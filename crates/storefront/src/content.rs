//! Read-only client for the hosted content tables.
//!
//! Talks to a PostgREST-style endpoint (`{base}/rest/v1/{table}`) with the
//! public anon key, so row-level security decides what is visible. Product
//! lookups are cached using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use cantera_core::Locale;
use cantera_core::content::{Product, TranslationRow};
use cantera_core::i18n::Dictionary;
use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ContentStoreConfig;

/// Errors that can occur when reading from the content store.
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

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Option<Product>>),
}

/// Client for the public side of the content store.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ContentClient {
    /// Create a new content client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ContentStoreConfig) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .default_headers(auth_headers(config.api_key.expose_secret())?)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client,
                base_url: config.url.clone(),
                cache,
            }),
        })
    }

    /// All published products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ContentError> {
        let cache_key = "products".to_string();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = table_url(
            &self.inner.base_url,
            "products",
            &[("published", "eq.true".to_string()), ("order", "name.asc".to_string())],
        )?;
        let products = Arc::new(self.fetch::<Product>(url).await?);
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// A published product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, ContentError> {
        let cache_key = format!("product:{slug}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = table_url(
            &self.inner.base_url,
            "products",
            &[
                ("slug", format!("eq.{slug}")),
                ("published", "eq.true".to_string()),
                ("limit", "1".to_string()),
            ],
        )?;
        let product = self.fetch::<Product>(url).await?.into_iter().next();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Translation rows for one locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn translations(&self, locale: Locale) -> Result<Vec<TranslationRow>, ContentError> {
        let url = table_url(
            &self.inner.base_url,
            "translations",
            &[
                ("language", format!("eq.{}", locale.code())),
                ("order", "key.asc".to_string()),
            ],
        )?;
        self.fetch(url).await
    }

    /// Translation rows for one locale as a dictionary.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn dictionary(&self, locale: Locale) -> Result<Dictionary, ContentError> {
        Ok(self
            .translations(locale)
            .await?
            .into_iter()
            .map(|row| (row.key, row.value))
            .collect())
    }

    /// Drop all cached responses.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ContentError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_rows(status, &body)
    }
}

/// Decode a table response body, mapping non-success statuses to `Api`.
fn decode_rows<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Vec<T>, ContentError> {
    if !status.is_success() {
        return Err(ContentError::Api {
            status: status.as_u16(),
            message: body.to_string(),
        });
    }

    serde_json::from_str(body).map_err(|e| ContentError::Parse(e.to_string()))
}

/// Headers expected by the table store for a given key.
fn auth_headers(api_key: &str) -> Result<HeaderMap, ContentError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "apikey",
        HeaderValue::from_str(api_key)
            .map_err(|e| ContentError::Parse(format!("Invalid API key format: {e}")))?,
    );
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ContentError::Parse(format!("Invalid API key format: {e}")))?,
    );
    headers.insert("Accept", HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// `{base}/rest/v1/{table}?select=*&...`
fn table_url(base: &Url, table: &str, query: &[(&str, String)]) -> Result<Url, ContentError> {
    let mut url = Url::parse(&format!(
        "{}/rest/v1/{table}",
        base.as_str().trim_end_matches('/')
    ))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", "*");
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}
