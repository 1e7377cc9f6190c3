//! Machine translation client.
//!
//! Speaks the LibreTranslate request shape: `POST {url}/translate` with
//! `{q, source, target, format, api_key}` and a `{translatedText}` reply.

use std::future::Future;
use std::sync::Arc;

use cantera_core::Locale;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::TranslateConfig;

/// Errors that can occur when calling the translation API.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The API answered without any text.
    #[error("Empty translation")]
    Empty,
}

/// Translates a single text between locales.
pub trait Translate: Send + Sync {
    fn translate(
        &self,
        text: &str,
        source: Locale,
        target: Locale,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP translation client.
#[derive(Clone)]
pub struct TranslateClient {
    inner: Arc<TranslateClientInner>,
}

struct TranslateClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<SecretString>,
}

impl TranslateClient {
    /// Create a new translation client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL cannot be built or the HTTP client
    /// fails to build.
    pub fn new(config: &TranslateConfig) -> Result<Self, TranslateError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let endpoint = Url::parse(&format!(
            "{}/translate",
            config.url.as_str().trim_end_matches('/')
        ))
        .map_err(|e| TranslateError::Parse(format!("Invalid endpoint: {e}")))?;

        Ok(Self {
            inner: Arc::new(TranslateClientInner {
                client,
                endpoint,
                api_key: config.api_key.clone(),
            }),
        })
    }
}

impl Translate for TranslateClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn translate(
        &self,
        text: &str,
        source: Locale,
        target: Locale,
    ) -> Result<String, TranslateError> {
        let body = TranslateRequest {
            q: text,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self
                .inner
                .api_key
                .as_ref()
                .map(|key| key.expose_secret()),
        };

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;
        parse_reply(reply)
    }
}

fn parse_reply(reply: TranslateResponse) -> Result<String, TranslateError> {
    if let Some(error) = reply.error {
        return Err(TranslateError::Api {
            status: 200,
            message: error,
        });
    }
    reply
        .translated_text
        .filter(|text| !text.trim().is_empty())
        .ok_or(TranslateError::Empty)
}
