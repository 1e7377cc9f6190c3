//! Back-office clients shared across commands.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::content::RestClient;
use crate::error::AdminError;
use crate::services::TranslateClient;

/// Clients built from [`AdminConfig`].
#[derive(Clone)]
pub struct AdminState {
    inner: Arc<AdminStateInner>,
}

struct AdminStateInner {
    config: AdminConfig,
    store: RestClient,
    translator: Option<TranslateClient>,
}

impl AdminState {
    /// Build the content store client and, when configured, the
    /// translation client.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` if either HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, AdminError> {
        let store = RestClient::new(&config.content_store)?;
        let translator = config
            .translate
            .as_ref()
            .map(TranslateClient::new)
            .transpose()?;

        if translator.is_none() {
            tracing::info!("TRANSLATE_API_URL not set, missing keys will get placeholder text");
        }

        Ok(Self {
            inner: Arc::new(AdminStateInner {
                config,
                store,
                translator,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &RestClient {
        &self.inner.store
    }

    #[must_use]
    pub fn translator(&self) -> Option<&TranslateClient> {
        self.inner.translator.as_ref()
    }
}
