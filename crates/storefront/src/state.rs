//! Storefront runtime context shared by callers.

use std::sync::Arc;

use cantera_core::cart::CartNotice;
use cantera_core::i18n::Dictionaries;
use tokio::sync::Mutex;

use crate::cart::{CartStore, FlushHandle, spawn_flush_task};
use crate::config::StorefrontConfig;
use crate::content::ContentClient;
use crate::error::StorefrontError;
use crate::i18n::{Translator, load_dir};

/// Everything the shopper-facing side needs, built once at startup.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    cart: Arc<Mutex<CartStore>>,
    translator: Translator,
    content: Option<ContentClient>,
}

impl Storefront {
    /// Open storage, load the cart and bundled translations.
    ///
    /// Returns the notices produced while loading the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be opened, a locale file
    /// is invalid, or the content store client cannot be created.
    pub fn init(config: StorefrontConfig) -> Result<(Self, Vec<CartNotice>), StorefrontError> {
        let mut store = CartStore::open(&config)?;
        let notices = store.init();

        let bundled = if config.locales_dir.is_dir() {
            load_dir(&config.locales_dir)?
        } else {
            tracing::warn!(
                dir = %config.locales_dir.display(),
                "Locales directory not found, translations will fall back to keys"
            );
            Dictionaries::new()
        };

        let content = config
            .content_store
            .as_ref()
            .map(ContentClient::new)
            .transpose()?;

        let translator = Translator::new(bundled, content.clone(), config.translation_cache_ttl);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            privacy = store.privacy_enabled(),
            remote_content = content.is_some(),
            "Storefront initialised"
        );

        Ok((
            Self {
                inner: Arc::new(StorefrontInner {
                    config,
                    cart: Arc::new(Mutex::new(store)),
                    translator,
                    content,
                }),
            },
            notices,
        ))
    }

    /// Start the periodic cart flush using the configured interval.
    #[must_use]
    pub fn spawn_flush(&self) -> FlushHandle {
        spawn_flush_task(
            Arc::clone(&self.inner.cart),
            self.inner.config.cart.flush_interval,
        )
    }

    /// Get the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart(&self) -> &Arc<Mutex<CartStore>> {
        &self.inner.cart
    }

    /// Get the translator.
    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.inner.translator
    }

    /// Get the content client, if a content store is configured.
    #[must_use]
    pub fn content(&self) -> Option<&ContentClient> {
        self.inner.content.as_ref()
    }
}
