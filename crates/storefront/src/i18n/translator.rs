//! Runtime translation lookups.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cantera_core::Locale;
use cantera_core::cart::CartNotice;
use cantera_core::i18n::{Dictionaries, Dictionary, TranslationKey, interpolate};
use moka::future::Cache;

use crate::content::{ContentClient, ContentError};

/// Remote provider of translation tables.
pub trait TranslationSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the full dictionary for a locale.
    fn fetch(&self, locale: Locale) -> impl Future<Output = Result<Dictionary, Self::Error>> + Send;
}

impl TranslationSource for ContentClient {
    type Error = ContentError;

    async fn fetch(&self, locale: Locale) -> Result<Dictionary, ContentError> {
        self.dictionary(locale).await
    }
}

/// Translation lookups with a remote source and bundled fallback.
///
/// Remote tables are cached per locale. When the remote source fails or has
/// no rows for a locale, the bundled table is used and nothing is cached, so
/// the next lookup tries the remote source again.
#[derive(Clone)]
pub struct Translator<S = ContentClient> {
    inner: Arc<TranslatorInner<S>>,
}

struct TranslatorInner<S> {
    bundled: BTreeMap<Locale, Arc<Dictionary>>,
    source: Option<S>,
    cache: Cache<Locale, Arc<Dictionary>>,
}

impl Translator<ContentClient> {
    /// Translator that only uses bundled tables.
    #[must_use]
    pub fn offline(bundled: Dictionaries) -> Self {
        Self::new(bundled, None, Duration::from_secs(300))
    }
}

impl<S: TranslationSource> Translator<S> {
    /// Create a translator.
    ///
    /// # Arguments
    ///
    /// * `bundled` - Fallback dictionaries shipped with the application
    /// * `source` - Optional remote source
    /// * `ttl` - How long remote tables are cached
    #[must_use]
    pub fn new(bundled: Dictionaries, source: Option<S>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(Locale::ALL.len() as u64)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(TranslatorInner {
                bundled: bundled
                    .into_iter()
                    .map(|(locale, dictionary)| (locale, Arc::new(dictionary)))
                    .collect(),
                source,
                cache,
            }),
        }
    }

    /// Drop every cached remote table.
    pub fn reset(&self) {
        self.inner.cache.invalidate_all();
    }

    /// The dictionary to use for `locale`.
    pub async fn dictionary(&self, locale: Locale) -> Arc<Dictionary> {
        if let Some(source) = &self.inner.source {
            if let Some(cached) = self.inner.cache.get(&locale).await {
                return cached;
            }

            match source.fetch(locale).await {
                Ok(dictionary) if !dictionary.is_empty() => {
                    tracing::debug!(
                        %locale,
                        keys = dictionary.len(),
                        "Fetched remote translations"
                    );
                    let dictionary = Arc::new(dictionary);
                    self.inner.cache.insert(locale, Arc::clone(&dictionary)).await;
                    return dictionary;
                }
                Ok(_) => {
                    tracing::debug!(%locale, "No remote translations, using bundled table");
                }
                Err(e) => {
                    tracing::warn!(
                        %locale,
                        error = %e,
                        "Remote translations unavailable, using bundled table"
                    );
                }
            }
        }

        self.bundled(locale)
    }

    /// Text for `key`: requested locale, then the primary locale, then the
    /// key itself.
    pub async fn t(&self, locale: Locale, key: TranslationKey) -> String {
        if let Some(text) = self.dictionary(locale).await.typed().get(key) {
            return text.to_string();
        }
        if !locale.is_primary()
            && let Some(text) = self.dictionary(Locale::PRIMARY).await.typed().get(key)
        {
            tracing::debug!(%locale, %key, "Falling back to primary locale");
            return text.to_string();
        }
        tracing::debug!(%locale, %key, "Missing translation");
        key.as_str().to_string()
    }

    /// Text for `key` with `{name}` placeholders filled in.
    pub async fn t_with(
        &self,
        locale: Locale,
        key: TranslationKey,
        params: &[(&str, String)],
    ) -> String {
        interpolate(&self.t(locale, key).await, params)
    }

    /// User-facing message for a cart notice.
    pub async fn notice_message(&self, locale: Locale, notice: &CartNotice) -> String {
        self.t_with(locale, notice.translation_key(), &notice.params())
            .await
    }

    fn bundled(&self, locale: Locale) -> Arc<Dictionary> {
        self.inner
            .bundled
            .get(&locale)
            .cloned()
            .unwrap_or_default()
    }
}
