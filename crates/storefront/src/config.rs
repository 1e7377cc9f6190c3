//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CANTERA_DATA_DIR` - Directory for durable cart storage (default: .cantera)
//! - `CART_RETENTION_DAYS` - Days an untouched cart is kept, 1 to 3650 (default: 30)
//! - `CART_FLUSH_INTERVAL_SECS` - Periodic cart flush interval (default: 30)
//! - `CART_MAX_ITEM_QUANTITY` - Default per-line quantity cap, at least 1 (default: 99)
//! - `CART_STORAGE_QUOTA_BYTES` - Durable storage quota (default: 5242880)
//! - `LOCALES_DIR` - Directory with bundled `<locale>.json` files (default: locales)
//! - `TRANSLATION_CACHE_TTL_SECS` - Remote translation cache TTL (default: 300)
//! - `CONTENT_STORE_URL` - Hosted table store base URL
//! - `CONTENT_STORE_ANON_KEY` - Public (anon) API key for the table store
//!
//! The content store is only configured when both of its variables are set.

use std::path::PathBuf;
use std::time::Duration;

use cantera_core::cart::{CartSettings, DEFAULT_MAX_QUANTITY, DEFAULT_RETENTION_DAYS};
use chrono::TimeDelta;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing the durable storage tier
    pub data_dir: PathBuf,
    /// Cart persistence tunables
    pub cart: CartConfig,
    /// Directory with the bundled locale files
    pub locales_dir: PathBuf,
    /// How long remotely fetched translation tables are cached
    pub translation_cache_ttl: Duration,
    /// Hosted table store (read-only access)
    pub content_store: Option<ContentStoreConfig>,
}

/// Cart persistence configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartConfig {
    /// Days an untouched cart is kept
    pub retention_days: i64,
    /// Interval of the periodic flush
    pub flush_interval: Duration,
    /// Per-line cap for products without their own maximum
    pub max_item_quantity: u32,
    /// Byte quota of the durable storage tier
    pub storage_quota_bytes: u64,
}

/// Longest accepted cart retention window.
pub const MAX_RETENTION_DAYS: i64 = 3650;

/// Default durable storage quota, matching typical browser local storage.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            flush_interval: Duration::from_secs(30),
            max_item_quantity: DEFAULT_MAX_QUANTITY,
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
        }
    }
}

impl CartConfig {
    /// Settings for the cart reducer.
    #[must_use]
    pub fn settings(&self) -> CartSettings {
        CartSettings {
            retention: TimeDelta::try_days(self.retention_days).unwrap_or(TimeDelta::MAX),
            default_max_quantity: self.max_item_quantity,
        }
    }
}

/// Hosted table store connection.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ContentStoreConfig {
    /// Base URL, e.g. `https://project.example-host.co`
    pub url: Url,
    /// Anon API key (row-level security applies)
    pub api_key: SecretString,
}

impl std::fmt::Debug for ContentStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStoreConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CartConfig::default();

        let retention_days = parse_or(&lookup, "CART_RETENTION_DAYS", defaults.retention_days)?;
        if !(1..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(ConfigError::InvalidEnvVar(
                "CART_RETENTION_DAYS".to_string(),
                format!("must be between 1 and {MAX_RETENTION_DAYS}"),
            ));
        }

        let flush_secs = parse_or(
            &lookup,
            "CART_FLUSH_INTERVAL_SECS",
            defaults.flush_interval.as_secs(),
        )?;
        if flush_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_FLUSH_INTERVAL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let max_item_quantity =
            parse_or(&lookup, "CART_MAX_ITEM_QUANTITY", defaults.max_item_quantity)?;
        if max_item_quantity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_MAX_ITEM_QUANTITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let cart = CartConfig {
            retention_days,
            flush_interval: Duration::from_secs(flush_secs),
            max_item_quantity,
            storage_quota_bytes: parse_or(
                &lookup,
                "CART_STORAGE_QUOTA_BYTES",
                defaults.storage_quota_bytes,
            )?,
        };

        let content_store = match (lookup("CONTENT_STORE_URL"), lookup("CONTENT_STORE_ANON_KEY")) {
            (Some(url), Some(key)) => Some(ContentStoreConfig {
                url: Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar("CONTENT_STORE_URL".to_string(), e.to_string())
                })?,
                api_key: SecretString::from(key),
            }),
            (Some(_), None) => {
                tracing::warn!(
                    "CONTENT_STORE_URL set without CONTENT_STORE_ANON_KEY; remote content disabled"
                );
                None
            }
            _ => None,
        };

        Ok(Self {
            data_dir: PathBuf::from(
                lookup("CANTERA_DATA_DIR").unwrap_or_else(|| ".cantera".to_string()),
            ),
            cart,
            locales_dir: PathBuf::from(
                lookup("LOCALES_DIR").unwrap_or_else(|| "locales".to_string()),
            ),
            translation_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "TRANSLATION_CACHE_TTL_SECS",
                300,
            )?),
            content_store,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to a default when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
