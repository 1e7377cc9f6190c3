//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (content management)
//! - `CONTENT_STORE_URL` - Hosted table store base URL
//! - `CONTENT_STORE_SERVICE_KEY` - Service-role API key (HIGH PRIVILEGE, bypasses
//!   row-level security)
//!
//! ## Optional (gap filling)
//! - `TRANSLATE_API_URL` - Machine translation endpoint base URL
//! - `TRANSLATE_API_KEY` - Machine translation API key
//!
//! Without a translation endpoint, gap filling inserts placeholders only.

use std::collections::HashMap;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Content store with write access
    pub content_store: ContentStoreAdminConfig,
    /// Machine translation endpoint (optional)
    pub translate: Option<TranslateConfig>,
}

/// Content store configuration with the service-role key.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE key.
#[derive(Clone)]
pub struct ContentStoreAdminConfig {
    /// Base URL, e.g. `https://project.example-host.co`
    pub url: Url,
    /// Service-role key (HIGH PRIVILEGE - full table access)
    pub service_key: SecretString,
}

impl std::fmt::Debug for ContentStoreAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStoreAdminConfig")
            .field("url", &self.url.as_str())
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Machine translation endpoint configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct TranslateConfig {
    /// Base URL; requests go to `{url}/translate`
    pub url: Url,
    /// API key, if the endpoint requires one
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for TranslateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = get_required_url(lookup, "CONTENT_STORE_URL")?;
        let service_key = get_validated_secret(lookup, "CONTENT_STORE_SERVICE_KEY")?;

        Ok(Self {
            content_store: ContentStoreAdminConfig { url, service_key },
            translate: TranslateConfig::from_lookup(lookup)?,
        })
    }
}

impl TranslateConfig {
    /// Load the translation endpoint from environment variables.
    ///
    /// Returns `None` when `TRANSLATE_API_URL` is unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is invalid.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    /// Load the translation endpoint from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is invalid.
    pub fn from_lookup(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        if lookup("TRANSLATE_API_URL").is_none() {
            return Ok(None);
        }
        Ok(Some(Self {
            url: get_required_url(lookup, "TRANSLATE_API_URL")?,
            api_key: lookup("TRANSLATE_API_KEY")
                .filter(|key| !key.is_empty())
                .map(SecretString::from),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a required variable.
fn get_required_env(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required variable as a URL.
fn get_required_url(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Url, ConfigError> {
    let value = get_required_env(lookup, key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= \
                 {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the content store."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret.
fn get_validated_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<SecretString, ConfigError> {
    let value = get_required_env(lookup, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
