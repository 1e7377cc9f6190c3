//! Errors raised while setting up the storefront runtime.
//!
//! Cart operations never fail; storage problems surface as cart notices.
//! Only initialisation can fail, with one of these.

use thiserror::Error;

use crate::config::ConfigError;
use crate::content::ContentError;
use crate::i18n::LocaleFileError;
use crate::storage::StorageError;

/// Storefront initialisation error.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bundled locale files could not be read.
    #[error("Locale files error: {0}")]
    LocaleFiles(#[from] LocaleFileError),

    /// The content store client could not be created.
    #[error("Content store error: {0}")]
    Content(#[from] ContentError),
}
