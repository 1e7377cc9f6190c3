//! Unified error handling for admin.

use thiserror::Error;

use crate::config::ConfigError;
use crate::content::ContentError;
use crate::db::RepositoryError;
use crate::services::TranslateError;

/// Top-level error for back-office operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content store request failed.
    #[error("Content store error: {0}")]
    Content(#[from] ContentError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Translation API client could not be built.
    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_error_display() {
        let err = AdminError::from(RepositoryError::NotFound);
        assert_eq!(err.to_string(), "Repository error: not found");

        let err = AdminError::from(ConfigError::MissingEnvVar("CONTENT_STORE_URL".to_string()));
        assert!(err.to_string().contains("CONTENT_STORE_URL"));
    }
}
