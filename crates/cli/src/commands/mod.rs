//! Command implementations.

use std::io::{self, Write};

use cantera_admin::config::AdminConfig;
use cantera_admin::{AdminError, AdminState};
use cantera_storefront::StorefrontError;
use thiserror::Error;

pub mod audit;
pub mod cart;
pub mod content;
pub mod fill;
pub mod translations;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront setup or operation failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Back-office setup or operation failed.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The command needs the content store but it is not configured.
    #[error("Content store is not configured (set CONTENT_STORE_URL and CONTENT_STORE_ANON_KEY)")]
    ContentStoreNotConfigured,

    /// No published product has this slug.
    #[error("No product with slug '{0}'")]
    UnknownProduct(String),

    /// `audit --strict` found issues.
    #[error("Audit found {0} issue(s)")]
    AuditFailed(usize),
}

/// Build the back-office clients from the environment.
fn admin_state() -> Result<AdminState, CommandError> {
    let config = AdminConfig::from_env().map_err(AdminError::from)?;
    Ok(AdminState::new(config)?)
}

/// Write command output to stdout.
fn emit(render: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> Result<(), CommandError> {
    let mut out = io::stdout().lock();
    render(&mut out)?;
    out.flush()?;
    Ok(())
}
