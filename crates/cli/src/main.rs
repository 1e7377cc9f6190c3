//! Cantera CLI - translation audits, cart and content tools.
//!
//! # Usage
//!
//! ```bash
//! # Check locale files for missing, duplicate and inconsistent keys
//! cantera audit --dir locales --strict
//!
//! # Fill missing keys through the translation API (or with placeholders)
//! cantera fill --dir locales
//!
//! # Work with the local cart
//! cantera cart add white-cement-25kg --quantity 3
//! cantera cart show
//! cantera cart privacy on
//!
//! # Sync locale files with the content store
//! cantera translations push --prune
//!
//! # List content tables
//! cantera content list products
//! cantera content catalog
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - log filter (default `cantera=info`)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - optional error tracking
//! - Storefront and admin variables as documented on their config types

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use cantera_core::Locale;
use clap::{Parser, Subcommand, ValueEnum};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cantera")]
#[command(author, version, about = "Cantera storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit locale files for missing, duplicate and inconsistent keys
    Audit {
        /// Directory holding `<locale>.json` files
        #[arg(long, default_value = "locales")]
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also report values identical to the reference locale
        #[arg(long)]
        untranslated: bool,

        /// Exit with an error when any issue is found
        #[arg(long)]
        strict: bool,
    },
    /// Fill missing keys in locale files
    Fill {
        /// Directory holding `<locale>.json` files
        #[arg(long, default_value = "locales")]
        dir: PathBuf,

        /// Show what would be written without touching the files
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect and change the local cart
    Cart {
        /// Locale for notices
        #[arg(long, default_value = "en")]
        locale: Locale,

        #[command(subcommand)]
        action: CartAction,
    },
    /// Sync locale files with the translations table
    Translations {
        #[command(subcommand)]
        action: TranslationsAction,
    },
    /// Browse content tables
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Add a product by slug
    Add {
        /// Product slug in the content store
        slug: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line (0 removes it)
    Update {
        /// Product id
        id: i64,
        /// New quantity
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: i64,
    },
    /// Remove every line
    Clear,
    /// Turn privacy mode on or off
    Privacy {
        #[arg(value_enum)]
        mode: Toggle,
    },
}

#[derive(Subcommand)]
enum TranslationsAction {
    /// Download the translations table into locale files
    Pull {
        /// Directory to write `<locale>.json` files to
        #[arg(long, default_value = "locales")]
        dir: PathBuf,
    },
    /// Upload locale files to the translations table
    Push {
        /// Directory holding `<locale>.json` files
        #[arg(long, default_value = "locales")]
        dir: PathBuf,

        /// Delete rows whose key no longer exists locally
        #[arg(long)]
        prune: bool,

        /// Print the plan without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// List the rows of a table
    List {
        #[arg(value_enum)]
        table: ContentTable,
    },
    /// List published products as shoppers see them
    Catalog,
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

/// Content tables that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentTable {
    Products,
    Projects,
    Articles,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before Sentry reads its DSN
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cantera=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Audit {
            dir,
            format,
            untranslated,
            strict,
        } => commands::audit::run(&dir, format, untranslated, strict)?,
        Commands::Fill { dir, dry_run } => commands::fill::run(&dir, dry_run).await?,
        Commands::Cart { locale, action } => {
            let action = match action {
                CartAction::Show { format } => commands::cart::Action::Show(format),
                CartAction::Add { slug, quantity } => {
                    commands::cart::Action::Add { slug, quantity }
                }
                CartAction::Update { id, quantity } => {
                    commands::cart::Action::Update { id, quantity }
                }
                CartAction::Remove { id } => commands::cart::Action::Remove { id },
                CartAction::Clear => commands::cart::Action::Clear,
                CartAction::Privacy { mode } => commands::cart::Action::Privacy(mode == Toggle::On),
            };
            commands::cart::run(action, locale).await?;
        }
        Commands::Translations { action } => match action {
            TranslationsAction::Pull { dir } => commands::translations::pull(&dir).await?,
            TranslationsAction::Push {
                dir,
                prune,
                dry_run,
            } => commands::translations::push(&dir, prune, dry_run).await?,
        },
        Commands::Content { action } => match action {
            ContentAction::List { table } => commands::content::list(table).await?,
            ContentAction::Catalog => commands::content::catalog().await?,
        },
    }
    Ok(())
}
