//! `cantera content`: browse the content tables.

use std::io::{self, Write};

use cantera_admin::AdminError;
use cantera_admin::db::{ArticleRepository, ProductRepository, ProjectRepository};
use cantera_core::content::{Article, Product, Project};
use cantera_storefront::StorefrontError;
use cantera_storefront::config::StorefrontConfig;
use cantera_storefront::content::ContentClient;

use super::{CommandError, admin_state, emit};
use crate::ContentTable;

/// Print every row of `table`.
///
/// # Errors
///
/// Returns an error if the admin configuration is invalid or the request
/// fails.
pub async fn list(table: ContentTable) -> Result<(), CommandError> {
    let state = admin_state()?;
    let store = state.store();

    match table {
        ContentTable::Products => {
            let rows = ProductRepository::new(store)
                .list_all()
                .await
                .map_err(AdminError::from)?;
            emit(|out| render_products(&rows, out))
        }
        ContentTable::Projects => {
            let rows = ProjectRepository::new(store)
                .list_all()
                .await
                .map_err(AdminError::from)?;
            emit(|out| render_projects(&rows, out))
        }
        ContentTable::Articles => {
            let rows = ArticleRepository::new(store)
                .list_all()
                .await
                .map_err(AdminError::from)?;
            emit(|out| render_articles(&rows, out))
        }
    }
}

/// Print the published products visible with the public key.
///
/// # Errors
///
/// Returns an error if the content store is not configured or the request
/// fails.
pub async fn catalog() -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env().map_err(StorefrontError::from)?;
    let store = config
        .content_store
        .as_ref()
        .ok_or(CommandError::ContentStoreNotConfigured)?;
    let client = ContentClient::new(store).map_err(StorefrontError::from)?;

    let products = client.list_products().await.map_err(StorefrontError::from)?;
    emit(|out| render_products(&products, out))
}

fn render_products(rows: &[Product], out: &mut dyn Write) -> io::Result<()> {
    for product in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            product.id,
            product.slug,
            product.name,
            product.price,
            if product.published { "published" } else { "draft" }
        )?;
    }
    writeln!(out, "{} product(s)", rows.len())
}

fn render_projects(rows: &[Project], out: &mut dyn Write) -> io::Result<()> {
    for project in rows {
        let year = project
            .completed_year
            .map_or_else(|| "-".to_string(), |year| year.to_string());
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            project.id,
            project.slug,
            project.title,
            project.location.as_deref().unwrap_or("-"),
            year
        )?;
    }
    writeln!(out, "{} project(s)", rows.len())
}

fn render_articles(rows: &[Article], out: &mut dyn Write) -> io::Result<()> {
    for article in rows {
        let date = article
            .published_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            article.id,
            article.slug,
            article.title,
            article.status.as_str(),
            date
        )?;
    }
    writeln!(out, "{} article(s)", rows.len())
}
