//! Table descriptions for the slug-addressed content tables.

use cantera_core::content::{
    Article, ArticleInput, Product, ProductInput, Project, ProjectInput,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A content table addressed by slug.
pub trait Table {
    /// Table name in the store.
    const NAME: &'static str;
    /// Column used for listings.
    const ORDER_BY: &'static str;
    /// Listing direction.
    const ASCENDING: bool = true;

    type Row: DeserializeOwned + Send;
    type Input: Serialize + Sync;

    fn id(row: &Self::Row) -> i64;
    fn slug(input: &Self::Input) -> &str;

    /// Check input before it is written.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    fn validate(input: &Self::Input) -> Result<(), String> {
        validate_slug(Self::slug(input))
    }
}

/// Slugs are lowercase ASCII words joined by single hyphens.
fn validate_slug(slug: &str) -> Result<(), String> {
    let valid = !slug.is_empty()
        && slug
            .split('-')
            .all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            });
    if valid {
        Ok(())
    } else {
        Err(format!("invalid slug '{slug}' (use lowercase words joined by hyphens)"))
    }
}

/// The `products` table.
#[derive(Debug, Clone, Copy)]
pub struct Products;

impl Table for Products {
    const NAME: &'static str = "products";
    const ORDER_BY: &'static str = "name";

    type Row = Product;
    type Input = ProductInput;

    fn id(row: &Product) -> i64 {
        row.id.as_i64()
    }

    fn slug(input: &ProductInput) -> &str {
        &input.slug
    }

    fn validate(input: &ProductInput) -> Result<(), String> {
        validate_slug(&input.slug)?;
        if input.name.trim().is_empty() {
            return Err("product name is empty".to_string());
        }
        if input.price < Decimal::ZERO {
            return Err(format!("negative price {}", input.price));
        }
        if input.max_quantity == Some(0) {
            return Err("max_quantity must be at least 1".to_string());
        }
        Ok(())
    }
}

/// The `projects` table.
#[derive(Debug, Clone, Copy)]
pub struct Projects;

impl Table for Projects {
    const NAME: &'static str = "projects";
    const ORDER_BY: &'static str = "completed_year";
    const ASCENDING: bool = false;

    type Row = Project;
    type Input = ProjectInput;

    fn id(row: &Project) -> i64 {
        row.id.as_i64()
    }

    fn slug(input: &ProjectInput) -> &str {
        &input.slug
    }
}

/// The `articles` table.
#[derive(Debug, Clone, Copy)]
pub struct Articles;

impl Table for Articles {
    const NAME: &'static str = "articles";
    const ORDER_BY: &'static str = "published_at";
    const ASCENDING: bool = false;

    type Row = Article;
    type Input = ArticleInput;

    fn id(row: &Article) -> i64 {
        row.id.as_i64()
    }

    fn slug(input: &ArticleInput) -> &str {
        &input.slug
    }

    fn validate(input: &ArticleInput) -> Result<(), String> {
        validate_slug(&input.slug)?;
        if input.title.trim().is_empty() {
            return Err("article title is empty".to_string());
        }
        Ok(())
    }
}
