//! Rows of the hosted content tables.
//!
//! # Tables
//!
//! - `products` - Catalog entries that can be added to the cart
//! - `projects` - Reference projects shown in the portfolio
//! - `articles` - News and guides
//! - `translations` - Flattened locale dictionaries (`key`, `value`, `language`)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::NewCartItem;
use crate::{ArticleId, ArticleStatus, Locale, ProductId, ProjectId, TranslationId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Per-order cap; `None` falls back to the cart default.
    #[serde(default)]
    pub max_quantity: Option<u32>,
    #[serde(default)]
    pub published: bool,
}

impl Product {
    /// Cart input for `quantity` units of this product.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> NewCartItem {
        NewCartItem {
            id: self.id,
            name: self.name.clone(),
            unit_price: self.price,
            quantity,
            image: self.image_url.clone(),
            sku: self.sku.clone(),
            category: self.category.clone(),
            max_quantity: self.max_quantity,
        }
    }
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub max_quantity: Option<u32>,
    #[serde(default)]
    pub published: bool,
}

/// A completed construction project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub completed_year: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Input for creating or replacing a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub completed_year: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// A news article or guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub body: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ArticleStatus,
}

/// Input for creating or replacing an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleInput {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub body: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ArticleStatus,
}

/// One flattened translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRow {
    pub id: TranslationId,
    pub key: String,
    pub value: String,
    pub language: Locale,
}

/// Input for inserting or updating a translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationInput {
    pub key: String,
    pub value: String,
    pub language: Locale,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_from_row() {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "slug": "white-cement-25kg",
            "name": "White cement 25kg",
            "category": "cement",
            "sku": "CEM-W-25",
            "price": "9.40",
            "max_quantity": 40,
            "published": true
        }))
        .unwrap();
        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.price, Decimal::new(940, 2));

        let item = product.to_cart_item(2);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.max_quantity, Some(40));
        assert_eq!(item.sku, "CEM-W-25");
    }

    #[test]
    fn test_translation_row_language() {
        let row: TranslationRow = serde_json::from_value(json!({
            "id": 1, "key": "nav.home", "value": "Inicio", "language": "es"
        }))
        .unwrap();
        assert_eq!(row.language, Locale::Es);
    }

    #[test]
    fn test_translation_rows_with_region_tags() {
        let rows: Vec<TranslationRow> = serde_json::from_value(json!([
            {"id": 1, "key": "nav.home", "value": "Início", "language": "pt-BR"},
            {"id": 2, "key": "nav.home", "value": "Home", "language": "EN"}
        ]))
        .unwrap();
        assert_eq!(rows[0].language, Locale::Pt);
        assert_eq!(rows[1].language, Locale::En);
    }
}
