//! Cart line items and aggregate totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// One product line in the cart.
///
/// Name, price and image are cached from the catalog at the time the item was
/// added so the cart renders without a catalog round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Number of units, always in `1..=max_quantity`.
    pub quantity: u32,
    /// Product image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,
    /// Catalog category (e.g. "tiles", "cement").
    #[serde(default)]
    pub category: String,
    /// Highest quantity this line may hold.
    pub max_quantity: u32,
}

impl CartItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Input for adding a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    /// Units to add (added on top of any existing line).
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    /// Per-item cap; `None` or zero falls back to the configured default.
    #[serde(default)]
    pub max_quantity: Option<u32>,
}

impl NewCartItem {
    /// A single unit of a product with no extra metadata.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
            image: None,
            sku: String::new(),
            category: String::new(),
            max_quantity: None,
        }
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub const fn with_max_quantity(mut self, max_quantity: u32) -> Self {
        self.max_quantity = Some(max_quantity);
        self
    }

    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Aggregates derived from the line items.
///
/// Only ever produced by [`CartTotals::from_items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of quantities over all lines.
    pub item_count: u32,
    /// Number of distinct lines.
    pub line_count: usize,
    /// Sum of line totals.
    pub subtotal: Decimal,
}

impl CartTotals {
    /// Recount totals from scratch.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            item_count: acc.item_count.saturating_add(item.quantity),
            line_count: acc.line_count + 1,
            subtotal: acc.subtotal + item.line_total(),
        })
    }
}
