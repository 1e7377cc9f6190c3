//! Cart state and the reducer that mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CURRENT_CART_VERSION, CartItem, CartNotice, CartSettings, CartTotals, NewCartItem};
use crate::{DeviceId, ProductId};

/// A mutation requested by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add units of a product, merging with an existing line.
    Add(NewCartItem),
    /// Set a line's quantity; zero removes the line.
    UpdateQuantity { id: ProductId, quantity: u32 },
    /// Drop a line.
    Remove { id: ProductId },
    /// Drop every line.
    Clear,
}

/// The shopping cart of one device.
///
/// `totals` is private and only recomputed from `items`; deserializing a
/// cart also recomputes it, so stored totals are never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartRecord")]
pub struct Cart {
    items: Vec<CartItem>,
    totals: CartTotals,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    device_id: DeviceId,
    version: u32,
}

/// Wire shape of a current-version cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartRecord {
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub device_id: DeviceId,
    #[serde(default = "current_version")]
    pub version: u32,
}

const fn current_version() -> u32 {
    CURRENT_CART_VERSION
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        let totals = CartTotals::from_items(&record.items);
        Self {
            items: record.items,
            totals,
            created_at: record.created_at,
            updated_at: record.updated_at,
            expires_at: record.expires_at,
            device_id: record.device_id,
            version: record.version,
        }
    }
}

impl Cart {
    /// An empty cart created at `now`.
    #[must_use]
    pub fn new(device_id: DeviceId, now: DateTime<Utc>, settings: &CartSettings) -> Self {
        Self {
            items: Vec::new(),
            totals: CartTotals::default(),
            created_at: now,
            updated_at: now,
            expires_at: settings.expiry_after(now),
            device_id,
            version: CURRENT_CART_VERSION,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub const fn totals(&self) -> CartTotals {
        self.totals
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub const fn device_id(&self) -> DeviceId {
        self.device_id
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the retention window has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Apply an action and return the notices it produced.
    ///
    /// Any action that changes the cart refreshes `updated_at` and pushes
    /// `expires_at` out by the retention window.
    pub fn apply(
        &mut self,
        action: CartAction,
        now: DateTime<Utc>,
        settings: &CartSettings,
    ) -> Vec<CartNotice> {
        let mut notices = Vec::new();

        let changed = match action {
            CartAction::Add(new) => self.add(new, settings, &mut notices),
            CartAction::UpdateQuantity { id, quantity } => {
                self.update_quantity(id, quantity, &mut notices)
            }
            CartAction::Remove { id } => {
                let before = self.items.len();
                self.items.retain(|item| item.id != id);
                let removed = self.items.len() != before;
                if !removed {
                    notices.push(CartNotice::UnknownItem { id });
                }
                removed
            }
            CartAction::Clear => {
                self.items.clear();
                true
            }
        };

        if changed {
            self.updated_at = now;
            self.expires_at = settings.expiry_after(now);
        }
        self.totals = CartTotals::from_items(&self.items);

        notices
    }

    fn add(
        &mut self,
        new: NewCartItem,
        settings: &CartSettings,
        notices: &mut Vec<CartNotice>,
    ) -> bool {
        if new.quantity == 0 {
            return false;
        }

        let incoming_max = settings.cap_for(new.max_quantity.unwrap_or(0));
        if incoming_max == 0 {
            tracing::warn!(product_id = %new.id, "Ignoring add for a product capped at zero");
            return false;
        }

        if let Some(line) = self.items.iter_mut().find(|item| item.id == new.id) {
            line.max_quantity = line.max_quantity.min(incoming_max);
            let requested = line.quantity.saturating_add(new.quantity);
            line.quantity = requested.min(line.max_quantity);
            line.name = new.name;
            line.unit_price = new.unit_price;
            if new.image.is_some() {
                line.image = new.image;
            }
            if !new.sku.is_empty() {
                line.sku = new.sku;
            }
            if !new.category.is_empty() {
                line.category = new.category;
            }

            if requested > line.max_quantity {
                tracing::warn!(
                    product_id = %line.id,
                    requested,
                    max = line.max_quantity,
                    "Cart line capped at maximum quantity"
                );
                notices.push(CartNotice::QuantityCapped {
                    id: line.id,
                    name: line.name.clone(),
                    requested,
                    max: line.max_quantity,
                });
            }
        } else {
            let requested = new.quantity;
            let quantity = requested.min(incoming_max);

            if requested > incoming_max {
                tracing::warn!(
                    product_id = %new.id,
                    requested,
                    max = incoming_max,
                    "Cart line capped at maximum quantity"
                );
                notices.push(CartNotice::QuantityCapped {
                    id: new.id,
                    name: new.name.clone(),
                    requested,
                    max: incoming_max,
                });
            }

            self.items.push(CartItem {
                id: new.id,
                name: new.name,
                unit_price: new.unit_price,
                quantity,
                image: new.image,
                sku: new.sku,
                category: new.category,
                max_quantity: incoming_max,
            });
        }

        true
    }

    fn update_quantity(
        &mut self,
        id: ProductId,
        quantity: u32,
        notices: &mut Vec<CartNotice>,
    ) -> bool {
        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            notices.push(CartNotice::UnknownItem { id });
            return false;
        };

        if quantity == 0 {
            self.items.remove(position);
            return true;
        }

        let Some(line) = self.items.get_mut(position) else {
            return false;
        };

        if quantity > line.max_quantity {
            notices.push(CartNotice::QuantityCapped {
                id,
                name: line.name.clone(),
                requested: quantity,
                max: line.max_quantity,
            });
        }
        line.quantity = quantity.min(line.max_quantity);
        if line.quantity == 0 {
            self.items.remove(position);
        }

        true
    }

    /// Assemble a cart from migrated parts, enforcing caps and recounting.
    pub(crate) fn from_migrated(record: CartRecord, settings: &CartSettings) -> Self {
        let mut cart = Self::from(record);
        for item in &mut cart.items {
            item.max_quantity = settings.cap_for(item.max_quantity);
            item.quantity = item.quantity.min(item.max_quantity);
        }
        cart.items.retain(|item| item.quantity > 0);
        cart.version = CURRENT_CART_VERSION;
        cart.totals = CartTotals::from_items(&cart.items);
        cart
    }
}
