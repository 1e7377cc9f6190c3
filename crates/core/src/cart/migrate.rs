//! Forward migration of persisted cart records.
//!
//! # Record history
//!
//! - **v1**: no `version` field; lines carry `price` as a float and `qty`;
//!   a single `timestamp` in epoch milliseconds.
//! - **v2**: `version: 2`; `qty` renamed to `quantity`, optional `sku` and
//!   `category`, RFC 3339 `createdAt`/`updatedAt`. Prices still floats.
//! - **v3**: the current [`Cart`] shape with decimal-string prices,
//!   per-line `maxQuantity`, `expiresAt` and `deviceId`.
//!
//! Records are upgraded one step at a time, so each step only has to know
//! about its immediate predecessor.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::state::CartRecord;
use super::{CURRENT_CART_VERSION, Cart, CartItem, CartSettings};
use crate::{DeviceId, ProductId};

/// Errors that can occur while reading a stored cart.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The record does not match the shape of its declared version.
    #[error("malformed v{version} cart record: {source}")]
    Malformed {
        version: u32,
        #[source]
        source: serde_json::Error,
    },

    /// The record is not a JSON object or has no recognisable version.
    #[error("unrecognised cart record: {0}")]
    Unrecognised(String),

    /// The record was written by a newer build.
    #[error("cart record version {found} is newer than supported version {current}")]
    UnsupportedVersion { found: u32, current: u32 },

    /// A timestamp is so far in the future that the expiry cannot be computed.
    #[error("cart timestamp {0} is out of range")]
    TimestampOutOfRange(DateTime<Utc>),

    /// A price could not be represented as a decimal.
    #[error("invalid price for item {id}: {value}")]
    InvalidPrice { id: ProductId, value: String },
}

/// Determine which schema version a stored record uses.
///
/// # Errors
///
/// Returns an error if the value is not an object, or has neither a
/// `version` field nor the legacy `items` array.
pub fn detect_version(value: &Value) -> Result<u32, MigrationError> {
    let object = value
        .as_object()
        .ok_or_else(|| MigrationError::Unrecognised("expected a JSON object".to_string()))?;

    match object.get("version") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| MigrationError::Unrecognised(format!("bad version number {n}"))),
        Some(other) => Err(MigrationError::Unrecognised(format!(
            "version must be a number, got {other}"
        ))),
        None if object.contains_key("items") => Ok(1),
        None => Err(MigrationError::Unrecognised(
            "missing version and items".to_string(),
        )),
    }
}

/// Upgrade a stored record of any known version to the current [`Cart`].
///
/// Item contents (id, name, price, quantity, image) are preserved. Missing
/// metadata is filled with defaults, quantities above the cap are clamped,
/// and totals are recomputed.
///
/// # Errors
///
/// Returns an error if the record is unrecognised, malformed, or newer than
/// [`CURRENT_CART_VERSION`].
pub fn migrate(
    value: Value,
    now: DateTime<Utc>,
    settings: &CartSettings,
) -> Result<Cart, MigrationError> {
    let version = detect_version(&value)?;

    if version > CURRENT_CART_VERSION {
        return Err(MigrationError::UnsupportedVersion {
            found: version,
            current: CURRENT_CART_VERSION,
        });
    }

    let record = match version {
        0 | 1 => {
            let v1 = parse::<CartV1>(value, 1)?;
            tracing::debug!(items = v1.items.len(), "Migrating cart record v1 -> v2");
            let v2 = v1.upgrade(now);
            tracing::debug!("Migrating cart record v2 -> v3");
            v2.upgrade(settings)?
        }
        2 => {
            let v2 = parse::<CartV2>(value, 2)?;
            tracing::debug!(items = v2.items.len(), "Migrating cart record v2 -> v3");
            v2.upgrade(settings)?
        }
        _ => parse::<CartRecord>(value, version)?,
    };

    Ok(Cart::from_migrated(record, settings))
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value, version: u32) -> Result<T, MigrationError> {
    serde_json::from_value(value).map_err(|source| MigrationError::Malformed { version, source })
}

// =============================================================================
// v1
// =============================================================================

#[derive(Debug, Deserialize)]
struct CartV1 {
    items: Vec<ItemV1>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ItemV1 {
    id: ProductId,
    name: String,
    price: Value,
    qty: u32,
    #[serde(default)]
    image: Option<String>,
}

impl CartV1 {
    fn upgrade(self, now: DateTime<Utc>) -> CartV2 {
        let stamp = self
            .timestamp
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(now);

        CartV2 {
            items: self
                .items
                .into_iter()
                .map(|item| ItemV2 {
                    id: item.id,
                    name: item.name,
                    price: item.price,
                    quantity: item.qty,
                    image: item.image,
                    sku: None,
                    category: None,
                })
                .collect(),
            created_at: stamp,
            updated_at: stamp,
            device_id: None,
        }
    }
}

// =============================================================================
// v2
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartV2 {
    items: Vec<ItemV2>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
struct ItemV2 {
    id: ProductId,
    name: String,
    price: Value,
    quantity: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl CartV2 {
    fn upgrade(self, settings: &CartSettings) -> Result<CartRecord, MigrationError> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(CartItem {
                    unit_price: legacy_price(item.id, &item.price)?,
                    id: item.id,
                    name: item.name,
                    quantity: item.quantity,
                    image: item.image,
                    sku: item.sku.unwrap_or_default(),
                    category: item.category.unwrap_or_default(),
                    max_quantity: settings.default_max_quantity,
                })
            })
            .collect::<Result<Vec<_>, MigrationError>>()?;

        let expires_at = self
            .updated_at
            .checked_add_signed(settings.retention)
            .ok_or(MigrationError::TimestampOutOfRange(self.updated_at))?;

        Ok(CartRecord {
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
            expires_at,
            device_id: self.device_id.unwrap_or_else(DeviceId::generate),
            version: CURRENT_CART_VERSION,
        })
    }
}

/// Convert a legacy float (or already-stringified) price to cents precision.
fn legacy_price(id: ProductId, value: &Value) -> Result<Decimal, MigrationError> {
    let invalid = || MigrationError::InvalidPrice {
        id,
        value: value.to_string(),
    };

    let decimal = match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64).ok_or_else(invalid)?,
        Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if decimal.is_sign_negative() {
        return Err(invalid());
    }

    Ok(decimal.round_dp(2))
}
