//! Integration tests for Cantera.
//!
//! The tests under `tests/` drive the storefront and admin crates together
//! against real files in temporary directories and the in-memory table
//! store. Nothing here needs network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cantera-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - cart persistence across restarts, expiry, quota and privacy
//! - `locale_files` - auditing and filling locale files on disk
//! - `translation_sync` - pushing and pulling the translations table

use std::path::Path;

use cantera_core::DeviceId;
use cantera_core::ProductId;
use cantera_core::cart::{CartSettings, NewCartItem};
use cantera_storefront::cart::{CartStore, ManualClock};
use cantera_storefront::storage::{FileStorage, MemoryStorage, StorageError};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// Start of every test clock.
#[must_use]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A cart store over a data directory, as one storefront process sees it.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened.
pub fn open_store(
    dir: &Path,
    quota_bytes: u64,
    session: MemoryStorage,
    clock: ManualClock,
) -> Result<CartStore, StorageError> {
    let durable = FileStorage::open(dir, quota_bytes)?;
    Ok(CartStore::new(
        durable,
        session,
        clock,
        CartSettings::default(),
    ))
}

/// Catalog item used across tests.
#[must_use]
pub fn cement(quantity: u32) -> NewCartItem {
    NewCartItem::new(ProductId::new(1), "White cement 25kg", Decimal::new(950, 2))
        .with_sku("WC-25")
        .with_category("cement")
        .with_quantity(quantity)
}

/// Second catalog item used across tests.
#[must_use]
pub fn tile(quantity: u32) -> NewCartItem {
    NewCartItem::new(ProductId::new(2), "Porcelain tile 60x60", Decimal::new(2490, 2))
        .with_sku("PT-6060")
        .with_category("tiles")
        .with_max_quantity(40)
        .with_quantity(quantity)
}

/// Write a locale file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_locale(dir: &Path, code: &str, json: &str) -> std::io::Result<()> {
    std::fs::write(dir.join(format!("{code}.json")), json)
}

/// Parse a device id stored as plain text.
#[must_use]
pub fn parse_device_id(raw: &str) -> Option<DeviceId> {
    DeviceId::parse(raw.trim()).ok()
}
