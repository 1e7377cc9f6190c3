//! Shopping cart model.
//!
//! The cart is a plain value mutated through [`Cart::apply`], a reducer over
//! [`CartAction`]s. Aggregate totals are recomputed from the line items after
//! every action and after every load, so they can never drift.
//!
//! Persistence lives in the storefront crate; this module only defines the
//! persisted record format and how older records are migrated forward.

pub mod item;
pub mod migrate;
pub mod notice;
pub mod state;

use chrono::{DateTime, TimeDelta, Utc};

pub use item::{CartItem, CartTotals, NewCartItem};
pub use migrate::{MigrationError, migrate};
pub use notice::{CartNotice, NoticeLevel};
pub use state::{Cart, CartAction};

/// Schema version written by this build.
pub const CURRENT_CART_VERSION: u32 = 3;

/// Per-line quantity cap used when a product does not specify one.
pub const DEFAULT_MAX_QUANTITY: u32 = 99;

/// How long an untouched cart is kept.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Tunables that shape cart mutations and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSettings {
    /// Time after the last mutation at which the cart expires.
    pub retention: TimeDelta,
    /// Cap applied to lines whose product has no explicit maximum.
    pub default_max_quantity: u32,
}

impl CartSettings {
    /// Normalise a per-item cap; zero means "use the default".
    #[must_use]
    pub const fn cap_for(&self, max_quantity: u32) -> u32 {
        if max_quantity == 0 {
            self.default_max_quantity
        } else {
            max_quantity
        }
    }

    /// Expiry of a cart last changed at `changed_at`.
    ///
    /// Saturates at the latest representable instant instead of overflowing.
    #[must_use]
    pub fn expiry_after(&self, changed_at: DateTime<Utc>) -> DateTime<Utc> {
        changed_at
            .checked_add_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            retention: TimeDelta::days(DEFAULT_RETENTION_DAYS),
            default_max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after_saturates() {
        let settings = CartSettings {
            retention: TimeDelta::MAX,
            ..CartSettings::default()
        };
        let now = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(settings.expiry_after(now), DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            CartSettings::default().expiry_after(now),
            now + TimeDelta::days(DEFAULT_RETENTION_DAYS)
        );
    }
}
