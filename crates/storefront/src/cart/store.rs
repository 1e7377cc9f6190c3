//! The cart store: reducer plus persistence across storage tiers.

use cantera_core::cart::migrate::detect_version;
use cantera_core::cart::{
    CURRENT_CART_VERSION, Cart, CartAction, CartNotice, CartSettings, NewCartItem, migrate,
};
use cantera_core::{DeviceId, ProductId, StorageTier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::clock::{Clock, SystemClock};
use crate::config::StorefrontConfig;
use crate::storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};

/// Storage key of the persisted cart record.
pub const CART_KEY: &str = "cantera_cart";
/// Storage key of the privacy preference (`"true"` / `"false"`).
pub const PRIVACY_KEY: &str = "cantera_cart_privacy";
/// Storage key of the device identifier.
pub const DEVICE_ID_KEY: &str = "cantera_device_id";

/// Result of a cart operation: the cart after the operation plus any
/// notices to show the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartUpdate {
    pub cart: Cart,
    pub notices: Vec<CartNotice>,
}

/// Owns the current cart and decides where it is persisted.
///
/// The store is an explicit context: nothing is global, and [`Self::reset`]
/// drops all in-memory state so the next access reloads from storage.
///
/// # Tiers
///
/// Writes go to the durable tier unless privacy mode is on or the durable
/// tier has run out of quota during this session, in which case the session
/// tier is used. Storage failures never fail a cart operation; they are
/// reported as [`CartNotice`]s instead.
pub struct CartStore {
    durable: Box<dyn StorageBackend>,
    session: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    settings: CartSettings,
    privacy: bool,
    session_only: bool,
    cart: Option<Cart>,
    dirty: bool,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("settings", &self.settings)
            .field("privacy", &self.privacy)
            .field("session_only", &self.session_only)
            .field("loaded", &self.cart.is_some())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store over the given tiers. Nothing is read until
    /// [`Self::init`] or the first operation.
    pub fn new(
        durable: impl StorageBackend + 'static,
        session: impl StorageBackend + 'static,
        clock: impl Clock + 'static,
        settings: CartSettings,
    ) -> Self {
        Self {
            durable: Box::new(durable),
            session: Box::new(session),
            clock: Box::new(clock),
            settings,
            privacy: false,
            session_only: false,
            cart: None,
            dirty: false,
        }
    }

    /// Create a store with file-backed durable storage from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: &StorefrontConfig) -> Result<Self, StorageError> {
        let durable = FileStorage::open(&config.data_dir, config.cart.storage_quota_bytes)?;
        Ok(Self::new(
            durable,
            MemoryStorage::new(),
            SystemClock,
            config.cart.settings(),
        ))
    }

    /// Read the privacy preference and load the stored cart.
    pub fn init(&mut self) -> Vec<CartNotice> {
        self.privacy = self.read_privacy();
        self.load()
    }

    /// (Re)load the cart from storage, replacing the in-memory one.
    ///
    /// Expired and unreadable records are discarded; when nothing usable is
    /// stored a new empty cart is started.
    pub fn load(&mut self) -> Vec<CartNotice> {
        let now = self.clock.now();
        let (cart, notices) = self.load_cart(now);
        self.cart = Some(cart);
        notices
    }

    /// Forget all in-memory state. Stored data is left alone.
    pub fn reset(&mut self) {
        self.cart = None;
        self.privacy = false;
        self.session_only = false;
        self.dirty = false;
    }

    /// The current cart, loading it first if needed.
    pub fn snapshot(&mut self) -> CartUpdate {
        let (cart, notices) = self.take_current();
        self.cart = Some(cart.clone());
        CartUpdate { cart, notices }
    }

    /// Add units of a product.
    pub fn add(&mut self, item: NewCartItem) -> CartUpdate {
        self.dispatch(CartAction::Add(item))
    }

    /// Set the quantity of a line; zero removes it.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> CartUpdate {
        self.dispatch(CartAction::UpdateQuantity { id, quantity })
    }

    /// Remove a line.
    pub fn remove(&mut self, id: ProductId) -> CartUpdate {
        self.dispatch(CartAction::Remove { id })
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartUpdate {
        self.dispatch(CartAction::Clear)
    }

    /// Write the current cart if it has unsaved changes.
    pub fn flush(&mut self) -> Vec<CartNotice> {
        if !self.dirty {
            return Vec::new();
        }
        let Some(cart) = self.cart.take() else {
            return Vec::new();
        };
        let notices = self.persist(&cart);
        self.cart = Some(cart);
        notices
    }

    /// Turn privacy mode on or off.
    ///
    /// Enabling moves the cart and device id out of the durable tier.
    /// Disabling moves them back unless the durable tier is full.
    pub fn set_privacy(&mut self, enabled: bool) -> Vec<CartNotice> {
        let (cart, mut notices) = self.take_current();
        self.privacy = enabled;

        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.durable.set(PRIVACY_KEY, value) {
            tracing::warn!(error = %e, "Failed to store privacy preference");
        }

        if enabled {
            self.move_key(DEVICE_ID_KEY, StorageTier::Durable, StorageTier::Session);
            self.remove_key(StorageTier::Durable, CART_KEY);
        } else if !self.session_only {
            self.move_key(DEVICE_ID_KEY, StorageTier::Session, StorageTier::Durable);
        }

        notices.extend(self.persist(&cart));
        if !enabled && !self.session_only && !self.dirty {
            self.remove_key(StorageTier::Session, CART_KEY);
        }
        self.cart = Some(cart);

        tracing::info!(enabled, "Cart privacy mode changed");
        notices
    }

    /// Whether privacy mode is on.
    #[must_use]
    pub const fn privacy_enabled(&self) -> bool {
        self.privacy
    }

    /// Whether the durable tier ran out of quota during this session.
    #[must_use]
    pub const fn is_session_only(&self) -> bool {
        self.session_only
    }

    /// Whether the in-memory cart has unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tier that receives writes.
    #[must_use]
    pub const fn active_tier(&self) -> StorageTier {
        if self.privacy || self.session_only {
            StorageTier::Session
        } else {
            StorageTier::Durable
        }
    }

    /// Settings used for mutations and expiry.
    #[must_use]
    pub const fn settings(&self) -> &CartSettings {
        &self.settings
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn dispatch(&mut self, action: CartAction) -> CartUpdate {
        let now = self.clock.now();
        let (mut cart, mut notices) = self.take_current();
        let before = cart.clone();

        notices.extend(cart.apply(action, now, &self.settings));

        if cart != before {
            self.dirty = true;
            notices.extend(self.persist(&cart));
        }
        self.cart = Some(cart.clone());

        CartUpdate { cart, notices }
    }

    /// Take the in-memory cart, loading it if needed and replacing it if it
    /// expired while held in memory.
    fn take_current(&mut self) -> (Cart, Vec<CartNotice>) {
        let now = self.clock.now();
        let (cart, mut notices) = match self.cart.take() {
            Some(cart) => (cart, Vec::new()),
            None => {
                self.privacy = self.read_privacy();
                self.load_cart(now)
            }
        };

        if cart.is_expired(now) {
            tracing::info!(expired_at = %cart.expires_at(), "Cart expired, starting a new one");
            self.remove_key(StorageTier::Durable, CART_KEY);
            self.remove_key(StorageTier::Session, CART_KEY);
            notices.push(CartNotice::Expired {
                expired_at: cart.expires_at(),
            });
            self.dirty = false;
            return (Cart::new(cart.device_id(), now, &self.settings), notices);
        }

        (cart, notices)
    }

    fn load_cart(&mut self, now: DateTime<Utc>) -> (Cart, Vec<CartNotice>) {
        let mut notices = Vec::new();
        self.dirty = false;

        for &tier in self.read_order() {
            if let Some(cart) = self.read_from(tier, now, &mut notices) {
                return (cart, notices);
            }
        }

        let cart = Cart::new(self.device_id(), now, &self.settings);
        tracing::debug!(device_id = %cart.device_id(), "Started new cart");
        (cart, notices)
    }

    const fn read_order(&self) -> &'static [StorageTier] {
        if self.privacy || self.session_only {
            &[StorageTier::Session]
        } else {
            &[StorageTier::Durable, StorageTier::Session]
        }
    }

    fn read_from(
        &mut self,
        tier: StorageTier,
        now: DateTime<Utc>,
        notices: &mut Vec<CartNotice>,
    ) -> Option<Cart> {
        let raw = match self.backend(tier).get(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(?tier, error = %e, "Failed to read stored cart");
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                self.discard(tier, e.to_string(), notices);
                return None;
            }
        };

        let stored_version = detect_version(&value).ok();
        let cart = match migrate(value, now, &self.settings) {
            Ok(cart) => cart,
            Err(e) => {
                self.discard(tier, e.to_string(), notices);
                return None;
            }
        };

        if cart.is_expired(now) {
            tracing::info!(?tier, expired_at = %cart.expires_at(), "Discarding expired cart");
            self.remove_key(tier, CART_KEY);
            notices.push(CartNotice::Expired {
                expired_at: cart.expires_at(),
            });
            return None;
        }

        if stored_version != Some(CURRENT_CART_VERSION) || tier != self.active_tier() {
            // Rewrite in the current format on the active tier at next flush
            self.dirty = true;
        }

        tracing::debug!(
            ?tier,
            items = cart.items().len(),
            version = ?stored_version,
            "Loaded stored cart"
        );
        Some(cart)
    }

    fn discard(&self, tier: StorageTier, reason: String, notices: &mut Vec<CartNotice>) {
        tracing::warn!(?tier, reason = %reason, "Discarding unreadable cart record");
        self.remove_key(tier, CART_KEY);
        notices.push(CartNotice::Discarded { reason });
    }

    fn persist(&mut self, cart: &Cart) -> Vec<CartNotice> {
        let json = match serde_json::to_string(cart) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cart");
                return vec![CartNotice::PersistFailed {
                    reason: e.to_string(),
                }];
            }
        };

        let tier = self.active_tier();
        match self.backend(tier).set(CART_KEY, &json) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!(?tier, bytes = json.len(), "Persisted cart");
                Vec::new()
            }
            Err(StorageError::QuotaExceeded { needed, available })
                if tier == StorageTier::Durable =>
            {
                tracing::warn!(
                    needed,
                    available,
                    "Durable storage full, keeping cart in session storage"
                );
                self.session_only = true;
                // A stale durable copy must not shadow the session one on reload
                self.remove_key(StorageTier::Durable, CART_KEY);

                match self.session.set(CART_KEY, &json) {
                    Ok(()) => {
                        self.dirty = false;
                        vec![CartNotice::StorageFallback]
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to persist cart to session storage");
                        vec![CartNotice::PersistFailed {
                            reason: e.to_string(),
                        }]
                    }
                }
            }
            Err(e) => {
                tracing::warn!(?tier, error = %e, "Failed to persist cart");
                vec![CartNotice::PersistFailed {
                    reason: e.to_string(),
                }]
            }
        }
    }

    fn read_privacy(&self) -> bool {
        for tier in [StorageTier::Durable, StorageTier::Session] {
            match self.backend(tier).get(PRIVACY_KEY) {
                Ok(Some(value)) => return value.trim() == "true",
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(?tier, error = %e, "Failed to read privacy preference");
                }
            }
        }
        false
    }

    /// The stored device id, generating and storing one on first use.
    fn device_id(&self) -> DeviceId {
        for &tier in self.read_order() {
            match self.backend(tier).get(DEVICE_ID_KEY) {
                Ok(Some(raw)) => match DeviceId::parse(raw.trim()) {
                    Ok(id) => return id,
                    Err(e) => tracing::warn!(?tier, error = %e, "Ignoring invalid device id"),
                },
                Ok(None) => {}
                Err(e) => tracing::warn!(?tier, error = %e, "Failed to read device id"),
            }
        }

        let id = DeviceId::generate();
        let tier = self.active_tier();
        if let Err(e) = self.backend(tier).set(DEVICE_ID_KEY, &id.to_string()) {
            tracing::warn!(?tier, error = %e, "Failed to store device id");
        }
        id
    }

    fn move_key(&self, key: &str, from: StorageTier, to: StorageTier) {
        match self.backend(from).get(key) {
            Ok(Some(value)) => {
                if let Err(e) = self.backend(to).set(key, &value) {
                    tracing::warn!(key, ?to, error = %e, "Failed to move stored value");
                    return;
                }
                self.remove_key(from, key);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key, ?from, error = %e, "Failed to read stored value"),
        }
    }

    fn remove_key(&self, tier: StorageTier, key: &str) {
        if let Err(e) = self.backend(tier).remove(key) {
            tracing::warn!(key, ?tier, error = %e, "Failed to remove stored value");
        }
    }

    fn backend(&self, tier: StorageTier) -> &dyn StorageBackend {
        match tier {
            StorageTier::Durable => self.durable.as_ref(),
            StorageTier::Session => self.session.as_ref(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeDelta;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::cart::ManualClock;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    struct Fixture {
        durable: MemoryStorage,
        session: MemoryStorage,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_durable(MemoryStorage::new().as_durable())
        }

        fn with_durable(durable: MemoryStorage) -> Self {
            Self {
                durable,
                session: MemoryStorage::new(),
                clock: ManualClock::new(start()),
            }
        }

        fn store(&self) -> CartStore {
            let mut store = CartStore::new(
                self.durable.clone(),
                self.session.clone(),
                self.clock.clone(),
                CartSettings::default(),
            );
            store.init();
            store
        }
    }

    /// Storage that fails every operation.
    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn tier(&self) -> StorageTier {
            StorageTier::Durable
        }
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    fn tiles(quantity: u32) -> NewCartItem {
        NewCartItem::new(ProductId::new(1), "Terracotta tiles", Decimal::new(2450, 2))
            .with_quantity(quantity)
            .with_max_quantity(10)
    }

    #[test]
    fn test_init_starts_empty_cart_and_stores_device_id() {
        let fixture = Fixture::new();
        let mut store = fixture.store();

        let update = store.snapshot();
        assert!(update.cart.is_empty());
        assert!(update.notices.is_empty());

        let stored = fixture.durable.get(DEVICE_ID_KEY).unwrap().unwrap();
        assert_eq!(stored, update.cart.device_id().to_string());
        // Nothing to write yet
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let fixture = Fixture::new();
        let mut store = fixture.store();

        let update = store.add(tiles(3));
        assert!(update.notices.is_empty());
        assert_eq!(update.cart.totals().item_count, 3);
        assert!(!store.is_dirty());

        let mut reloaded = fixture.store();
        let snapshot = reloaded.snapshot();
        assert_eq!(snapshot.cart, update.cart);
        assert_eq!(snapshot.cart.totals().subtotal, Decimal::new(7350, 2));
    }

    #[test]
    fn test_update_remove_clear() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        store.add(tiles(3));

        let update = store.update_quantity(ProductId::new(1), 50);
        assert_eq!(update.cart.items()[0].quantity, 10);
        assert!(matches!(
            update.notices.as_slice(),
            [CartNotice::QuantityCapped { max: 10, .. }]
        ));

        let update = store.remove(ProductId::new(99));
        assert_eq!(
            update.notices,
            vec![CartNotice::UnknownItem {
                id: ProductId::new(99)
            }]
        );

        let update = store.clear();
        assert!(update.cart.is_empty());
        assert!(fixture.store().snapshot().cart.is_empty());
    }

    #[test]
    fn test_expired_cart_is_discarded_on_load() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        let created = store.add(tiles(2)).cart;

        fixture.clock.advance(TimeDelta::days(31));
        let mut store = CartStore::new(
            fixture.durable.clone(),
            fixture.session.clone(),
            fixture.clock.clone(),
            CartSettings::default(),
        );
        let notices = store.init();

        assert_eq!(
            notices,
            vec![CartNotice::Expired {
                expired_at: created.expires_at()
            }]
        );
        assert!(store.snapshot().cart.is_empty());
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_cart_expiring_in_memory_is_replaced() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        let created = store.add(tiles(2)).cart;

        fixture.clock.advance(TimeDelta::days(30));
        let update = store.snapshot();
        assert!(update.cart.is_empty());
        assert_eq!(update.cart.device_id(), created.device_id());
        assert!(matches!(
            update.notices.as_slice(),
            [CartNotice::Expired { .. }]
        ));
    }

    #[test]
    fn test_legacy_record_is_migrated_and_rewritten() {
        let fixture = Fixture::new();
        fixture.clock.set(
            DateTime::from_timestamp_millis(1_767_225_600_000).unwrap() + TimeDelta::days(3),
        );
        fixture
            .durable
            .set(
                CART_KEY,
                &json!({
                    "items": [{"id": 1, "name": "Terracotta tiles", "price": 24.5, "qty": 2}],
                    "timestamp": 1_767_225_600_000_i64
                })
                .to_string(),
            )
            .unwrap();

        let mut store = fixture.store();
        assert!(store.is_dirty());
        let cart = store.snapshot().cart;
        assert_eq!(cart.version(), CURRENT_CART_VERSION);
        assert_eq!(cart.items()[0].quantity, 2);

        assert!(store.flush().is_empty());
        let stored: Value =
            serde_json::from_str(&fixture.durable.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["version"], json!(CURRENT_CART_VERSION));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_unreadable_record_is_discarded() {
        let fixture = Fixture::new();
        fixture.durable.set(CART_KEY, "{not json").unwrap();

        let mut store = CartStore::new(
            fixture.durable.clone(),
            fixture.session.clone(),
            fixture.clock.clone(),
            CartSettings::default(),
        );
        let notices = store.init();

        assert!(matches!(
            notices.as_slice(),
            [CartNotice::Discarded { .. }]
        ));
        assert!(store.snapshot().cart.is_empty());
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_far_future_record_is_discarded() {
        let fixture = Fixture::new();
        fixture
            .durable
            .set(CART_KEY, r#"{"items":[],"timestamp":8210266876799999}"#)
            .unwrap();

        let mut store = CartStore::new(
            fixture.durable.clone(),
            fixture.session.clone(),
            fixture.clock.clone(),
            CartSettings::default(),
        );
        let notices = store.init();

        assert!(matches!(
            notices.as_slice(),
            [CartNotice::Discarded { .. }]
        ));
        assert!(store.snapshot().cart.is_empty());
    }

    #[test]
    fn test_quota_exhaustion_falls_back_to_session() {
        let fixture = Fixture::with_durable(MemoryStorage::with_quota(200).as_durable());
        let mut store = fixture.store();

        let update = store.add(tiles(1));
        assert_eq!(update.notices, vec![CartNotice::StorageFallback]);
        assert!(store.is_session_only());
        assert_eq!(store.active_tier(), StorageTier::Session);
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
        assert!(fixture.session.get(CART_KEY).unwrap().is_some());

        // Later writes go straight to the session tier without a new notice
        let update = store.add(tiles(1));
        assert!(update.notices.is_empty());
        assert_eq!(update.cart.totals().item_count, 2);
    }

    #[test]
    fn test_write_failure_is_reported_not_raised() {
        let mut store = CartStore::new(
            BrokenStorage,
            MemoryStorage::new(),
            ManualClock::new(start()),
            CartSettings::default(),
        );
        store.init();

        let update = store.add(tiles(1));
        assert_eq!(update.cart.totals().item_count, 1);
        assert!(matches!(
            update.notices.as_slice(),
            [CartNotice::PersistFailed { .. }]
        ));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_privacy_moves_cart_out_of_durable_storage() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        store.add(tiles(2));
        assert!(fixture.durable.get(CART_KEY).unwrap().is_some());

        assert!(store.set_privacy(true).is_empty());
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
        assert_eq!(fixture.durable.get(DEVICE_ID_KEY).unwrap(), None);
        assert_eq!(
            fixture.durable.get(PRIVACY_KEY).unwrap().as_deref(),
            Some("true")
        );
        assert!(fixture.session.get(CART_KEY).unwrap().is_some());

        // The preference survives a reload and the cart is read from the session tier
        let mut reloaded = fixture.store();
        assert!(reloaded.privacy_enabled());
        assert_eq!(reloaded.snapshot().cart.totals().item_count, 2);
    }

    #[test]
    fn test_disabling_privacy_moves_cart_back() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        store.set_privacy(true);
        store.add(tiles(4));

        store.set_privacy(false);
        assert!(fixture.durable.get(CART_KEY).unwrap().is_some());
        assert!(fixture.durable.get(DEVICE_ID_KEY).unwrap().is_some());
        assert_eq!(fixture.session.get(CART_KEY).unwrap(), None);
        assert_eq!(
            fixture.durable.get(PRIVACY_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        assert!(store.flush().is_empty());
        assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_reloads_from_storage() {
        let fixture = Fixture::new();
        let mut store = fixture.store();
        store.add(tiles(2));

        // Another writer replaces the stored cart
        fixture.durable.remove(CART_KEY).unwrap();
        store.reset();
        assert!(store.snapshot().cart.is_empty());
    }

    fn arb_action() -> impl Strategy<Value = CartAction> {
        prop_oneof![
            (1i64..4, 0u32..15).prop_map(|(id, quantity)| CartAction::Add(
                NewCartItem::new(ProductId::new(id), "Item", Decimal::new(999, 2))
                    .with_quantity(quantity)
                    .with_max_quantity(12)
            )),
            (1i64..4, 0u32..15).prop_map(|(id, quantity)| CartAction::UpdateQuantity {
                id: ProductId::new(id),
                quantity
            }),
            (1i64..4).prop_map(|id| CartAction::Remove {
                id: ProductId::new(id)
            }),
            Just(CartAction::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_privacy_never_writes_cart_to_durable(
            actions in proptest::collection::vec(arb_action(), 0..25)
        ) {
            let fixture = Fixture::new();
            let mut store = fixture.store();
            store.set_privacy(true);

            for action in actions {
                store.dispatch(action);
                store.flush();
                prop_assert_eq!(fixture.durable.get(CART_KEY).unwrap(), None);
            }
        }
    }
}
