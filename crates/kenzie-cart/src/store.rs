//! # Cart Store
//!
//! Owns the live cart and the bridge to durable storage.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Storefront Action        CartStore method        Action dispatched     │
//! │  ─────────────────        ────────────────        ─────────────────     │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_item() ──────────► ADD_ITEM             │
//! │  "−" on a line ──────────► remove_item() ───────► REMOVE_ITEM          │
//! │  "Remove" on a line ─────► remove_all_items() ──► REMOVE_ALL_ITEMS     │
//! │  Coupon form ────────────► apply_coupon() ──────► APPLY_PROMO_CODE     │
//! │  "Empty cart" ───────────► reset_cart() ────────► RESET_CART           │
//! │  Order placed ───────────► delete_local_storage() ► DELETE_CART_STORAGE│
//! │  Badge / button state ───► is_item_in_cart() ───► (read only)          │
//! │                                                                         │
//! │  Every mutating method: validate → transition → persist effect.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Mutating methods take `&mut self` and await the storage effect before
//! returning, so actions never interleave and a write always lands before
//! the next read of the key. [`CartStore::open`] is the only constructor and
//! hydrates first, so no shopper action can be overwritten by a late
//! hydration.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use kenzie_core::validation::{validate_add, validate_promo};
use kenzie_core::{transition, CartAction, CartItem, CartState, ItemId, PersistEffect, Promo, Transition};
use kenzie_db::{Database, KeyValueStore, KvRepository, PersistenceBridge};

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};

// =============================================================================
// CartStore
// =============================================================================

/// The authoritative cart for one shopper session.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    bridge: PersistenceBridge<S>,
    synced: bool,
}

impl CartStore<KvRepository> {
    /// Opens the SQLite-backed cart described by `config` and hydrates it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = CartConfig::from_env();
    /// let mut cart = CartStore::connect(&config).await?;
    /// cart.add_item(CartItem::new("tee-01", Money::from_cents(1999), 1)).await?;
    /// ```
    pub async fn connect(config: &CartConfig) -> CartResult<Self> {
        config.validate()?;

        let db_config = config.db_config();
        if !db_config.is_in_memory() {
            if let Some(dir) = db_config
                .database_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
            {
                std::fs::create_dir_all(dir).map_err(|e| {
                    CartError::Config(format!("cannot create {}: {}", dir.display(), e))
                })?;
            }
        }

        let db = Database::new(db_config).await?;
        let bridge = PersistenceBridge::with_key(db.kv(), config.storage_key.clone());
        Ok(CartStore::open(bridge).await)
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Creates the store, hydrating from `bridge` before anything else.
    ///
    /// A missing or unreadable snapshot leaves the cart empty.
    pub async fn open(bridge: PersistenceBridge<S>) -> Self {
        let saved = bridge.hydrate().await;
        let mut store = CartStore {
            state: CartState::default(),
            bridge,
            synced: true,
        };

        match saved {
            Some(saved) => {
                if let Err(e) = store.apply(CartAction::InitSavedCart(saved)).await {
                    warn!(error = %e, "Could not load saved cart");
                }
            }
            None => info!(key = %store.bridge.key(), "Starting with an empty cart"),
        }

        store
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Read-only snapshot of the cart.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Membership check by id. Never mutates.
    pub fn is_item_in_cart(&self, id: &ItemId) -> bool {
        self.state.contains(id)
    }

    /// False when the last storage write or clear failed.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Adds `item`, merging into an existing line with the same id.
    ///
    /// Rejects non-positive quantities, lines past the quantity limit and
    /// new lines past the cart size limit.
    pub async fn add_item(&mut self, item: CartItem) -> CartResult<&CartState> {
        validate_add(&self.state, &item)?;
        self.apply(CartAction::AddItem(item)).await
    }

    /// Takes one unit off the line for `id`. Unknown ids are a no-op.
    pub async fn remove_item(&mut self, id: impl Into<ItemId>) -> CartResult<&CartState> {
        self.apply(CartAction::RemoveItem(id.into())).await
    }

    /// Removes the whole line for `id`.
    ///
    /// ## Errors
    /// `CoreError::ItemNotInCart` when there is no such line; the cart is
    /// left unchanged.
    pub async fn remove_all_items(&mut self, id: impl Into<ItemId>) -> CartResult<&CartState> {
        self.apply(CartAction::RemoveAllItems(id.into())).await
    }

    /// Applies a coupon, replacing any coupon applied before.
    pub async fn apply_coupon(&mut self, promo: Promo) -> CartResult<&CartState> {
        validate_promo(&promo)?;
        self.apply(CartAction::ApplyPromoCode(promo)).await
    }

    /// Empties the cart.
    pub async fn reset_cart(&mut self) -> CartResult<&CartState> {
        self.apply(CartAction::ResetCart).await
    }

    /// Empties the cart and removes the stored snapshot.
    pub async fn delete_local_storage(&mut self) -> CartResult<&CartState> {
        self.apply(CartAction::DeleteCartStorage).await
    }

    /// Runs an already-built action through the same checks as the named
    /// methods.
    ///
    /// ## Errors
    /// `CartError::HydrationClosed` for `InitSavedCart`: hydration only
    /// happens inside [`CartStore::open`].
    pub async fn dispatch(&mut self, action: CartAction) -> CartResult<&CartState> {
        match action {
            CartAction::AddItem(item) => self.add_item(item).await,
            CartAction::ApplyPromoCode(promo) => self.apply_coupon(promo).await,
            CartAction::InitSavedCart(_) => {
                warn!("Rejected INIT_SAVED_CART after startup");
                Err(CartError::HydrationClosed)
            }
            other => self.apply(other).await,
        }
    }

    /// Decodes a storefront JSON action and dispatches it.
    ///
    /// ```json
    /// { "type": "REMOVE_ITEM", "payload": "tee-01" }
    /// ```
    pub async fn dispatch_json(&mut self, raw: &str) -> CartResult<&CartState> {
        let action: CartAction = serde_json::from_str(raw)?;
        self.dispatch(action).await
    }

    /// Rewrites storage from the in-memory cart.
    ///
    /// Used to resynchronize after a failed write; an empty cart clears the
    /// key instead of writing it.
    pub async fn flush(&mut self) -> CartResult<()> {
        let result = if self.state == CartState::default() {
            self.bridge.clear().await
        } else {
            self.bridge.persist(&self.state).await
        };
        self.synced = result.is_ok();
        result.map_err(CartError::from)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn apply(&mut self, action: CartAction) -> CartResult<&CartState> {
        let name = action.name();

        let Transition { state, effect } = match transition(&self.state, action) {
            Ok(next) => next,
            Err(e) => {
                debug!(action = name, error = %e, "Action rejected");
                return Err(e.into());
            }
        };

        self.state = state;
        self.persist_effect(effect).await;

        debug!(
            action = name,
            item_count = self.state.item_count,
            cart_total = %self.state.cart_total,
            ?effect,
            "Cart updated"
        );
        Ok(&self.state)
    }

    /// Best effort: the in-memory state has already advanced.
    async fn persist_effect(&mut self, effect: PersistEffect) {
        let result = match effect {
            PersistEffect::Write => self.bridge.persist(&self.state).await,
            PersistEffect::Clear => self.bridge.clear().await,
            PersistEffect::Skip => return,
        };

        match result {
            Ok(()) => self.synced = true,
            Err(e) => {
                self.synced = false;
                warn!(key = %self.bridge.key(), ?effect, error = %e, "Cart storage is stale");
            }
        }
    }
}

// =============================================================================
// Shared handle
// =============================================================================

/// Cloneable handle for handing one cart to several consumers.
///
/// ## Thread Safety
/// `Arc<Mutex<CartStore>>`: the mutex keeps a single logical owner, so
/// actions from different consumers are processed one at a time.
#[derive(Debug)]
pub struct SharedCart<S> {
    inner: Arc<Mutex<CartStore<S>>>,
}

impl<S> Clone for SharedCart<S> {
    fn clone(&self) -> Self {
        SharedCart {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedCart<S> {
    pub fn new(store: CartStore<S>) -> Self {
        SharedCart {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for a sequence of actions.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let mut cart = shared.lock().await;
    /// cart.add_item(item).await?;
    /// ```
    pub async fn lock(&self) -> MutexGuard<'_, CartStore<S>> {
        self.inner.lock().await
    }

    /// Owned copy of the current state.
    pub async fn snapshot(&self) -> CartState {
        self.inner.lock().await.state().clone()
    }

    pub async fn is_item_in_cart(&self, id: &ItemId) -> bool {
        self.inner.lock().await.is_item_in_cart(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kenzie_core::{CoreError, Discount, Money, DEFAULT_STORAGE_KEY};
    use kenzie_db::{DbError, DbResult, MemoryStore};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn item(id: &str, price_cents: i64, quantity: i64) -> CartItem {
        CartItem::new(id, Money::from_cents(price_cents), quantity)
    }

    async fn open_empty() -> (CartStore<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let cart = CartStore::open(PersistenceBridge::new(store.clone())).await;
        (cart, store)
    }

    async fn stored_state(store: &MemoryStore) -> Option<CartState> {
        PersistenceBridge::new(store.clone()).hydrate().await
    }

    /// MemoryStore whose writes can be switched off.
    #[derive(Debug, Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: Arc<AtomicBool>,
    }

    impl FlakyStore {
        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> DbResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DbError::Internal("store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.check()?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            self.check()?;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> DbResult<()> {
            self.check()?;
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_open_without_saved_cart() {
        let (cart, store) = open_empty().await;
        assert_eq!(cart.state(), &CartState::default());
        assert!(cart.is_synced());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_open_hydrates_saved_cart() {
        let store = MemoryStore::new();
        {
            let mut cart = CartStore::open(PersistenceBridge::new(store.clone())).await;
            cart.add_item(item("a", 1000, 2)).await.unwrap();
        }

        let cart = CartStore::open(PersistenceBridge::new(store)).await;
        assert_eq!(cart.state().item_count, 2);
        assert!(cart.is_item_in_cart(&ItemId::from("a")));
    }

    #[tokio::test]
    async fn test_open_with_malformed_snapshot_starts_empty() {
        let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{{{ not json");
        let cart = CartStore::open(PersistenceBridge::new(store)).await;
        assert_eq!(cart.state(), &CartState::default());
    }

    #[tokio::test]
    async fn test_worked_example_is_persisted() {
        let (mut cart, store) = open_empty().await;

        let state = cart.add_item(item("a", 1000, 2)).await.unwrap();
        assert_eq!((state.item_count, state.cart_total.cents()), (2, 2000));

        let state = cart.add_item(item("a", 1000, 3)).await.unwrap();
        assert_eq!((state.item_count, state.cart_total.cents()), (5, 5000));

        let state = cart.remove_item("a").await.unwrap();
        assert_eq!((state.item_count, state.cart_total.cents()), (4, 4000));
        assert_eq!(state.items[0].quantity, 4);
        assert_eq!(stored_state(&store).await.as_ref(), Some(cart.state()));

        let state = cart.remove_all_items("a").await.unwrap();
        assert_eq!(state.item_count, 0);
        assert!(state.is_empty());
        assert_eq!(stored_state(&store).await, Some(CartState::default()));
    }

    #[tokio::test]
    async fn test_coupon_rebases_and_persists() {
        let (mut cart, store) = open_empty().await;
        cart.add_item(item("a", 5000, 2)).await.unwrap();

        let ten = Promo::new("TEN", Discount::from_bps(1000), "c-10");
        assert_eq!(cart.apply_coupon(ten).await.unwrap().cart_total.cents(), 9000);

        let twenty = Promo::new("TWENTY", Discount::from_bps(2000), "c-20");
        let state = cart.apply_coupon(twenty).await.unwrap();
        assert_eq!(state.cart_total.cents(), 8000);
        assert_eq!(state.coupon_id, "c-20");

        let saved = stored_state(&store).await.unwrap();
        assert_eq!(saved.promo_code, "TWENTY");
        assert_eq!(saved.cart_total.cents(), 8000);
    }

    #[tokio::test]
    async fn test_invalid_coupon_is_rejected() {
        let (mut cart, _store) = open_empty().await;
        let err = cart
            .apply_coupon(Promo::new("", Discount::from_bps(1000), "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Core(CoreError::Validation(_))));
        assert!(cart.state().promo_code.is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_storage() {
        let (mut cart, store) = open_empty().await;
        cart.add_item(item("a", 100, 1)).await.unwrap();
        assert!(!store.is_empty().await);

        let state = cart.reset_cart().await.unwrap();
        assert_eq!(state, &CartState::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_local_storage_clears_storage() {
        let (mut cart, store) = open_empty().await;
        cart.add_item(item("a", 100, 1)).await.unwrap();

        cart.delete_local_storage().await.unwrap();
        assert_eq!(cart.state(), &CartState::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_all_missing_item_leaves_cart_alone() {
        let (mut cart, _store) = open_empty().await;
        cart.add_item(item("a", 100, 3)).await.unwrap();
        let before = cart.state().clone();

        let err = cart.remove_all_items("nope").await.unwrap_err();
        assert!(matches!(err, CartError::Core(CoreError::ItemNotInCart(_))));
        assert_eq!(cart.state(), &before);
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let (mut cart, store) = open_empty().await;

        assert!(cart.add_item(item("a", 100, 0)).await.is_err());
        assert!(cart.add_item(item("a", 100, -2)).await.is_err());
        assert!(cart.state().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_late_hydration() {
        let (mut cart, _store) = open_empty().await;
        cart.add_item(item("a", 100, 1)).await.unwrap();

        let err = cart
            .dispatch(CartAction::InitSavedCart(CartState::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::HydrationClosed));
        assert_eq!(cart.state().item_count, 1);
    }

    #[tokio::test]
    async fn test_dispatch_json_actions() {
        let (mut cart, _store) = open_empty().await;

        cart.dispatch_json(
            r#"{"type":"ADD_ITEM","payload":{"_id":"mug","price":12.5,"quantity":2,"name":"Mug"}}"#,
        )
        .await
        .unwrap();
        cart.dispatch_json(r#"{"type":"REMOVE_ITEM","payload":"mug"}"#)
            .await
            .unwrap();
        let state = cart
            .dispatch_json(r#"{"type":"UPDATE_CART_LOCAL_STORAGE"}"#)
            .await
            .unwrap();

        assert_eq!(state.item_count, 1);
        assert_eq!(state.cart_total.cents(), 1250);
        assert_eq!(state.items[0].attributes["name"], "Mug");

        let err = cart.dispatch_json("not json").await.unwrap_err();
        assert!(matches!(err, CartError::MalformedAction(_)));
    }

    #[tokio::test]
    async fn test_dispatch_json_reads_decimal_prices() {
        let (mut cart, store) = open_empty().await;

        let state = cart
            .dispatch_json(r#"{"type":"ADD_ITEM","payload":{"id":"a","price":10,"quantity":2}}"#)
            .await
            .unwrap();
        assert_eq!(state.cart_total.cents(), 2000);

        let state = cart
            .dispatch_json(r#"{"type":"ADD_ITEM","payload":{"id":"b","price":10.5,"quantity":1}}"#)
            .await
            .unwrap();
        assert_eq!(state.items[1].price.cents(), 1050);
        assert_eq!(state.cart_total.cents(), 3050);

        let saved = stored_state(&store).await.unwrap();
        assert_eq!(saved.cart_total.cents(), 3050);
    }

    #[tokio::test]
    async fn test_oversized_price_is_rejected_not_panicking() {
        let (mut cart, store) = open_empty().await;

        // $4.6 billion a unit, three units
        let raw = r#"{"type":"ADD_ITEM","payload":{"id":"a","price":4611686018.43,"quantity":3}}"#;
        let err = cart.dispatch_json(raw).await.unwrap_err();
        assert!(matches!(err, CartError::Core(CoreError::Validation(_))));

        let err = cart
            .add_item(item("a", i64::MAX / 2, 3))
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ValidationError);

        // Beyond what a decimal amount can carry exactly
        let raw = r#"{"type":"ADD_ITEM","payload":{"id":"a","price":4.6e18,"quantity":3}}"#;
        assert!(matches!(
            cart.dispatch_json(raw).await,
            Err(CartError::MalformedAction(_))
        ));

        assert!(cart.state().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_dispatch_json_unknown_action_with_payload() {
        let (mut cart, _store) = open_empty().await;
        cart.add_item(item("a", 100, 1)).await.unwrap();
        let before = cart.state().clone();

        let state = cart
            .dispatch_json(r#"{"type":"APPLY_COUPON_CODE","payload":{"code":"X"}}"#)
            .await
            .unwrap();
        assert_eq!(state, &before);
    }

    #[tokio::test]
    async fn test_dispatch_json_rejects_sub_basis_point_discount() {
        let (mut cart, _store) = open_empty().await;
        cart.add_item(item("a", 10000, 1)).await.unwrap();

        let raw = r#"{"type":"APPLY_PROMO_CODE","payload":{"code":"ODD","discount":0.12345,"couponId":"c"}}"#;
        assert!(matches!(
            cart.dispatch_json(raw).await,
            Err(CartError::MalformedAction(_))
        ));
        assert_eq!(cart.state().cart_total.cents(), 10000);
        assert!(cart.state().discount.is_zero());
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_fatal() {
        let flaky = FlakyStore::default();
        let mut cart = CartStore::open(PersistenceBridge::new(flaky.clone())).await;

        flaky.set_failing(true);
        let state = cart.add_item(item("a", 100, 2)).await.unwrap();
        assert_eq!(state.item_count, 2);
        assert!(!cart.is_synced());
        assert!(cart.flush().await.is_err());

        flaky.set_failing(false);
        cart.flush().await.unwrap();
        assert!(cart.is_synced());
        assert_eq!(stored_state(&flaky.inner).await.as_ref(), Some(cart.state()));
    }

    #[tokio::test]
    async fn test_unreadable_store_starts_empty() {
        let flaky = FlakyStore::default();
        flaky.set_failing(true);
        let cart = CartStore::open(PersistenceBridge::new(flaky)).await;
        assert_eq!(cart.state(), &CartState::default());
    }

    #[tokio::test]
    async fn test_shared_handle_serializes_access() {
        let (cart, _store) = open_empty().await;
        let shared = SharedCart::new(cart);
        let other = shared.clone();

        shared.lock().await.add_item(item("a", 100, 1)).await.unwrap();
        other.lock().await.add_item(item("b", 200, 1)).await.unwrap();

        assert!(shared.is_item_in_cart(&ItemId::from("b")).await);
        let snapshot = other.snapshot().await;
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.cart_total.cents(), 300);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let config = CartConfig::default().database_path(":memory:");
        let mut cart = CartStore::connect(&config).await.unwrap();

        cart.add_item(item("a", 100, 1)).await.unwrap();
        assert!(cart.is_synced());
        assert_eq!(cart.bridge().key(), DEFAULT_STORAGE_KEY);
    }
}
