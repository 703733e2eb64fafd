//! # Persistence Bridge
//!
//! Mirrors the committed cart into a [`KeyValueStore`] and restores it on
//! startup.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Startup                     Every write effect          Clear effect   │
//! │  ───────                     ──────────────────          ────────────   │
//! │  hydrate()                   persist(&state)             clear()        │
//! │     │                           │                           │           │
//! │     ▼                           ▼                           ▼           │
//! │  get("KenzieCart")           set("KenzieCart",           remove(        │
//! │     │                            envelope JSON)            "KenzieCart")│
//! │     ├── missing ──────► None                                            │
//! │     ├── read error ───► None (warn)                                     │
//! │     ├── bad JSON ─────► None (warn)                                     │
//! │     └── decoded ──────► Some(CartState)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Accepted Shapes
//! 1. `{ "version": 1, "savedAt": "...", "cart": { ...CartState } }` (written by `persist`)
//! 2. a bare `CartState` object
//! 3. a legacy bare array of items (`[{ "_id": "a", "price": 10.5, ... }]`)
//!
//! Prices are decimal amounts in every shape; `Money` converts them to cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use kenzie_core::{calculate_cart_total, CartItem, CartState, DEFAULT_STORAGE_KEY};

use crate::error::{DbError, DbResult};
use crate::store::KeyValueStore;

/// Envelope version written by [`PersistenceBridge::persist`].
pub const SNAPSHOT_VERSION: u32 = 1;

// =============================================================================
// Snapshot Formats
// =============================================================================

/// What actually gets written under the storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCart {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub cart: CartState,
}

/// Decodes a stored value into a cart.
///
/// ## Returns
/// * `Ok(Some(state))` - a recognised snapshot
/// * `Ok(None)` - the value is JSON `null`
/// * `Err(DbError::Serialization)` - anything else
pub fn decode_snapshot(raw: &str) -> DbResult<Option<CartState>> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Null => Ok(None),
        Value::Array(_) => {
            let legacy: Vec<CartItem> = serde_json::from_value(value)?;
            Ok(Some(state_from_legacy(legacy)?))
        }
        Value::Object(ref map) if map.contains_key("version") && map.contains_key("cart") => {
            let stored: StoredCart = serde_json::from_value(value)?;
            if stored.version != SNAPSHOT_VERSION {
                return Err(DbError::Serialization(format!(
                    "unsupported snapshot version {}",
                    stored.version
                )));
            }
            Ok(Some(stored.cart))
        }
        Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
        other => Err(DbError::Serialization(format!(
            "unexpected snapshot value: {}",
            other
        ))),
    }
}

fn state_from_legacy(legacy: Vec<CartItem>) -> DbResult<CartState> {
    let mut items: Vec<CartItem> = Vec::with_capacity(legacy.len());
    for item in legacy {
        if item.price.cents() < 0 {
            return Err(DbError::Serialization(format!(
                "legacy item {} has negative price {}",
                item.id, item.price
            )));
        }
        if item.quantity <= 0 {
            continue;
        }
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => items.push(item),
        }
    }

    Ok(CartState {
        item_count: items
            .iter()
            .fold(0i64, |count, item| count.saturating_add(item.quantity)),
        cart_total: calculate_cart_total(&items),
        items,
        ..CartState::default()
    })
}

/// Encodes a cart into the versioned envelope.
pub fn encode_snapshot(state: &CartState) -> DbResult<String> {
    let stored = StoredCart {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        cart: state.clone(),
    };
    Ok(serde_json::to_string(&stored)?)
}

// =============================================================================
// Bridge
// =============================================================================

/// Reads and writes the cart snapshot under a single key.
///
/// Holds no cart state of its own; only the store handle and the key.
#[derive(Debug, Clone)]
pub struct PersistenceBridge<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Creates a bridge using [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Creates a bridge using a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        PersistenceBridge {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Restores the saved cart, if there is a usable one.
    ///
    /// Never fails: a read error or a malformed snapshot is logged and
    /// reported as "no saved cart".
    pub async fn hydrate(&self) -> Option<CartState> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No saved cart");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved cart");
                return None;
            }
        };

        match decode_snapshot(&raw) {
            Ok(Some(state)) => {
                info!(
                    key = %self.key,
                    lines = state.line_count(),
                    item_count = state.item_count,
                    "Hydrated saved cart"
                );
                Some(state)
            }
            Ok(None) => {
                debug!(key = %self.key, "Saved cart is null");
                None
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring malformed saved cart");
                None
            }
        }
    }

    /// Overwrites the stored snapshot with `state`.
    pub async fn persist(&self, state: &CartState) -> DbResult<()> {
        let encoded = encode_snapshot(state)?;
        self.store.set(&self.key, &encoded).await
    }

    /// Removes the stored snapshot entirely.
    pub async fn clear(&self) -> DbResult<()> {
        self.store.remove(&self.key).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
