//! # kenzie-cart: Shopping Cart for the Kenzie Storefront
//!
//! The crate storefront UI code talks to. It holds the live cart, runs every
//! action through `kenzie_core::transition` and mirrors the result into
//! durable storage through `kenzie_db::PersistenceBridge`.
//!
//! ## Module Organization
//! ```text
//! kenzie_cart/
//! ├── lib.rs      ◄─── You are here (re-exports & logging setup)
//! ├── store.rs    ◄─── CartStore facade and SharedCart handle
//! ├── config.rs   ◄─── Storage key and database location
//! └── error.rs    ◄─── CartError and the UI-facing ErrorResponse
//! ```
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Lifecycle                                    │
//! │                                                                         │
//! │  1. init_tracing() ──────────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,kenzie=debug,sqlx=warn; RUST_LOG overrides          │
//! │                                                                         │
//! │  2. CartStore::connect(&CartConfig::from_env()) ─────────────────────► │
//! │     • Open SQLite (WAL), run migrations                                 │
//! │     • Hydrate the "KenzieCart" snapshot (missing/bad → empty cart)      │
//! │                                                                         │
//! │  3. Shopper actions ─────────────────────────────────────────────────► │
//! │     • add_item / remove_item / remove_all_items / apply_coupon          │
//! │     • reset_cart / delete_local_storage                                 │
//! │     • Each one: validate → transition → write or clear storage         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use kenzie_cart::{init_tracing, CartConfig, CartItem, CartStore, Money};
//!
//! init_tracing();
//! let mut cart = CartStore::connect(&CartConfig::from_env()).await?;
//! cart.add_item(CartItem::new("tee-01", Money::from_cents(1999), 2)).await?;
//! assert_eq!(cart.state().item_count, 2);
//! ```

pub mod config;
pub mod error;
pub mod store;

use tracing_subscriber::EnvFilter;

pub use config::CartConfig;
pub use error::{CartError, CartResult, ErrorCode, ErrorResponse};
pub use store::{CartStore, SharedCart};

pub use kenzie_core::{
    CartAction, CartItem, CartState, Discount, ItemId, Money, Promo, DEFAULT_STORAGE_KEY,
};
pub use kenzie_db::{KeyValueStore, KvRepository, MemoryStore, PersistenceBridge};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,kenzie=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kenzie_cart=trace` - Show trace for the cart crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
