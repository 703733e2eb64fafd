//! # kenzie-db: Durable Storage for the Kenzie Cart
//!
//! This crate keeps the cart alive across restarts. It defines the
//! key-value store seam, ships an in-memory and a SQLite backend, and
//! provides the [`PersistenceBridge`] that turns a `CartState` into a stored
//! snapshot and back.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kenzie Cart Data Flow                            │
//! │                                                                         │
//! │  CartStore (kenzie-cart) performs a PersistEffect                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kenzie-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    bridge     │    │     store     │    │   Database   │  │   │
//! │  │   │               │    │               │    │  (pool.rs)   │  │   │
//! │  │   │ hydrate()     │───►│ KeyValueStore │◄───│ KvRepository │  │   │
//! │  │   │ persist()     │    │ MemoryStore   │    │ migrations   │  │   │
//! │  │   │ clear()       │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/cart.db, table kv_store                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kenzie_db::{Database, DbConfig, PersistenceBridge};
//!
//! let db = Database::new(DbConfig::new("path/to/cart.db")).await?;
//! let bridge = PersistenceBridge::new(db.kv());
//!
//! let saved = bridge.hydrate().await; // Option<CartState>
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bridge;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use bridge::{PersistenceBridge, StoredCart, SNAPSHOT_VERSION};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KvRepository;
pub use store::{KeyValueStore, MemoryStore};
