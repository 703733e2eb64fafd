//! # Key-Value Stores
//!
//! The durable store the cart snapshot lives in, behind one small trait.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore implementations                      │
//! │                                                                         │
//! │                    PersistenceBridge<S: KeyValueStore>                  │
//! │                                │                                        │
//! │                ┌───────────────┴────────────────┐                       │
//! │                ▼                                ▼                       │
//! │        ┌───────────────┐               ┌─────────────────┐              │
//! │        │  MemoryStore  │               │  KvRepository   │              │
//! │        │  HashMap      │               │  SQLite table   │              │
//! │        │  (tests,      │               │  kv_store       │              │
//! │        │   embedders)  │               │  (production)   │              │
//! │        └───────────────┘               └─────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `get` returns `Ok(None)` for a missing key
//! - `set` overwrites atomically from the caller's point of view
//! - `remove` succeeds even if the key does not exist

pub mod memory;

use async_trait::async_trait;

use crate::error::DbResult;

pub use memory::MemoryStore;

/// A string-keyed, string-valued durable store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key` entirely.
    async fn remove(&self, key: &str) -> DbResult<()>;
}
