//! # Repository Module
//!
//! SQLite-backed repositories.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PersistenceBridge                                                     │
//! │       │                                                                 │
//! │       │  store.set("KenzieCart", json)                                 │
//! │       ▼                                                                 │
//! │  KvRepository (implements KeyValueStore)                               │
//! │  ├── get(&self, key)                                                   │
//! │  ├── set(&self, key, value)                                            │
//! │  └── remove(&self, key)                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite table kv_store                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod kv;
