//! # Cart Configuration
//!
//! Where the cart is stored and under which key.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KENZIE_CART_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read once at startup and never changes afterwards.

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::warn;

use kenzie_core::DEFAULT_STORAGE_KEY;
use kenzie_db::DbConfig;

use crate::error::{CartError, CartResult};

/// Default database file name inside the platform data directory.
pub const DEFAULT_DATABASE_FILE: &str = "cart.db";

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Key the snapshot is stored under.
    /// Default: "KenzieCart"
    pub storage_key: String,

    /// SQLite database file (`:memory:` for an in-memory database).
    /// Default: platform data directory + `cart.db`
    pub database_path: PathBuf,

    /// Pool size. Default: 1
    pub max_connections: u32,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: default_database_path(),
            max_connections: 1,
        }
    }
}

impl CartConfig {
    /// Creates a CartConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `KENZIE_CART_KEY`: storage key
    /// - `KENZIE_CART_DB_PATH`: database file
    /// - `KENZIE_CART_DB_CONNECTIONS`: pool size
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`CartConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CartConfig::default();

        if let Some(key) = lookup("KENZIE_CART_KEY") {
            config.storage_key = key;
        }

        if let Some(path) = lookup("KENZIE_CART_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("KENZIE_CART_DB_CONNECTIONS") {
            match raw.parse::<u32>() {
                Ok(n) => config.max_connections = n,
                Err(_) => warn!(value = %raw, "Ignoring invalid KENZIE_CART_DB_CONNECTIONS"),
            }
        }

        config
    }

    /// Sets the storage key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the pool size.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Checks the configuration can be used to open a store.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::Config("storage key must not be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(CartError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Platform data directory + `cart.db`.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.kenzie.cart/cart.db`
/// - **Windows**: `%APPDATA%\kenzie\cart\data\cart.db`
/// - **Linux**: `~/.local/share/cart/cart.db`
///
/// Falls back to `./cart.db` when no home directory is known.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "kenzie", "cart")
        .map(|dirs| dirs.data_dir().join(DEFAULT_DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
}
