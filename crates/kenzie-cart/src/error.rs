//! # Cart Error Type
//!
//! Unified error type for the cart facade.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kenzie Cart                            │
//! │                                                                         │
//! │  Storefront UI                  CartStore                               │
//! │  ─────────────                  ─────────                               │
//! │                                                                         │
//! │  cart.add_item(item)                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Validation failed? ── CoreError::Validation ─────► CartError   │  │
//! │  │  Line missing?      ── CoreError::ItemNotInCart ──► CartError   │  │
//! │  │  Storage write failed? ─ logged, cart keeps going (not an error) │  │
//! │  │  Success ──────────────────────────────────────────► &CartState  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  In every error case the cart state is left exactly as it was.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use kenzie_core::{CoreError, ValidationError};
use kenzie_db::DbError;

/// Errors returned by [`crate::CartStore`].
#[derive(Debug, Error)]
pub enum CartError {
    /// A cart rule rejected the action.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The durable store could not be opened or written on an explicit flush.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// `InitSavedCart` was dispatched after startup hydration.
    #[error("Saved cart can only be loaded at startup")]
    HydrationClosed,

    /// A JSON action from the UI could not be decoded.
    #[error("Malformed action: {0}")]
    MalformedAction(String),

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::MalformedAction(err.to_string())
    }
}

impl From<ValidationError> for CartError {
    fn from(err: ValidationError) -> Self {
        CartError::Core(err.into())
    }
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// UI-facing view
// =============================================================================

/// Machine-readable error codes for the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    CartLimit,
    StorageError,
    InvalidAction,
    ConfigError,
}

/// What the UI receives when a cart operation fails.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Item not in cart: tee-01" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl CartError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::Core(CoreError::ItemNotInCart(_)) => ErrorCode::NotFound,
            CartError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            CartError::Core(CoreError::CartTooLarge { .. })
            | CartError::Core(CoreError::QuantityTooLarge { .. })
            | CartError::Core(CoreError::TotalTooLarge { .. }) => ErrorCode::CartLimit,
            CartError::Storage(_) => ErrorCode::StorageError,
            CartError::HydrationClosed | CartError::MalformedAction(_) => ErrorCode::InvalidAction,
            CartError::Config(_) => ErrorCode::ConfigError,
        }
    }
}

impl From<&CartError> for ErrorResponse {
    fn from(err: &CartError) -> Self {
        let message = match err {
            // Storage internals stay in the logs
            CartError::Storage(e) => {
                tracing::error!("Cart storage error: {}", e);
                "Cart storage is unavailable".to_string()
            }
            other => other.to_string(),
        };
        ErrorResponse {
            code: err.code(),
            message,
        }
    }
}
