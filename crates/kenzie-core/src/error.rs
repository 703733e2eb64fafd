//! # Error Types
//!
//! Domain-specific error types for kenzie-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kenzie-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations, lookup misses            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kenzie-db errors (separate crate)                                     │
//! │  └── DbError          - Key-value store failures                       │
//! │                                                                         │
//! │  kenzie-cart errors (facade)                                           │
//! │  └── CartError        - What the UI sees                               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → UI                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ItemId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations and lookup failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The cart has no line for the given item.
    ///
    /// ## When This Occurs
    /// - `RemoveAllItems` for an id that was never added
    /// - The line was already removed by an earlier action
    #[error("Item not in cart: {0}")]
    ItemNotInCart(ItemId),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The cart total would no longer be representable.
    #[error("Cart total cannot exceed {max} cents")]
    TotalTooLarge { max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any transition runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
