//! # kenzie-core: Pure Cart Logic for the Kenzie Storefront
//!
//! This crate is the **heart** of the storefront cart. It holds the data
//! model and the transition function as pure code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kenzie Cart Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI                                │   │
//! │  │    Product page ──► Cart drawer ──► Coupon form ──► Checkout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ add_item, apply_coupon, ...            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  kenzie-cart (CartStore facade)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kenzie-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ CartState │  │   Money   │  │CartAction │  │   rules   │  │   │
//! │  │   │ CartItem  │  │ discounts │  │transition │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            kenzie-db (key-value store + bridge)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart data model (CartState, CartItem, Promo, Discount)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Actions and the pure transition function
//! - [`validation`] - Input rules checked before dispatch
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kenzie_core::{transition, CartAction, CartItem, CartState, Money};
//!
//! let state = CartState::default();
//! let next = transition(
//!     &state,
//!     CartAction::AddItem(CartItem::new("mug", Money::from_cents(1250), 2)),
//! )
//! .unwrap();
//!
//! assert_eq!(next.state.cart_total.cents(), 2500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{calculate_cart_total, transition, CartAction, PersistEffect, Transition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key the cart snapshot is stored under in the durable key-value store.
pub const DEFAULT_STORAGE_KEY: &str = "KenzieCart";

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Keeps snapshots small and checkout requests reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches fat-finger input (1000 instead of 10) before it reaches checkout.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price in cents ($100,000,000.00).
///
/// With the line and quantity limits this keeps every cart total exact in
/// both `i64` cents and the decimal JSON form.
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;
