//! # Domain Types
//!
//! The cart's data model: what a line looks like, what a promo carries,
//! and the aggregate `CartState` every transition produces.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         CartState                               │   │
//! │  │  items: Vec<CartItem>   itemCount   cartTotal                   │   │
//! │  │  promoCode              discount    couponId                    │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼──────────┐        ┌───────────▼─────────┐            │
//! │  │        CartItem         │        │      Discount       │            │
//! │  │  id (ItemId)            │        │  bps (u32)          │            │
//! │  │  price (Money)          │        │  1000 = 10% off     │            │
//! │  │  quantity               │        │  JSON: 0.1          │            │
//! │  │  attributes (opaque)    │        └─────────────────────┘            │
//! │  └─────────────────────────┘                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Shape
//! Field names are camelCase so the persisted snapshot and the TypeScript
//! bindings read the same as the storefront UI expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use ts_rs::TS;

use crate::cart::calculate_cart_total;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Discount
// =============================================================================

/// A percentage off, stored in basis points (1 bps = 0.01%).
///
/// ## Range
/// `0 ..< 10_000`: a promo can never make the cart free or negative.
///
/// ## Wire Format
/// Serialized as a fraction (`0.1` for 10%), which is what promo payloads
/// carry. Deserialization rejects anything outside `[0, 1)` and anything
/// finer than a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export)]
pub struct Discount(u32);

impl Discount {
    /// Exclusive upper bound in basis points (100%).
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount from basis points.
    ///
    /// The caller guarantees `bps < MAX_BPS`; untrusted input goes through
    /// [`Discount::try_from_bps`] instead.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Discount(bps)
    }

    /// Creates a discount from basis points, rejecting 100% or more.
    pub fn try_from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps >= Self::MAX_BPS {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: (Self::MAX_BPS - 1) as i64,
            });
        }
        Ok(Discount(bps))
    }

    /// Creates a discount from a fraction (`0.15` = 15% off).
    ///
    /// The fraction must be a whole number of basis points: `0.1235` is
    /// accepted, `0.12345` is rejected.
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::types::Discount;
    ///
    /// assert_eq!(Discount::from_fraction(0.1).unwrap().bps(), 1000);
    /// assert!(Discount::from_fraction(1.0).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(ValidationError::InvalidFormat {
                field: "discount".to_string(),
                reason: "must be a fraction between 0 and 1".to_string(),
            });
        }
        let scaled = fraction * Self::MAX_BPS as f64;
        let bps = scaled.round();
        // Finer than a basis point would not survive the round trip
        if (scaled - bps).abs() > 1e-6 {
            return Err(ValidationError::InvalidFormat {
                field: "discount".to_string(),
                reason: "must be a whole number of basis points (0.0001)".to_string(),
            });
        }
        if bps >= Self::MAX_BPS as f64 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: (Self::MAX_BPS - 1) as i64,
            });
        }
        Ok(Discount(bps as u32))
    }

    #[inline]
    pub const fn none() -> Self {
        Discount(0)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the discount as a fraction (for display and JSON only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / Self::MAX_BPS as f64
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Discount {
    type Error = ValidationError;

    fn try_from(fraction: f64) -> Result<Self, Self::Error> {
        Discount::from_fraction(fraction)
    }
}

impl From<Discount> for f64 {
    fn from(discount: Discount) -> f64 {
        discount.fraction()
    }
}

// =============================================================================
// Item Identifier
// =============================================================================

/// Opaque product identifier: catalog ids arrive as strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Text(id)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Number(id)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One product line in the cart.
///
/// ## Design Notes
/// - `price` is frozen at the moment of adding; a later catalog change does
///   not reprice lines already in the cart.
/// - `attributes` keeps every other field of the add request (name, image,
///   slug, ...) verbatim. The cart never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product identifier. Older snapshots call it `_id`.
    #[serde(alias = "_id")]
    pub id: ItemId,

    /// Unit price at time of adding (decimal in JSON).
    pub price: Money,

    /// Units of this product in the cart.
    pub quantity: i64,

    /// Opaque product payload.
    #[serde(flatten)]
    #[ts(skip)]
    pub attributes: Map<String, Value>,
}

impl CartItem {
    /// Creates a line with no extra attributes.
    pub fn new(id: impl Into<ItemId>, price: Money, quantity: i64) -> Self {
        CartItem {
            id: id.into(),
            price,
            quantity,
            attributes: Map::new(),
        }
    }

    /// Adds an opaque attribute (builder style).
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::{CartItem, Money};
    ///
    /// let item = CartItem::new("tee-01", Money::from_cents(1999), 1)
    ///     .with_attribute("name", "Logo Tee");
    /// assert_eq!(item.attributes["name"], "Logo Tee");
    /// ```
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Promo
// =============================================================================

/// A redeemed coupon as handed over by the checkout UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promo {
    /// Code the shopper typed ("SPRING10").
    pub code: String,

    /// Fraction taken off the pre-discount total.
    pub discount: Discount,

    /// Backend coupon identifier. Older payloads call it `_id`.
    #[serde(alias = "_id")]
    pub coupon_id: String,
}

impl Promo {
    pub fn new(code: impl Into<String>, discount: Discount, coupon_id: impl Into<String>) -> Self {
        Promo {
            code: code.into(),
            discount,
            coupon_id: coupon_id.into(),
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The aggregate root: everything the storefront knows about the cart.
///
/// ## Invariants (after every transition on valid input)
/// - `items` are unique by `id`, in first-add order
/// - every line has `quantity > 0`
/// - `item_count == Σ items[i].quantity`
/// - `cart_total == calculate_cart_total(items).apply_discount(discount)`
///
/// `CartState::default()` is the exact empty cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    /// Cart lines. Older snapshots call this `cart`.
    #[serde(alias = "cart")]
    pub items: Vec<CartItem>,

    /// Sum of all line quantities.
    pub item_count: i64,

    /// Discounted total (decimal in JSON).
    pub cart_total: Money,

    /// Applied promo code, empty when none.
    pub promo_code: String,

    /// Active discount, zero when no promo applied.
    pub discount: Discount,

    /// Applied coupon identifier, empty when none.
    pub coupon_id: String,
}

impl CartState {
    /// Returns the line for `id`, if any.
    pub fn find(&self, id: &ItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Membership check by id.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Σ quantity recomputed from the lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Pre-discount total.
    pub fn subtotal(&self) -> Money {
        calculate_cart_total(&self.items)
    }

    /// How much the active promo takes off.
    pub fn savings(&self) -> Money {
        self.subtotal() - self.cart_total
    }

    /// True when the derived fields agree with the lines.
    pub fn is_consistent(&self) -> bool {
        self.item_count == self.total_quantity()
            && self.cart_total == self.subtotal().apply_discount(self.discount)
            && self.items.iter().all(|item| item.quantity > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
