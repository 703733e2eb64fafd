//! # Cart Transitions
//!
//! The cart state machine: a pure function from `(state, action)` to the next
//! state plus the storage effect the caller must perform.
//!
//! ## Two-Step Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Cart Action, End to End                          │
//! │                                                                         │
//! │  UI ──► CartAction::AddItem(item)                                      │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  transition(&state, action)      ← THIS MODULE (pure, no I/O)          │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  Transition { state, effect }                                          │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  CartStore performs effect       ← kenzie-cart                         │
//! │     Write ──► bridge.persist(&state)                                   │
//! │     Clear ──► bridge.clear()                                           │
//! │     Skip  ──► nothing                                                  │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  new state becomes observable                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Recomputation
//! `cart_total` is always recomputed from the lines and the active discount.
//! `item_count` is adjusted incrementally, floored at zero on removals.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, CartState, Discount, ItemId, Promo};

// =============================================================================
// Actions
// =============================================================================

/// Every way the cart can change.
///
/// ## Wire Format
/// Adjacently tagged, so actions posted by the storefront decode directly:
/// ```json
/// { "type": "ADD_ITEM", "payload": { "id": "tee-01", "price": 19.99, "quantity": 1 } }
/// { "type": "REMOVE_ITEM", "payload": "tee-01" }
/// { "type": "RESET_CART" }
/// ```
/// A `type` this enum does not know decodes to [`CartAction::Unknown`],
/// whatever payload it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    try_from = "RawAction"
)]
pub enum CartAction {
    /// Add a line, or merge quantities into the existing line with that id.
    AddItem(CartItem),

    /// Take one unit off a line; the line disappears at zero.
    RemoveItem(ItemId),

    /// Drop a line regardless of its quantity.
    RemoveAllItems(ItemId),

    /// Apply a coupon to the pre-discount total.
    ApplyPromoCode(Promo),

    /// Back to the empty cart.
    ResetCart,

    /// Back to the empty cart, removing the stored snapshot.
    DeleteCartStorage,

    /// Replace the state with a hydrated snapshot (startup only).
    InitSavedCart(CartState),

    /// Anything else. Identity transition.
    Unknown,
}

/// Undecoded action: the tag plus whatever payload came with it.
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawAction> for CartAction {
    type Error = serde_json::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let payload = raw.payload;
        let action = match raw.kind.as_str() {
            "ADD_ITEM" => CartAction::AddItem(serde_json::from_value(payload)?),
            "REMOVE_ITEM" => CartAction::RemoveItem(serde_json::from_value(payload)?),
            "REMOVE_ALL_ITEMS" => CartAction::RemoveAllItems(serde_json::from_value(payload)?),
            "APPLY_PROMO_CODE" => CartAction::ApplyPromoCode(serde_json::from_value(payload)?),
            "RESET_CART" => CartAction::ResetCart,
            "DELETE_CART_STORAGE" => CartAction::DeleteCartStorage,
            "INIT_SAVED_CART" => CartAction::InitSavedCart(serde_json::from_value(payload)?),
            _ => CartAction::Unknown,
        };
        Ok(action)
    }
}

impl CartAction {
    /// Stable name for logs, matching the wire tag.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::AddItem(_) => "ADD_ITEM",
            CartAction::RemoveItem(_) => "REMOVE_ITEM",
            CartAction::RemoveAllItems(_) => "REMOVE_ALL_ITEMS",
            CartAction::ApplyPromoCode(_) => "APPLY_PROMO_CODE",
            CartAction::ResetCart => "RESET_CART",
            CartAction::DeleteCartStorage => "DELETE_CART_STORAGE",
            CartAction::InitSavedCart(_) => "INIT_SAVED_CART",
            CartAction::Unknown => "UNKNOWN",
        }
    }
}

// =============================================================================
// Transition Result
// =============================================================================

/// What the caller must do with durable storage after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistEffect {
    /// Overwrite the stored snapshot with the new state.
    Write,
    /// Remove the stored snapshot entirely.
    Clear,
    /// Leave storage alone.
    Skip,
}

/// Output of [`transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CartState,
    pub effect: PersistEffect,
}

impl Transition {
    fn write(state: CartState) -> Self {
        Transition {
            state,
            effect: PersistEffect::Write,
        }
    }

    fn clear() -> Self {
        Transition {
            state: CartState::default(),
            effect: PersistEffect::Clear,
        }
    }

    fn skip(state: CartState) -> Self {
        Transition {
            state,
            effect: PersistEffect::Skip,
        }
    }
}

// =============================================================================
// Calculations
// =============================================================================

/// Pre-discount cart total: `Σ price × quantity`.
///
/// Integer cents make the sum exact, so the two-decimal result is the same
/// whatever order the lines are in.
///
/// ## Example
/// ```rust
/// use kenzie_core::{calculate_cart_total, CartItem, Money};
///
/// let items = vec![
///     CartItem::new("a", Money::from_cents(1000), 2),
///     CartItem::new("b", Money::from_cents(250), 3),
/// ];
/// assert_eq!(calculate_cart_total(&items).cents(), 2750);
/// ```
pub fn calculate_cart_total(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

fn discounted_total(items: &[CartItem], discount: Discount) -> Money {
    calculate_cart_total(items).apply_discount(discount)
}

// =============================================================================
// Transition Function
// =============================================================================

/// Computes the next cart state.
///
/// Pure and deterministic: the same `(state, action)` always yields the same
/// [`Transition`]. The only failure is `RemoveAllItems` for an id with no
/// line, which leaves `state` untouched.
///
/// ## Example
/// ```rust
/// use kenzie_core::{transition, CartAction, CartItem, CartState, Money, PersistEffect};
///
/// let state = CartState::default();
/// let item = CartItem::new("a", Money::from_cents(1000), 2);
///
/// let next = transition(&state, CartAction::AddItem(item)).unwrap();
/// assert_eq!(next.state.item_count, 2);
/// assert_eq!(next.state.cart_total.cents(), 2000);
/// assert_eq!(next.effect, PersistEffect::Write);
/// ```
pub fn transition(state: &CartState, action: CartAction) -> CoreResult<Transition> {
    match action {
        CartAction::AddItem(item) => Ok(add_item(state, item)),
        CartAction::RemoveItem(id) => Ok(remove_item(state, &id)),
        CartAction::RemoveAllItems(id) => remove_all_items(state, &id),
        CartAction::ApplyPromoCode(promo) => Ok(apply_promo(state, promo)),
        CartAction::ResetCart | CartAction::DeleteCartStorage => Ok(Transition::clear()),
        CartAction::InitSavedCart(saved) => Ok(Transition::skip(saved)),
        CartAction::Unknown => Ok(Transition::skip(state.clone())),
    }
}

fn add_item(state: &CartState, item: CartItem) -> Transition {
    let added = item.quantity;
    let mut items = state.items.clone();

    match items.iter().position(|line| line.id == item.id) {
        Some(index) => {
            // Incoming payload wins, quantities merge
            let quantity = items[index].quantity.saturating_add(added);
            items[index] = CartItem { quantity, ..item };
        }
        None => items.push(item),
    }

    Transition::write(CartState {
        cart_total: discounted_total(&items, state.discount),
        item_count: state.item_count.saturating_add(added),
        items,
        ..state.clone()
    })
}

fn remove_item(state: &CartState, id: &ItemId) -> Transition {
    if !state.contains(id) {
        return Transition::skip(state.clone());
    }

    let items: Vec<CartItem> = state
        .items
        .iter()
        .map(|line| {
            if &line.id == id {
                CartItem {
                    quantity: line.quantity.saturating_sub(1),
                    ..line.clone()
                }
            } else {
                line.clone()
            }
        })
        .filter(|line| line.quantity > 0)
        .collect();

    Transition::write(CartState {
        cart_total: discounted_total(&items, state.discount),
        item_count: state.item_count.saturating_sub(1).max(0),
        items,
        ..state.clone()
    })
}

fn remove_all_items(state: &CartState, id: &ItemId) -> CoreResult<Transition> {
    let removed = state
        .find(id)
        .map(|line| line.quantity)
        .ok_or_else(|| CoreError::ItemNotInCart(id.clone()))?;

    let items: Vec<CartItem> = state
        .items
        .iter()
        .filter(|line| &line.id != id)
        .cloned()
        .collect();

    Ok(Transition::write(CartState {
        cart_total: discounted_total(&items, state.discount),
        item_count: state.item_count.saturating_sub(removed).max(0),
        items,
        ..state.clone()
    }))
}

fn apply_promo(state: &CartState, promo: Promo) -> Transition {
    // Re-based on the pre-discount total, never compounded
    Transition::write(CartState {
        cart_total: discounted_total(&state.items, promo.discount),
        promo_code: promo.code,
        discount: promo.discount,
        coupon_id: promo.coupon_id,
        ..state.clone()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
