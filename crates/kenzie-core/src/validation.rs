//! # Validation Module
//!
//! Input checks the cart facade runs before dispatching an action.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI                                                │
//! │  ├── Quantity pickers, coupon form                                     │
//! │  └── Immediate shopper feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CartStore facade (kenzie-cart)                               │
//! │  └── THIS MODULE: quantity, price, id, promo and cart-size rules       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: transition() (kenzie-core::cart)                             │
//! │  └── Takes input as given; never rejects a quantity                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kenzie_core::validation::{validate_quantity, validate_price_cents};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_price_cents(-1).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartItem, CartState, Discount, ItemId, Promo};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Shopper Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product page: "Add to cart" with quantity 5                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → AddItem dispatched                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an item id. Text ids must not be blank.
pub fn validate_item_id(id: &ItemId) -> ValidationResult<()> {
    match id {
        ItemId::Text(text) if text.trim().is_empty() => Err(ValidationError::Required {
            field: "id".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates a discount (0% up to, but not including, 100%).
pub fn validate_discount(discount: Discount) -> ValidationResult<()> {
    Discount::try_from_bps(discount.bps()).map(|_| ())
}

// =============================================================================
// Action Validators
// =============================================================================

/// Validates an item about to be added to `state`.
///
/// ## Rules
/// - id, price and quantity pass the field validators
/// - merged quantity for an existing line stays within MAX_ITEM_QUANTITY
/// - a new line does not push the cart past MAX_CART_ITEMS lines
/// - the pre-discount total stays within `Money::MAX_EXACT_CENTS`
pub fn validate_add(state: &CartState, item: &CartItem) -> CoreResult<()> {
    validate_item_id(&item.id)?;
    validate_price_cents(item.price.cents())?;
    validate_quantity(item.quantity)?;

    match state.find(&item.id) {
        Some(line) => {
            let merged = line.quantity + item.quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
        }
        None => {
            if state.line_count() >= MAX_CART_ITEMS {
                return Err(CoreError::CartTooLarge {
                    max: MAX_CART_ITEMS,
                });
            }
        }
    }

    // Hydrated lines bypass the price limit, so check the sum itself
    let subtotal = state.items.iter().try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line.price.checked_multiply_quantity(line.quantity)?)
    });
    let total = subtotal
        .zip(item.price.checked_multiply_quantity(item.quantity))
        .and_then(|(subtotal, line)| subtotal.checked_add(line));
    match total {
        Some(total) if total.cents() <= Money::MAX_EXACT_CENTS => Ok(()),
        _ => Err(CoreError::TotalTooLarge {
            max: Money::MAX_EXACT_CENTS,
        }),
    }
}

/// Validates a promo before it is applied.
pub fn validate_promo(promo: &Promo) -> ValidationResult<()> {
    if promo.code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    validate_discount(promo.discount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(i64::MAX / 2).is_err());
    }

    #[test]
    fn test_validate_add_rejects_unrepresentable_total() {
        // A hydrated line can carry any price
        let state = CartState {
            items: vec![CartItem::new("big", Money::from_cents(Money::MAX_EXACT_CENTS), 1)],
            item_count: 1,
            ..CartState::default()
        };

        let item = CartItem::new("a", Money::from_cents(MAX_PRICE_CENTS), 1);
        assert_eq!(
            validate_add(&state, &item).unwrap_err(),
            CoreError::TotalTooLarge {
                max: Money::MAX_EXACT_CENTS
            }
        );

        let overflowing = CartState {
            items: vec![CartItem::new("big", Money::from_cents(i64::MAX / 2), 3)],
            item_count: 3,
            ..CartState::default()
        };
        assert!(matches!(
            validate_add(&overflowing, &item),
            Err(CoreError::TotalTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id(&ItemId::from("sku-1")).is_ok());
        assert!(validate_item_id(&ItemId::from(0)).is_ok());
        assert!(validate_item_id(&ItemId::from("  ")).is_err());
    }

    #[test]
    fn test_validate_add_merged_quantity_limit() {
        let state = CartState {
            items: vec![CartItem::new("a", Money::from_cents(100), 990)],
            item_count: 990,
            ..CartState::default()
        };

        let ok = CartItem::new("a", Money::from_cents(100), 9);
        assert!(validate_add(&state, &ok).is_ok());

        let too_many = CartItem::new("a", Money::from_cents(100), 10);
        assert_eq!(
            validate_add(&state, &too_many).unwrap_err(),
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY
            }
        );
    }

    #[test]
    fn test_validate_add_cart_size_limit() {
        let items: Vec<CartItem> = (0..MAX_CART_ITEMS as i64)
            .map(|i| CartItem::new(i, Money::from_cents(100), 1))
            .collect();
        let state = CartState {
            item_count: items.len() as i64,
            items,
            ..CartState::default()
        };

        let new_line = CartItem::new("one-more", Money::from_cents(100), 1);
        assert!(matches!(
            validate_add(&state, &new_line),
            Err(CoreError::CartTooLarge { .. })
        ));

        // Merging into an existing line is still fine
        let existing = CartItem::new(0, Money::from_cents(100), 1);
        assert!(validate_add(&state, &existing).is_ok());
    }

    #[test]
    fn test_validate_add_rejects_non_positive_quantity() {
        let state = CartState::default();
        let item = CartItem::new("a", Money::from_cents(100), 0);
        assert!(matches!(
            validate_add(&state, &item),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_validate_promo() {
        assert!(validate_promo(&Promo::new("TEN", Discount::from_bps(1000), "c1")).is_ok());
        assert!(validate_promo(&Promo::new("", Discount::from_bps(1000), "c1")).is_err());
        assert!(validate_promo(&Promo::new("ALL", Discount::from_bps(10_000), "c1")).is_err());
    }
}
