//! # Validation Module
//!
//! Boundary validation for everything that enters the cart and checkout
//! rules: persisted carts, API payloads, command-line input and the
//! checkout form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input (storage JSON, CLI flags, checkout form)               │
//! │  ├── Loosely shaped: price may be a number, a string or missing        │
//! │  └── RawLineItem / ShippingInfo                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Defaults: missing price → 0, missing quantity → 1                 │
//! │  ├── Rejects: negative, sub-cent or huge price, bad quantity, blank id │
//! │  └── Form rules: required fields, email shape, card fields             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / pricing                                               │
//! │  └── Total over validated records; never fails                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pahana_core::validation::{normalize_line_item, RawLineItem};
//!
//! let raw: RawLineItem = serde_json::from_str(r#"{"id": 7, "title": "Emma", "price": "5.5"}"#).unwrap();
//! let item = normalize_line_item(raw).unwrap();
//! assert_eq!(item.unit_price.cents(), 550);
//! assert_eq!(item.quantity, 1);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::{BookId, LineItem, PaymentMethod, ShippingInfo};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Raw Records
// =============================================================================

/// A line item as found in storage or an incoming payload, before validation.
///
/// Ids may be JSON strings or numbers; price and quantity may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

// =============================================================================
// Amount Parsing
// =============================================================================

/// Reads a monetary amount from JSON without going through `f64`.
///
/// Strings are parsed as decimal text; numbers are parsed from their
/// shortest textual form, so `10.5` and `"10.50"` are the same amount.
pub fn money_from_json(field: &str, value: &Value) -> ValidationResult<Money> {
    let parsed = match value {
        Value::String(text) => Money::parse_decimal(text),
        Value::Number(number) => Money::parse_decimal(&number.to_string()),
        _ => {
            return Err(ValidationError::invalid_format(
                field,
                "expected a decimal amount",
            ))
        }
    };
    // Re-label errors with the caller's field name.
    parsed.map_err(|err| match err {
        ValidationError::InvalidFormat { reason, .. } => ValidationError::invalid_format(field, reason),
        ValidationError::Required { .. } => ValidationError::required(field),
        other => other,
    })
}

fn id_from_json(value: &Value) -> ValidationResult<BookId> {
    match value {
        Value::String(text) => BookId::new(text.as_str()),
        Value::Number(number) => BookId::new(number.to_string()),
        Value::Null => Err(ValidationError::required("id")),
        _ => Err(ValidationError::invalid_format("id", "expected a string or number")),
    }
}

fn quantity_from_json(value: &Value) -> ValidationResult<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| ValidationError::invalid_format("quantity", "must be a whole number")),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid_format("quantity", "must be a whole number")),
        _ => Err(ValidationError::invalid_format("quantity", "must be a whole number")),
    }
}

// =============================================================================
// Line Item Normalization
// =============================================================================

/// Turns a loosely shaped record into a [`LineItem`].
///
/// ## Rules
/// - Missing or `null` price → 0; negative, sub-cent or above
///   [`MAX_PRICE_CENTS`] → error
/// - Missing or `null` quantity → 1; otherwise a whole number in `1..=999`
/// - Blank id or title → error
pub fn normalize_line_item(raw: RawLineItem) -> ValidationResult<LineItem> {
    let id = id_from_json(&raw.id)?;

    let title = raw.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ValidationError::required("title"));
    }

    let unit_price = match raw.price {
        None | Some(Value::Null) => Money::zero(),
        Some(value) => money_from_json("price", &value)?,
    };
    validate_price_cents(unit_price.cents())?;

    let quantity = match raw.quantity {
        None | Some(Value::Null) => 1,
        Some(value) => quantity_from_json(&value)?,
    };
    validate_quantity(quantity)?;

    let author = raw
        .author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Ok(LineItem {
        id,
        title: title.to_string(),
        author,
        unit_price,
        quantity,
    })
}

/// Normalizes a whole collection: every record must pass and ids must be
/// unique, otherwise nothing is returned.
pub fn normalize_line_items(raws: Vec<RawLineItem>) -> ValidationResult<Vec<LineItem>> {
    validate_cart_size(raws.len().saturating_sub(1))?;

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(raws.len());
    for raw in raws {
        let item = normalize_line_item(raw)?;
        if !seen.insert(item.id.clone()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }
        items.push(item);
    }
    Ok(items)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
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

/// Validates a price in cents: `0..=MAX_PRICE_CENTS`.
///
/// ```rust
/// use pahana_core::validation::validate_price_cents;
/// use pahana_core::MAX_PRICE_CENTS;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Checks that one more distinct book fits in a cart already holding
/// `current_items`.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Loose `something@something.something` check used by the checkout form.
///
/// Matches when some `@` has a non-space character before it and is followed
/// by a run of non-space characters containing a `.` that is neither the
/// first nor the last character of that run.
pub fn looks_like_email(email: &str) -> bool {
    let chars: Vec<char> = email.chars().collect();
    chars.iter().enumerate().any(|(at, &c)| {
        if c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        let run: Vec<char> = chars[at + 1..]
            .iter()
            .copied()
            .take_while(|ch| !ch.is_whitespace())
            .collect();
        run.iter()
            .enumerate()
            .any(|(i, &ch)| ch == '.' && i > 0 && i + 1 < run.len())
    })
}

/// Validates the checkout form, collecting every failing field.
///
/// Keys match the form's field names (`name`, `email`, `cardNumber`, ...).
pub fn validate_shipping_info(info: &ShippingInfo) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if info.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }
    if info.address.trim().is_empty() {
        errors.insert("address", "Address is required");
    }
    if info.phone.trim().is_empty() {
        errors.insert("phone", "Phone number is required");
    }
    if info.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !looks_like_email(&info.email) {
        errors.insert("email", "Email is invalid");
    }

    if info.payment_method == PaymentMethod::CreditCard {
        let card = info.card.clone().unwrap_or_default();
        if card.number.trim().is_empty() {
            errors.insert("cardNumber", "Card number is required");
        }
        if card.expiry.trim().is_empty() {
            errors.insert("expiryDate", "Expiry date is required");
        }
        if card.cvv.trim().is_empty() {
            errors.insert("cvv", "CVV is required");
        }
        if card.holder_name.trim().is_empty() {
            errors.insert("cardHolderName", "Cardholder name is required");
        }
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
