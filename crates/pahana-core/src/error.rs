//! # Error Types
//!
//! Domain-specific error types for pahana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pahana-core errors (this file)                                        │
//! │  ├── CoreError        - Checkout rule violations                       │
//! │  ├── ValidationError  - A single malformed input value                 │
//! │  └── FieldErrors      - Every failing field of a form                  │
//! │                                                                         │
//! │  pahana-store errors   └── StoreError    - persistence failures        │
//! │  pahana-invoice errors └── InvoiceError  - layout / PDF failures       │
//! │  storefront app        └── AppError      - what the user sees          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator itself never returns these: cart and pricing operations are
//! total over validated input. Errors are raised at the boundary only.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout-level business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty. Please add items to your cart before proceeding.")]
    EmptyCart,

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// The checkout form failed validation.
    #[error("Checkout form is invalid: {0}")]
    InvalidForm(FieldErrors),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when data crossing into the core (persisted carts, API payloads,
/// command-line input) does not meet the record contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. non-integer quantity, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. the same book twice in one payload).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Per-field messages collected from a form, keyed by the form field name.
///
/// Mirrors what the checkout form shows next to each input, so every failing
/// field is reported at once rather than just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::InvalidForm(errors)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("price");
        assert_eq!(err.to_string(), "price is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("id").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_errors_display_is_sorted_by_field() {
        let mut errors = FieldErrors::new();
        errors.insert("phone", "Phone number is required");
        errors.insert("email", "Email is invalid");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "email: Email is invalid; phone: Phone number is required"
        );
        assert!(errors.clone().into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
