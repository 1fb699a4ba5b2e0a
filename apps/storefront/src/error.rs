//! # App Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pahana checkout ...                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command Function ── Result<(), AppError>                               │
//! │         │                                                               │
//! │         ├── Form invalid?  ── CoreError::InvalidForm ──┐                │
//! │         ├── Cart empty?    ── CoreError::EmptyCart  ───┤                │
//! │         ├── Disk failure?  ── StoreError::Io ──────────┼──► AppError    │
//! │         └── PDF failure?   ── InvoiceError ────────────┘       │        │
//! │                                                                 ▼        │
//! │                             error notification + exit status 1          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pahana_core::{CoreError, FieldErrors, ValidationError};
use pahana_invoice::InvoiceError;
use pahana_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error("Could not encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Book {0} is not in your cart")]
    NotInCart(String),

    #[error("Book {0} is not in your wishlist")]
    NotInWishlist(String),

    #[error("No order has been placed yet")]
    NoOrder,
}

impl AppError {
    /// Per-field messages when the checkout form was rejected.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Core(CoreError::InvalidForm(errors)) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for storefront commands.
pub type AppResult<T> = Result<T, AppError>;
