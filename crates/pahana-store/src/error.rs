//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / ValidationError                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (storefront) → message on stderr                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Corrupt stored data is NOT an error: loaders log it and start empty.

use pahana_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing directory failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The requested change breaks a cart rule (e.g. too many books).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
