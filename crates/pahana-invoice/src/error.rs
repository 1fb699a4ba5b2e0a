//! # Invoice Error Types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The order would need more pages than the layout allows.
    #[error("Invoice would exceed {max} pages")]
    TooManyPages { max: usize },

    /// Page geometry leaves no room for the item table.
    #[error("Invalid invoice layout: {0}")]
    InvalidLayout(String),

    /// Building or serializing the PDF failed.
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the invoice file failed. Nothing is left at the target path.
    #[error("Could not write invoice: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for invoice operations.
pub type InvoiceResult<T> = Result<T, InvoiceError>;
