//! # pahana-invoice: Printable Invoices
//!
//! Lays out a placed [`pahana_core::Order`] on A4 pages and renders it as a
//! PDF the shopper can keep.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Order ──► layout_invoice() ──► InvoiceDocument ──► render_pdf()       │
//! │              │                    (pages of          │                  │
//! │              │ wrap_text()         positioned text)  ▼                  │
//! │              │ pagination                         Vec<u8> (PDF)        │
//! │              │ "Page i of n"                          │                 │
//! │                                                       ▼                 │
//! │                                   write_invoice(): temp file + rename   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pahana_invoice::{write_invoice_to_dir, InvoiceLayout};
//!
//! # fn demo(order: &pahana_core::Order) -> Result<(), pahana_invoice::InvoiceError> {
//! let path = write_invoice_to_dir(order, Path::new("."), &InvoiceLayout::default(), "Rs.")?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod layout;
pub mod output;
pub mod pdf;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{InvoiceError, InvoiceResult};
pub use layout::{layout_invoice, wrap_text, InvoiceDocument, InvoiceLayout, InvoicePage, TextLine};
pub use output::{invoice_file_name, write_invoice, write_invoice_to_dir};
pub use pdf::render_pdf;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use pahana_core::{
        compute_totals, BookId, CardDetails, LineItem, Money, Order, OrderId, PaymentMethod,
        PricingPolicy, ShippingInfo, ShippingTier, TAX_RATE,
    };

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            name: "A Reader".to_string(),
            address: "12 Galle Road, Colombo 03".to_string(),
            phone: "0771234567".to_string(),
            email: "reader@pahana.lk".to_string(),
            shipping_method: ShippingTier::Standard,
            payment_method: PaymentMethod::CreditCard,
            card: Some(CardDetails {
                number: "4111111111111234".to_string(),
                expiry: "12/27".to_string(),
                cvv: "123".to_string(),
                holder_name: "A Reader".to_string(),
            }),
        }
    }

    /// Dune 10.00 × 2 + Emma 5.50 × 1, standard shipping: 375.70.
    pub fn reference_order() -> Order {
        let items = vec![
            LineItem::new(BookId::new("1").unwrap(), "Dune", Money::from_cents(1000), 2),
            LineItem::new(BookId::new("2").unwrap(), "Emma", Money::from_cents(550), 1),
        ];
        Order::place(
            OrderId::new("ORD-1F3A9C0B"),
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
            items,
            shipping(),
            &PricingPolicy::default(),
        )
        .unwrap()
    }

    /// A placed order for `(cents, quantity)` lines shipped by `tier`.
    pub fn order_of(lines: &[(i64, i64)], tier: ShippingTier) -> Order {
        let items = lines
            .iter()
            .enumerate()
            .map(|(i, &(cents, qty))| {
                LineItem::new(BookId::new(i.to_string()).unwrap(), format!("Book {i}"), Money::from_cents(cents), qty)
            })
            .collect();
        let mut shipping = shipping();
        shipping.shipping_method = tier;
        Order::place(
            OrderId::new("ORD-5EED0001"),
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
            items,
            shipping,
            &PricingPolicy::default(),
        )
        .unwrap()
    }

    /// `count` single-copy lines all titled `title`, built directly so the
    /// count may exceed the cart limit.
    pub fn order_with(count: usize, title: &str) -> Order {
        let items: Vec<LineItem> = (0..count)
            .map(|i| LineItem::new(BookId::new(i.to_string()).unwrap(), title, Money::from_cents(1299), 1))
            .collect();
        let mut shipping = shipping();
        shipping.card = None;
        Order {
            id: OrderId::new("ORD-00C0FFEE"),
            date: Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
            totals: compute_totals(&items, Some(ShippingTier::Standard)),
            items,
            shipping,
            tax_rate: TAX_RATE,
            card_last_four: Some("1234".to_string()),
        }
    }
}
