//! # Domain Types
//!
//! Explicit records for everything that crosses into the cart and checkout
//! rules. Required fields are plain, optional ones are `Option`, and every
//! record is validated once, at the boundary.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │    LineItem     │   │   OrderTotals   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (BookId)    │──►│  id (BookId)    │──►│  subtotal       │       │
//! │  │  title, author  │   │  title          │   │  tax_amount     │       │
//! │  │  price (Money)  │   │  unit_price     │   │  shipping_cost  │       │
//! │  │  category?      │   │  quantity ≥ 1   │   │  grand_total    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  ShippingTier   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Standard       │   │  CreditCard     │       │
//! │  │  80 = 0.8%      │   │  Express        │   │  Paypal         │       │
//! │  └─────────────────┘   │  Overnight      │   │  CashOnDelivery │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, PreciseMoney};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 80 bps = 0.008.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as a fraction, e.g. `0.008` (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

// =============================================================================
// Book
// =============================================================================

/// Identifier of a book, as issued by the catalogue API.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct BookId(String);

impl BookId {
    /// Creates an id; blank ids are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::required("id"));
        }
        Ok(BookId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BookId::new(value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A book from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "string")]
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// File name of the cover image on the catalogue server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One distinct book in a cart or order, with its quantity.
///
/// ## Invariants
/// - `unit_price` is non-negative
/// - `quantity` ≥ 1 while the item is retained in a cart
///
/// Both are established by [`crate::validation`] before a `LineItem` exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Frozen at the moment the book was added.
    #[serde(rename = "price", with = "crate::money::decimal")]
    #[ts(type = "string")]
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(id: BookId, title: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        LineItem {
            id,
            title: title.into(),
            author: None,
            unit_price,
            quantity,
        }
    }

    /// A quantity-1 line for a catalogue book (the "Add to Cart" button).
    pub fn from_book(book: &Book) -> Self {
        LineItem {
            id: book.id.clone(),
            title: book.title.clone(),
            author: (!book.author.is_empty()).then(|| book.author.clone()),
            unit_price: book.price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Named shipping speed selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ShippingTier {
    /// 5-7 business days.
    #[default]
    Standard,
    /// 2-3 business days.
    Express,
    /// Next business day.
    Overnight,
}

impl ShippingTier {
    pub const ALL: [ShippingTier; 3] = [
        ShippingTier::Standard,
        ShippingTier::Express,
        ShippingTier::Overnight,
    ];

    /// Wire / form value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShippingTier::Standard => "standard",
            ShippingTier::Express => "express",
            ShippingTier::Overnight => "overnight",
        }
    }

    /// Human label with delivery window.
    pub const fn label(&self) -> &'static str {
        match self {
            ShippingTier::Standard => "Standard Shipping (5-7 business days)",
            ShippingTier::Express => "Express Shipping (2-3 business days)",
            ShippingTier::Overnight => "Overnight Shipping (next business day)",
        }
    }
}

impl fmt::Display for ShippingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShippingTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "shippingMethod".to_string(),
                allowed: ShippingTier::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            })
    }
}

/// Fixed cost per shipping tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingRates {
    pub standard: Money,
    pub express: Money,
    pub overnight: Money,
}

impl ShippingRates {
    pub const fn cost(&self, tier: ShippingTier) -> Money {
        match tier {
            ShippingTier::Standard => self.standard,
            ShippingTier::Express => self.express,
            ShippingTier::Overnight => self.overnight,
        }
    }
}

// =============================================================================
// Payment & Customer Details
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    CashOnDelivery,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::CashOnDelivery,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "creditCard",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::CashOnDelivery => "cashOnDelivery",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

/// Card fields of the checkout form. Only meaningful for `CreditCard`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub holder_name: String,
}

impl CardDetails {
    /// Last four digits of the card number, for receipts.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{}", self.last_four()))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .field("holder_name", &self.holder_name)
            .finish()
    }
}

/// Customer and delivery details captured by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub shipping_method: ShippingTier,
    pub payment_method: PaymentMethod,
    /// Never persisted; the card stays in memory for the checkout request only.
    #[serde(default, skip_serializing)]
    #[ts(skip)]
    pub card: Option<CardDetails>,
}

// =============================================================================
// Order Totals
// =============================================================================

/// Derived totals for a set of line items and a shipping selection.
///
/// ## Invariants
/// - `subtotal = Σ unit_price × quantity`
/// - `tax_amount = subtotal × tax rate` (unrounded)
/// - `grand_total = subtotal + tax_amount + shipping_cost` (unrounded)
///
/// Never stored on its own; always recomputed from the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax_amount: PreciseMoney,
    pub shipping_cost: Money,
    pub grand_total: PreciseMoney,
}

impl OrderTotals {
    /// Tax rounded to cents for display.
    pub fn tax_display(&self) -> Money {
        self.tax_amount.round_to_cents()
    }

    /// Grand total rounded to cents for display.
    pub fn grand_total_display(&self) -> Money {
        self.grand_total.round_to_cents()
    }
}

// =============================================================================
// Order Id
// =============================================================================

/// Customer-facing order reference, e.g. `ORD-1F3A9C0B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    /// Generates a fresh reference from a random UUID.
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        OrderId(format!("ORD-{}", simple[..8].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(0.8).bps(), 80);
        assert_eq!(TaxRate::from_percentage(0.1).bps(), 10);
        assert!((TaxRate::from_bps(80).percentage() - 0.8).abs() < 1e-9);
        assert!((TaxRate::from_bps(80).fraction() - 0.008).abs() < 1e-12);
    }

    #[test]
    fn test_line_item_from_book() {
        let mut book = Book {
            id: BookId::new("7").unwrap(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: Money::from_cents(1299),
            category: Some("Fiction".to_string()),
            description: None,
            image: None,
        };
        let item = LineItem::from_book(&book);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, Money::from_cents(1299));
        assert_eq!(item.author.as_deref(), Some("Frank Herbert"));

        book.author.clear();
        assert!(LineItem::from_book(&book).author.is_none());
    }

    #[test]
    fn test_book_id_rejects_blank() {
        assert!(BookId::new("  ").is_err());
        assert_eq!(BookId::new(" 64ab ").unwrap().as_str(), "64ab");
    }

    #[test]
    fn test_line_item_serializes_price_as_decimal() {
        let item = LineItem::new(BookId::new("1").unwrap(), "Dune", Money::from_cents(1050), 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], "10.50");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("author").is_none());

        let back: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.line_total().cents(), 2100);
    }

    #[test]
    fn test_shipping_tier_parse() {
        assert_eq!("Express".parse::<ShippingTier>().unwrap(), ShippingTier::Express);
        assert_eq!(" overnight ".parse::<ShippingTier>().unwrap(), ShippingTier::Overnight);
        assert!("teleport".parse::<ShippingTier>().is_err());
        assert_eq!(ShippingTier::default(), ShippingTier::Standard);
    }

    #[test]
    fn test_payment_method_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap();
        assert_eq!(json, "\"cashOnDelivery\"");
        assert_eq!("creditcard".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
    }

    #[test]
    fn test_card_debug_is_masked() {
        let card = CardDetails {
            number: "4111 1111 1111 1234".to_string(),
            expiry: "12/27".to_string(),
            cvv: "999".to_string(),
            holder_name: "A Reader".to_string(),
        };
        let debug = format!("{card:?}");
        assert!(debug.contains("****1234"));
        assert!(!debug.contains("999"));
        assert!(!debug.contains("4111"));
    }

    #[test]
    fn test_card_is_not_serialized() {
        let info = ShippingInfo {
            name: "A Reader".to_string(),
            card: Some(CardDetails::default()),
            ..ShippingInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("card").is_none());
        assert_eq!(json["shippingMethod"], "standard");
        assert_eq!(json["paymentMethod"], "creditCard");
    }

    #[test]
    fn test_order_id_format() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ORD-"));
        assert_eq!(id.as_str().len(), 12);
    }
}
