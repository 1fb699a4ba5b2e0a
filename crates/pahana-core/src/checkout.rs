//! # Checkout
//!
//! Turning a cart snapshot and a filled-in form into a placed [`Order`],
//! and the JSON payload the bookshop backend accepts for it.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Place Order                                     │
//! │                                                                         │
//! │  cart.snapshot() ──┐                                                    │
//! │                    ├──► Order::place() ──► Order ──┬──► CheckoutRequest │
//! │  ShippingInfo ─────┘      │                       │     (POST payload)  │
//! │                           ├── empty cart? → Err   │                     │
//! │                           ├── form errors? → Err  └──► invoice / store  │
//! │                           └── totals from policy                        │
//! │                                                                         │
//! │  The card never enters the Order; only its last four digits do.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::pricing::PricingPolicy;
use crate::types::{
    CardDetails, LineItem, OrderId, OrderTotals, PaymentMethod, ShippingInfo, ShippingTier, TaxRate,
};
use crate::validation::{validate_price_cents, validate_quantity, validate_shipping_info};
use crate::MAX_CART_ITEMS;

// =============================================================================
// Order
// =============================================================================

/// A placed order: everything the invoice and the "last order" record need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: OrderId,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub shipping: ShippingInfo,
    pub totals: OrderTotals,
    /// Rate the totals were computed with, for the invoice's tax line.
    pub tax_rate: TaxRate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last_four: Option<String>,
}

impl Order {
    /// Validates the form, rejects an empty cart and freezes the totals.
    ///
    /// `items` should be a snapshot taken at the moment the shopper pressed
    /// "Place Order"; later cart edits do not affect the order.
    pub fn place(
        id: OrderId,
        date: DateTime<Utc>,
        items: Vec<LineItem>,
        mut shipping: ShippingInfo,
        policy: &PricingPolicy,
    ) -> CoreResult<Order> {
        if items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if items.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }
        for item in &items {
            validate_quantity(item.quantity)?;
            validate_price_cents(item.unit_price.cents())?;
        }
        validate_shipping_info(&shipping)?;

        let card = shipping.card.take();
        let card_last_four = match shipping.payment_method {
            PaymentMethod::CreditCard => card.as_ref().map(CardDetails::last_four),
            _ => None,
        };

        let totals = policy.compute_totals(&items, Some(shipping.shipping_method));

        Ok(Order {
            id,
            date,
            items,
            shipping,
            totals,
            tax_rate: policy.tax_rate,
            card_last_four,
        })
    }

    /// Sum of quantities across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// Body of `POST /api/checkout`.
///
/// Amounts are two-decimal strings, the same figures the shopper saw.
/// Card fields are present only for credit-card payment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_items: Vec<LineItem>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub shipping_method: ShippingTier,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder_name: Option<String>,
    pub total_price: String,
    pub shipping_cost: String,
    pub tax_amount: String,
    pub final_total: String,
}

impl CheckoutRequest {
    /// Builds the payload for a placed order. `card` is the form's card,
    /// which the order itself does not keep.
    pub fn from_order(order: &Order, card: Option<&CardDetails>) -> Self {
        let card = match order.shipping.payment_method {
            PaymentMethod::CreditCard => card,
            _ => None,
        };
        let totals = &order.totals;

        CheckoutRequest {
            cart_items: order.items.clone(),
            name: order.shipping.name.clone(),
            address: order.shipping.address.clone(),
            phone: order.shipping.phone.clone(),
            email: order.shipping.email.clone(),
            shipping_method: order.shipping.shipping_method,
            payment_method: order.shipping.payment_method,
            card_number: card.map(|c| c.number.clone()),
            expiry_date: card.map(|c| c.expiry.clone()),
            cvv: card.map(|c| c.cvv.clone()),
            card_holder_name: card.map(|c| c.holder_name.clone()),
            total_price: totals.subtotal.to_string(),
            shipping_cost: totals.shipping_cost.to_string(),
            tax_amount: totals.tax_display().to_string(),
            final_total: totals.grand_total_display().to_string(),
        }
    }

    /// Copy safe to print or write to disk: card number cut to its last
    /// four digits and the CVV dropped.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.card_number = copy.card_number.as_ref().map(|number| {
            let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
            let start = digits.len().saturating_sub(4);
            format!("****{}", digits[start..].iter().collect::<String>())
        });
        copy.cvv = None;
        copy
    }
}

impl fmt::Debug for CheckoutRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutRequest")
            .field("cart_items", &self.cart_items.len())
            .field("email", &self.email)
            .field("shipping_method", &self.shipping_method)
            .field("payment_method", &self.payment_method)
            .field("final_total", &self.final_total)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::types::BookId;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::new(BookId::new("1").unwrap(), "Dune", Money::from_cents(1000), 2),
            LineItem::new(BookId::new("2").unwrap(), "Emma", Money::from_cents(550), 1),
        ]
    }

    fn card() -> CardDetails {
        CardDetails {
            number: "4111 1111 1111 1234".to_string(),
            expiry: "12/27".to_string(),
            cvv: "999".to_string(),
            holder_name: "A Reader".to_string(),
        }
    }

    fn form(payment: PaymentMethod) -> ShippingInfo {
        ShippingInfo {
            name: "A Reader".to_string(),
            address: "12 Galle Road, Colombo".to_string(),
            phone: "0771234567".to_string(),
            email: "reader@pahana.lk".to_string(),
            shipping_method: ShippingTier::Standard,
            payment_method: payment,
            card: Some(card()),
        }
    }

    fn place(items: Vec<LineItem>, info: ShippingInfo) -> CoreResult<Order> {
        Order::place(
            OrderId::new("ORD-TEST0001"),
            Utc::now(),
            items,
            info,
            &PricingPolicy::default(),
        )
    }

    #[test]
    fn test_place_order() {
        let order = place(items(), form(PaymentMethod::CreditCard)).unwrap();

        assert_eq!(order.totals.grand_total_display().cents(), 37_570);
        assert_eq!(order.total_quantity(), 3);
        assert_eq!(order.card_last_four.as_deref(), Some("1234"));
        assert!(order.shipping.card.is_none());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let err = place(vec![], form(PaymentMethod::Paypal)).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_out_of_range_price_is_rejected() {
        let mut lines = items();
        lines[0].unit_price = Money::from_cents(crate::MAX_PRICE_CENTS + 1);

        let err = place(lines, form(PaymentMethod::Paypal)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_invalid_form_is_rejected() {
        let mut info = form(PaymentMethod::CreditCard);
        info.card = None;
        info.email = "nope".to_string();

        let err = place(items(), info).unwrap_err();
        match err {
            CoreError::InvalidForm(errors) => {
                assert_eq!(errors.get("email"), Some("Email is invalid"));
                assert!(errors.get("cvv").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_order_json_has_no_card() {
        let order = place(items(), form(PaymentMethod::CreditCard)).unwrap();
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("999"));
        assert!(!json.contains("4111"));

        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_checkout_request_shape() {
        let info = form(PaymentMethod::CreditCard);
        let card = info.card.clone();
        let order = place(items(), info).unwrap();
        let request = CheckoutRequest::from_order(&order, card.as_ref());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["totalPrice"], "25.50");
        assert_eq!(json["shippingCost"], "350.00");
        assert_eq!(json["taxAmount"], "0.20");
        assert_eq!(json["finalTotal"], "375.70");
        assert_eq!(json["shippingMethod"], "standard");
        assert_eq!(json["paymentMethod"], "creditCard");
        assert_eq!(json["cardHolderName"], "A Reader");
        assert_eq!(json["cartItems"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_card_fields_only_for_credit_card() {
        let info = form(PaymentMethod::CashOnDelivery);
        let card = info.card.clone();
        let order = place(items(), info).unwrap();
        assert!(order.card_last_four.is_none());

        let json = serde_json::to_value(CheckoutRequest::from_order(&order, card.as_ref())).unwrap();
        assert!(json.get("cardNumber").is_none());
        assert!(json.get("cvv").is_none());
    }

    #[test]
    fn test_redacted_request() {
        let info = form(PaymentMethod::CreditCard);
        let card = info.card.clone();
        let order = place(items(), info).unwrap();
        let request = CheckoutRequest::from_order(&order, card.as_ref()).redacted();

        assert_eq!(request.card_number.as_deref(), Some("****1234"));
        assert!(request.cvv.is_none());
        assert!(!format!("{request:?}").contains("4111"));
    }
}
