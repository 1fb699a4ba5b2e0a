//! # Checkout Command
//!
//! ## Placing an Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pahana checkout --tier standard --payment creditCard ...               │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. Snapshot the cart                                         │    │
//! │  │  2. Order::place: empty cart? form valid? freeze totals       │    │
//! │  │  3. --dry-run: print summary + payload, stop here             │    │
//! │  │  4. Write payload to orders/<id>.json (card redacted)         │    │
//! │  │  5. Save as lastOrder                                         │    │
//! │  │  6. Clear the cart                                            │    │
//! │  │  7. Render invoice-<id>.pdf                                   │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  Any failure in 1-5 leaves the cart as it was. An invoice failure in 7  │
//! │  does not undo the order; `pahana invoice last` retries it.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::Utc;
use pahana_core::{
    CardDetails, CheckoutRequest, Order, OrderId, PaymentMethod, ShippingInfo, ShippingTier,
};
use pahana_invoice::write_invoice_to_dir;
use pahana_store::KeyValueStore;
use tracing::{info, warn};

use super::totals_lines;
use crate::config::ShopConfig;
use crate::error::AppResult;
use crate::state::AppState;

/// The checkout form as given on the command line.
///
/// No `Debug`: it carries the full card number and CVV.
#[derive(Clone, Default)]
pub struct CheckoutArgs {
    /// `standard`, `express` or `overnight`
    pub tier: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// `creditCard`, `paypal` or `cashOnDelivery`
    pub payment: String,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub card_holder: Option<String>,
    /// Invoice directory; defaults to `<data dir>/invoices`.
    pub out: Option<PathBuf>,
    pub dry_run: bool,
}

pub async fn checkout<S: KeyValueStore>(
    state: &mut AppState<S>,
    args: CheckoutArgs,
) -> AppResult<String> {
    let shipping_method: ShippingTier = args.tier.parse()?;
    let payment_method: PaymentMethod = args.payment.parse()?;

    let card = match payment_method {
        PaymentMethod::CreditCard => Some(CardDetails {
            number: args.card_number.unwrap_or_default(),
            expiry: args.expiry.unwrap_or_default(),
            cvv: args.cvv.unwrap_or_default(),
            holder_name: args.card_holder.unwrap_or_default(),
        }),
        _ => None,
    };
    let shipping = ShippingInfo {
        name: args.name,
        address: args.address,
        phone: args.phone,
        email: args.email,
        shipping_method,
        payment_method,
        card: card.clone(),
    };

    let items = state.cart.read().await.snapshot();
    let order = Order::place(
        OrderId::generate(),
        Utc::now(),
        items,
        shipping,
        &state.config.pricing,
    )?;
    let payload = CheckoutRequest::from_order(&order, card.as_ref()).redacted();
    let payload_json = serde_json::to_string_pretty(&payload)?;

    let mut lines = order_summary(&state.config, &order);

    if args.dry_run {
        info!(order_id = %order.id, "Dry run; order not submitted");
        lines.push(String::new());
        lines.push(payload_json);
        return Ok(lines.join("\n"));
    }

    state.outbox.set(order.id.as_str(), &payload_json).await?;
    state.history.save(&order).await?;
    state.cart.clear().await?;

    info!(
        order_id = %order.id,
        items = order.items.len(),
        total = %order.totals.grand_total_display(),
        "Order placed"
    );
    state
        .notifications
        .success(format!("Order {} placed successfully!", order.id));

    let out_dir = args.out.unwrap_or_else(|| state.config.invoice_dir());
    match write_invoice_to_dir(
        &order,
        &out_dir,
        &state.config.invoice_layout(),
        &state.config.currency_symbol,
    ) {
        Ok(path) => lines.push(format!("Invoice saved to {}", path.display())),
        Err(err) => {
            warn!(order_id = %order.id, error = %err, "Invoice generation failed");
            state.notifications.error(format!(
                "Order placed, but the invoice could not be saved: {err}. \
                 Run `pahana invoice last` to try again."
            ));
        }
    }

    Ok(lines.join("\n"))
}

/// Order header, items, delivery details and totals.
pub(crate) fn order_summary(config: &ShopConfig, order: &Order) -> Vec<String> {
    let mut lines = vec![format!(
        "Order {} ({})",
        order.id,
        order.date.format("%Y-%m-%d %H:%M UTC")
    )];
    for item in &order.items {
        lines.push(format!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.title,
            config.money(item.unit_price),
            config.money(item.line_total())
        ));
    }

    let shipping = &order.shipping;
    lines.push(format!("Ship to: {}, {}", shipping.name, shipping.address));
    lines.push(format!("Shipping: {}", shipping.shipping_method.label()));
    lines.push(match &order.card_last_four {
        Some(last_four) => format!(
            "Payment: {} ending in {}",
            shipping.payment_method.label(),
            last_four
        ),
        None => format!("Payment: {}", shipping.payment_method.label()),
    });
    lines.push(String::new());
    lines.extend(totals_lines(
        config,
        &order.totals,
        Some(shipping.shipping_method),
    ));
    lines
}

// =============================================================================
// Unit Tests
// =============================================================================
