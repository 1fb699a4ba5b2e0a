//! # Storefront Commands
//!
//! One module per subcommand group. Every command returns the text to print;
//! notifications it raises go to [`AppState::notifications`] and are printed
//! after the output.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared rendering)
//! ├── cart.rs      ◄─── cart show | add | update | remove | clear
//! ├── wishlist.rs  ◄─── wishlist toggle | show
//! ├── checkout.rs  ◄─── checkout (payload, invoice, last order)
//! └── invoice.rs   ◄─── invoice last
//! ```
//!
//! [`AppState::notifications`]: crate::state::AppState

pub mod cart;
pub mod checkout;
pub mod invoice;
pub mod wishlist;

use pahana_core::{Notification, NotificationKind, OrderTotals, ShippingTier, TaxRate};

use crate::config::ShopConfig;

/// Width of the label column in totals blocks.
const LABEL_WIDTH: usize = 24;

/// `Tax (0.8%)`
pub(crate) fn tax_label(rate: TaxRate) -> String {
    format!("Tax ({}%)", rate.percentage())
}

/// Subtotal, shipping (when a tier is chosen), tax and total, one per line.
pub(crate) fn totals_lines(
    config: &ShopConfig,
    totals: &OrderTotals,
    tier: Option<ShippingTier>,
) -> Vec<String> {
    let mut rows = vec![("Subtotal".to_string(), totals.subtotal)];
    if let Some(tier) = tier {
        rows.push((format!("Shipping ({tier})"), totals.shipping_cost));
    }
    rows.push((tax_label(config.pricing.tax_rate), totals.tax_display()));
    rows.push(("Total".to_string(), totals.grand_total_display()));

    rows.into_iter()
        .map(|(label, amount)| format!("{:<width$}{:>14}", label, config.money(amount), width = LABEL_WIDTH))
        .collect()
}

/// `[success] Dune added to cart!`
pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "success",
        NotificationKind::Info => "info",
        NotificationKind::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

#[cfg(test)]
pub(crate) mod test_support {
    use pahana_core::PricingPolicy;
    use pahana_store::MemoryStore;

    use crate::config::{
        ShopConfig, DEFAULT_CURRENCY_SYMBOL, DEFAULT_INVOICE_TITLE, DEFAULT_STORE_NAME,
    };
    use crate::state::AppState;

    pub fn config(data_dir: &std::path::Path) -> ShopConfig {
        ShopConfig {
            data_dir: data_dir.to_path_buf(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            invoice_title: DEFAULT_INVOICE_TITLE.to_string(),
            pricing: PricingPolicy::default(),
        }
    }

    pub async fn memory_state(data_dir: &std::path::Path) -> AppState<MemoryStore> {
        AppState::open(config(data_dir), MemoryStore::new(), MemoryStore::new())
            .await
            .unwrap()
    }

    /// Messages of the pending notifications, oldest first.
    pub fn messages(state: &mut AppState<MemoryStore>) -> Vec<String> {
        state.notifications.drain().into_iter().map(|n| n.message).collect()
    }
}
